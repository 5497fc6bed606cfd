use crate::context::{Workspace, WorkspaceMapping};
use crate::error::{TfvcError, TfvcErrorCode, TfvcResult};
use crate::tfvc::arguments::ArgumentBuilder;
use crate::tfvc::command::TfvcCommand;
use crate::tfvc::execution::ExecutionResult;
use crate::tfvc::parser::{self, ExitCodePolicy};
use std::path::{Path, PathBuf};

const CLOAKED_PREFIX: &str = "(cloaked)";

/// Find the workspace that maps a local folder
///
/// Example output (CLC; `tf.exe` writes `Workspace :` and indents the
/// mappings):
/// ```text
/// =======================================================
/// Workspace:  MyWorkspace (jdoe)
/// Collection: http://server:8080/tfs/DefaultCollection/
/// $/project1: /home/jdoe/src/project1
/// (cloaked) $/project1/bin:
/// ```
#[derive(Debug, Clone)]
pub struct FindWorkspace {
    local_path: PathBuf,
    restrict_workspace: bool,
}

impl FindWorkspace {
    pub fn new(local_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            restrict_workspace: false,
        }
    }

    /// Keep only the mappings that cover the folder or lie beneath it
    pub fn restrict_workspace(mut self, restrict: bool) -> Self {
        self.restrict_workspace = restrict;
        self
    }

    fn parse(&self, result: &ExecutionResult) -> TfvcResult<Workspace> {
        ExitCodePolicy::STRICT.apply("workfold", result)?;

        let mut name = None;
        let mut owner = None;
        let mut server = String::new();
        let mut mappings = Vec::new();

        for line in parser::split_into_lines(result.stdout.as_deref(), true) {
            let line = line.trim();

            if let Some(rest) = line.strip_prefix("Workspace") {
                if let Some(value) = rest.trim_start().strip_prefix(':') {
                    let (ws_name, ws_owner) = split_owner(value.trim());
                    name = Some(ws_name.to_string());
                    owner = ws_owner.map(str::to_string);
                }
            } else if let Some(value) = line.strip_prefix("Collection") {
                if let Some(url) = value.trim_start().strip_prefix(':') {
                    server = url.trim().trim_end_matches('/').to_string();
                }
            } else if let Some(mapping) = parse_mapping(line) {
                mappings.push(mapping);
            }
        }

        let Some(name) = name else {
            return Err(TfvcError::new("workfold", result.exit_code)
                .with_streams(result.stdout.clone(), result.stderr.clone())
                .with_code(Some(TfvcErrorCode::NotAWorkspace)));
        };

        if self.restrict_workspace {
            mappings.retain(|m| covers(m, &self.local_path));
        }

        let default_team_project = mappings
            .iter()
            .find(|m| !m.cloaked)
            .and_then(|m| team_project(&m.server_path));

        Ok(Workspace {
            name,
            owner,
            server,
            mappings,
            default_team_project,
        })
    }
}

/// "MyWorkspace (jdoe)" -> ("MyWorkspace", Some("jdoe"))
fn split_owner(value: &str) -> (&str, Option<&str>) {
    if let Some(without_close) = value.strip_suffix(')') {
        if let Some(open) = without_close.rfind(" (") {
            return (without_close[..open].trim(), Some(&without_close[open + 2..]));
        }
    }
    (value, None)
}

fn parse_mapping(line: &str) -> Option<WorkspaceMapping> {
    let (cloaked, rest) = match line.strip_prefix(CLOAKED_PREFIX) {
        Some(rest) => (true, rest.trim_start()),
        None => (false, line),
    };

    if !rest.starts_with("$/") {
        return None;
    }

    let (server_path, local_path) = match rest.split_once(": ") {
        Some((server, local)) => (server, local.trim()),
        None => (rest.strip_suffix(':').unwrap_or(rest), ""),
    };

    Some(WorkspaceMapping {
        server_path: server_path.to_string(),
        local_path: (!local_path.is_empty()).then(|| PathBuf::from(local_path)),
        cloaked,
    })
}

/// "$/project1/sub" -> "project1"
fn team_project(server_path: &str) -> Option<String> {
    server_path
        .strip_prefix("$/")?
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

fn covers(mapping: &WorkspaceMapping, folder: &Path) -> bool {
    match &mapping.local_path {
        Some(local) => folder.starts_with(local) || local.starts_with(folder),
        None => false,
    }
}

impl TfvcCommand for FindWorkspace {
    type Output = Workspace;

    fn arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::new("workfold").add_path(&self.local_path)
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::new("workfold").add_path(&self.local_path)
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Workspace> {
        self.parse(result)
    }

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<Workspace> {
        self.parse(result)
    }
}
