use crate::context::ServerContext;
use crate::error::TfvcResult;
use crate::tfvc::arguments::ArgumentBuilder;
use crate::tfvc::command::TfvcCommand;
use crate::tfvc::execution::ExecutionResult;
use crate::tfvc::parser::{self, ExitCodePolicy};
use std::fmt;
use std::path::PathBuf;

const CLC_POLICY: ExitCodePolicy = ExitCodePolicy::STRICT;
const EXE_POLICY: ExitCodePolicy = ExitCodePolicy::STRICT;

/// Resolution policy passed to `resolve -auto:<policy>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutoResolveType {
    AutoMerge,
    TakeTheirs,
    KeepYours,
    OverwriteLocal,
    DeleteConflict,
    KeepYoursRenameTheirs,
}

impl AutoResolveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoResolveType::AutoMerge => "AutoMerge",
            AutoResolveType::TakeTheirs => "TakeTheirs",
            AutoResolveType::KeepYours => "KeepYours",
            AutoResolveType::OverwriteLocal => "OverwriteLocal",
            AutoResolveType::DeleteConflict => "DeleteConflict",
            AutoResolveType::KeepYoursRenameTheirs => "KeepYoursRenameTheirs",
        }
    }
}

impl fmt::Display for AutoResolveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictType {
    Content,
    Rename,
    Delete,
    DeleteTarget,
    NameAndContent,
    Merge,
    Resolved,
}

/// A conflict reported by the tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub local_path: PathBuf,
    pub conflict_type: ConflictType,
    pub message: String,
}

/// Resolve conflicts on local paths with a single automatic policy
#[derive(Debug, Clone)]
pub struct ResolveConflicts {
    context: Option<ServerContext>,
    paths: Vec<PathBuf>,
    auto_resolve: AutoResolveType,
}

impl ResolveConflicts {
    pub fn new(context: Option<ServerContext>, paths: Vec<PathBuf>, auto_resolve: AutoResolveType) -> Self {
        Self {
            context,
            paths,
            auto_resolve,
        }
    }

    fn build(&self, skip_collection: bool) -> ArgumentBuilder {
        ArgumentBuilder::with_context("resolve", self.context.as_ref(), skip_collection)
            .add_paths(&self.paths)
            .add_switch_with_value("auto", self.auto_resolve.as_str(), false)
    }
}

fn resolved_conflicts(result: &ExecutionResult) -> Vec<Conflict> {
    parser::split_into_lines(result.stdout.as_deref(), true)
        .into_iter()
        .filter_map(resolved_conflict)
        .collect()
}

/// `Resolved /path/file.txt as KeepYours`
///
/// Split at the last " as " so paths containing it stay intact.
fn resolved_conflict(line: &str) -> Option<Conflict> {
    let rest = line.trim().strip_prefix("Resolved ")?;
    let (path, _policy) = rest.rsplit_once(" as ")?;

    Some(Conflict {
        local_path: PathBuf::from(path),
        conflict_type: ConflictType::Resolved,
        message: line.trim().to_string(),
    })
}

impl TfvcCommand for ResolveConflicts {
    type Output = Vec<Conflict>;

    fn arguments(&self) -> ArgumentBuilder {
        self.build(false)
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        self.build(true)
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Vec<Conflict>> {
        CLC_POLICY.apply("resolve", result)?;
        Ok(resolved_conflicts(result))
    }

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<Vec<Conflict>> {
        EXE_POLICY.apply("resolve", result)?;
        Ok(resolved_conflicts(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Credentials;
    use crate::error::TF_EXEC_FAILED_ERROR;
    use crate::tfvc::arguments::ArgumentProvider;

    const COLLECTION: &str = "http://server:8080/tfs/collection1";
    const LOCAL_PATH: &str = "/usr/alias/repo1/file.txt";

    fn context() -> Option<ServerContext> {
        Some(ServerContext::new(COLLECTION).with_credentials(Credentials::user_password("user1", "pass1")))
    }

    fn resolve(context: Option<ServerContext>, auto: AutoResolveType) -> ResolveConflicts {
        ResolveConflicts::new(context, vec![PathBuf::from(LOCAL_PATH)], auto)
    }

    #[test]
    fn test_arguments_local() {
        let cmd = resolve(Some(ServerContext::local()), AutoResolveType::KeepYours);
        assert_eq!(
            cmd.arguments().arguments_for_display(),
            format!("resolve -noprompt {} -auto:KeepYours", LOCAL_PATH)
        );
        assert_eq!(
            cmd.exe_arguments().arguments_for_display(),
            format!("resolve -noprompt {} -auto:KeepYours", LOCAL_PATH)
        );
    }

    #[test]
    fn test_arguments_with_context() {
        let cmd = resolve(context(), AutoResolveType::TakeTheirs);
        assert_eq!(
            cmd.arguments().arguments_for_display(),
            format!("resolve -noprompt -collection:{} ******** {} -auto:TakeTheirs", COLLECTION, LOCAL_PATH)
        );
        assert_eq!(
            cmd.exe_arguments().arguments_for_display(),
            format!("resolve -noprompt ******** {} -auto:TakeTheirs", LOCAL_PATH)
        );
    }

    #[test]
    fn test_auto_resolve_names() {
        assert_eq!(AutoResolveType::AutoMerge.to_string(), "AutoMerge");
        assert_eq!(AutoResolveType::OverwriteLocal.to_string(), "OverwriteLocal");
        assert_eq!(AutoResolveType::DeleteConflict.to_string(), "DeleteConflict");
        assert_eq!(AutoResolveType::KeepYoursRenameTheirs.to_string(), "KeepYoursRenameTheirs");
    }

    #[test]
    fn test_parse_no_output() {
        let cmd = resolve(None, AutoResolveType::KeepYours);
        let result = ExecutionResult::new(0, None, None);
        assert!(cmd.parse_output(&result).unwrap().is_empty());
        assert!(cmd.parse_exe_output(&result).unwrap().is_empty());
    }

    #[test]
    fn test_parse_resolved() {
        let cmd = resolve(None, AutoResolveType::KeepYours);
        let result = ExecutionResult::new(
            0,
            Some("Resolved /usr/alias/repo1/file.txt as KeepYours\nResolved /usr/alias/repo1/file2.txt as KeepYours\n"),
            None,
        );

        for conflicts in [cmd.parse_output(&result).unwrap(), cmd.parse_exe_output(&result).unwrap()] {
            assert_eq!(conflicts.len(), 2);
            assert_eq!(conflicts[0].local_path, PathBuf::from("/usr/alias/repo1/file.txt"));
            assert_eq!(conflicts[0].conflict_type, ConflictType::Resolved);
            assert_eq!(conflicts[1].local_path, PathBuf::from("/usr/alias/repo1/file2.txt"));
            assert_eq!(conflicts[1].conflict_type, ConflictType::Resolved);
        }
    }

    #[test]
    fn test_parse_path_containing_as() {
        let cmd = resolve(None, AutoResolveType::TakeTheirs);
        let result = ExecutionResult::new(0, Some("Resolved /repo/saved as draft.txt as TakeTheirs\n"), None);
        let conflicts = cmd.parse_output(&result).unwrap();
        assert_eq!(conflicts[0].local_path, PathBuf::from("/repo/saved as draft.txt"));
    }

    #[test]
    fn test_parse_error_exit_code() {
        let cmd = resolve(None, AutoResolveType::KeepYours);
        let result = ExecutionResult::new(100, Some("Something bad this way comes."), None);

        let err = cmd.parse_output(&result).unwrap_err();
        assert_eq!(err.exit_code, 100);
        assert!(err.message.starts_with(TF_EXEC_FAILED_ERROR));

        let err = cmd.parse_exe_output(&result).unwrap_err();
        assert_eq!(err.exit_code, 100);
    }
}
