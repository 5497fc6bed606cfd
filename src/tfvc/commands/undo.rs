use crate::context::ServerContext;
use crate::error::TfvcResult;
use crate::tfvc::arguments::ArgumentBuilder;
use crate::tfvc::command::TfvcCommand;
use crate::tfvc::execution::ExecutionResult;
use crate::tfvc::parser::{self, EXIT_PARTIAL_SUCCESS, ExitCodePolicy, ExitOutcome};
use std::path::PathBuf;

/// Path list that means "everything in the workspace"
pub const UNDO_ALL: &str = "*";

// Exit 1 when some paths had nothing to undo, 100 when none did
const CLC_POLICY: ExitCodePolicy = ExitCodePolicy {
    partial_success: Some(EXIT_PARTIAL_SUCCESS),
    benign_prefixes: &["No pending changes "],
    benign_suffixes: &[],
};

// tf.exe ends the same message with a period; the prefix covers it
const EXE_POLICY: ExitCodePolicy = ExitCodePolicy {
    partial_success: Some(EXIT_PARTIAL_SUCCESS),
    benign_prefixes: &["No pending changes "],
    benign_suffixes: &[],
};

/// Undo pending changes for local paths
#[derive(Debug, Clone)]
pub struct Undo {
    context: Option<ServerContext>,
    paths: Vec<PathBuf>,
}

impl Undo {
    pub fn new(context: Option<ServerContext>, paths: Vec<PathBuf>) -> Self {
        Self { context, paths }
    }

    /// Undo every pending change under the working directory
    pub fn all(context: Option<ServerContext>) -> Self {
        Self::new(context, vec![PathBuf::from(UNDO_ALL)])
    }

    fn is_undo_all(&self) -> bool {
        self.paths.len() == 1 && self.paths[0].as_os_str() == UNDO_ALL
    }

    fn build(&self) -> ArgumentBuilder {
        // Both dialects need the collection here
        let builder = ArgumentBuilder::with_context("undo", self.context.as_ref(), false);
        if self.is_undo_all() {
            builder.add(".").add_switch("recursive")
        } else {
            builder.add_paths(&self.paths)
        }
    }
}

/// `Undoing edit: file1.txt` yields `file1.txt`; any other line is skipped
fn undone_file(line: &str) -> Option<String> {
    line.strip_prefix("Undoing ")?
        .split_once(": ")
        .map(|(_, file)| file.to_string())
}

impl TfvcCommand for Undo {
    type Output = Vec<PathBuf>;

    fn arguments(&self) -> ArgumentBuilder {
        self.build()
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        self.build()
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Vec<PathBuf>> {
        match CLC_POLICY.apply("undo", result)? {
            ExitOutcome::Empty => Ok(Vec::new()),
            ExitOutcome::Parse(lines) => Ok(parser::collect_grouped_paths(&lines, undone_file)),
        }
    }

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<Vec<PathBuf>> {
        match EXE_POLICY.apply("undo", result)? {
            ExitOutcome::Empty => Ok(Vec::new()),
            ExitOutcome::Parse(lines) => Ok(parser::collect_grouped_paths(&lines, undone_file)),
        }
    }
}
