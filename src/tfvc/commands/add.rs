use crate::context::ServerContext;
use crate::error::TfvcResult;
use crate::tfvc::arguments::ArgumentBuilder;
use crate::tfvc::command::TfvcCommand;
use crate::tfvc::execution::ExecutionResult;
use crate::tfvc::parser::{
    self, EXIT_PARTIAL_SUCCESS, ExitCodePolicy, ExitOutcome,
};
use std::path::PathBuf;

const CLC_POLICY: ExitCodePolicy = ExitCodePolicy {
    partial_success: Some(EXIT_PARTIAL_SUCCESS),
    benign_prefixes: &["No arguments matched any files to add."],
    benign_suffixes: &[],
};

// tf.exe reports unmatched arguments as "<path>: No file matches."
const EXE_POLICY: ExitCodePolicy = ExitCodePolicy {
    partial_success: Some(EXIT_PARTIAL_SUCCESS),
    benign_prefixes: &[],
    benign_suffixes: &[" No file matches."],
};

/// Pend an add for local files and folders
#[derive(Debug, Clone)]
pub struct Add {
    context: Option<ServerContext>,
    paths: Vec<PathBuf>,
}

impl Add {
    pub fn new(context: Option<ServerContext>, paths: Vec<PathBuf>) -> Self {
        Self { context, paths }
    }
}

impl TfvcCommand for Add {
    type Output = Vec<PathBuf>;

    fn arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::with_context("add", self.context.as_ref(), false).add_paths(&self.paths)
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::with_context("add", self.context.as_ref(), true).add_paths(&self.paths)
    }

    /// Example output:
    /// ```text
    /// folder1:
    /// file1.txt
    /// empty-folder:
    /// empty-folder
    /// ```
    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Vec<PathBuf>> {
        match CLC_POLICY.apply("add", result)? {
            ExitOutcome::Empty => Ok(Vec::new()),
            ExitOutcome::Parse(lines) => {
                Ok(parser::collect_grouped_paths(&lines, |line| Some(line.to_string())))
            }
        }
    }

    /// Same grouping as the CLC, except an added empty folder is printed as
    /// one bare line
    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<Vec<PathBuf>> {
        match EXE_POLICY.apply("add", result)? {
            ExitOutcome::Empty => Ok(Vec::new()),
            ExitOutcome::Parse(lines) => {
                Ok(parser::collect_grouped_paths(&lines, |line| Some(line.to_string())))
            }
        }
    }
}
