use crate::context::ServerContext;
use crate::error::TfvcResult;
use crate::tfvc::arguments::ArgumentBuilder;
use crate::tfvc::command::TfvcCommand;
use crate::tfvc::execution::ExecutionResult;
use crate::tfvc::parser::{self, EXIT_PARTIAL_SUCCESS, ExitCodePolicy, ExitOutcome};
use std::path::PathBuf;

// Items that could not be deleted are reported on stderr with exit code 1;
// the ones that were deleted are still listed on stdout.
const CLC_POLICY: ExitCodePolicy = ExitCodePolicy {
    partial_success: Some(EXIT_PARTIAL_SUCCESS),
    benign_prefixes: &[],
    benign_suffixes: &[],
};

const EXE_POLICY: ExitCodePolicy = ExitCodePolicy {
    partial_success: Some(EXIT_PARTIAL_SUCCESS),
    benign_prefixes: &[],
    benign_suffixes: &[],
};

/// Pend a delete for local files and folders
#[derive(Debug, Clone)]
pub struct Delete {
    context: Option<ServerContext>,
    paths: Vec<PathBuf>,
}

impl Delete {
    pub fn new(context: Option<ServerContext>, paths: Vec<PathBuf>) -> Self {
        Self { context, paths }
    }
}

impl TfvcCommand for Delete {
    type Output = Vec<PathBuf>;

    fn arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::with_context("delete", self.context.as_ref(), false).add_paths(&self.paths)
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::with_context("delete", self.context.as_ref(), true).add_paths(&self.paths)
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Vec<PathBuf>> {
        match CLC_POLICY.apply("delete", result)? {
            ExitOutcome::Empty => Ok(Vec::new()),
            ExitOutcome::Parse(lines) => {
                Ok(parser::collect_grouped_paths(&lines, |line| Some(line.to_string())))
            }
        }
    }

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<Vec<PathBuf>> {
        match EXE_POLICY.apply("delete", result)? {
            ExitOutcome::Empty => Ok(Vec::new()),
            ExitOutcome::Parse(lines) => {
                Ok(parser::collect_grouped_paths(&lines, |line| Some(line.to_string())))
            }
        }
    }
}
