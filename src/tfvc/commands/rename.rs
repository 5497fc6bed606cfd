use crate::context::ServerContext;
use crate::error::TfvcResult;
use crate::tfvc::arguments::ArgumentBuilder;
use crate::tfvc::command::TfvcCommand;
use crate::tfvc::execution::ExecutionResult;
use crate::tfvc::parser::{self, ExitCodePolicy, ExitOutcome};
use std::path::PathBuf;

// Any nonzero exit is a failure; a rename is a single item
const CLC_POLICY: ExitCodePolicy = ExitCodePolicy::STRICT;
const EXE_POLICY: ExitCodePolicy = ExitCodePolicy::STRICT;

/// Pend a rename (move) of a single item
#[derive(Debug, Clone)]
pub struct Rename {
    context: Option<ServerContext>,
    source: PathBuf,
    destination: PathBuf,
}

impl Rename {
    pub fn new(context: Option<ServerContext>, source: PathBuf, destination: PathBuf) -> Self {
        Self {
            context,
            source,
            destination,
        }
    }

    /// The tool echoes the destination, grouped under its folder when the
    /// folder differs from the working directory
    fn destination_from(lines: &[&str]) -> PathBuf {
        parser::collect_grouped_paths(lines, |line| Some(line.to_string()))
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}

impl TfvcCommand for Rename {
    type Output = PathBuf;

    fn arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::with_context("rename", self.context.as_ref(), false)
            .add_path(&self.source)
            .add_path(&self.destination)
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::with_context("rename", self.context.as_ref(), true)
            .add_path(&self.source)
            .add_path(&self.destination)
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<PathBuf> {
        match CLC_POLICY.apply("rename", result)? {
            ExitOutcome::Empty => Ok(PathBuf::new()),
            ExitOutcome::Parse(lines) => Ok(Self::destination_from(&lines)),
        }
    }

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<PathBuf> {
        match EXE_POLICY.apply("rename", result)? {
            ExitOutcome::Empty => Ok(PathBuf::new()),
            ExitOutcome::Parse(lines) => Ok(Self::destination_from(&lines)),
        }
    }
}
