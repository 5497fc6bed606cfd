use crate::error::TfvcResult;
use crate::tfvc::arguments::ArgumentBuilder;
use crate::tfvc::execution::{ExecOptions, ExecutionResult};
use std::fmt;

/// The two tool variants. They are versioned independently and disagree on
/// switches and output, so every command keeps one argument/parse pair per
/// dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Cross-platform Java command line client
    Clc,
    /// Windows-only `tf.exe`
    NativeExe,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Clc => f.write_str("CLC"),
            Dialect::NativeExe => f.write_str("tf.exe"),
        }
    }
}

/// One TFVC operation: argument construction and output parsing for both
/// dialects
///
/// Implementations hold only their construction parameters. Parsing is a pure
/// function of the execution result passed in.
pub trait TfvcCommand: Send + Sync {
    type Output: Send;

    fn arguments(&self) -> ArgumentBuilder;
    fn exe_arguments(&self) -> ArgumentBuilder;

    fn options(&self) -> ExecOptions {
        ExecOptions::default()
    }

    fn exe_options(&self) -> ExecOptions {
        ExecOptions::default()
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output>;
    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<Self::Output>;

    fn arguments_for(&self, dialect: Dialect) -> ArgumentBuilder {
        match dialect {
            Dialect::Clc => self.arguments(),
            Dialect::NativeExe => self.exe_arguments(),
        }
    }

    fn options_for(&self, dialect: Dialect) -> ExecOptions {
        match dialect {
            Dialect::Clc => self.options(),
            Dialect::NativeExe => self.exe_options(),
        }
    }

    fn parse_for(&self, dialect: Dialect, result: &ExecutionResult) -> TfvcResult<Self::Output> {
        match dialect {
            Dialect::Clc => self.parse_output(result),
            Dialect::NativeExe => self.parse_exe_output(result),
        }
    }
}
