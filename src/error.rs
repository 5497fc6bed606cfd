use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::settings::ConfigError;
use crate::tfvc::executor::ExecutorError;
use crate::tfvc::version::TfVersion;

/// Prefix carried by every classified command failure
pub const TF_EXEC_FAILED_ERROR: &str = "Execution of the TFVC command line failed unexpectedly.";

/// Symbolic codes for tool failures that the classifier recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TfvcErrorCode {
    AuthenticationFailed,
    NotAuthorizedToAccess,
    NotATfvcRepository,
    NotAWorkspace,
    WorkspaceNotKnownToClc,
    RepositoryNotFound,
    TfvcNotFound,
    FileNotInMappings,
    FileNotInWorkspace,
    ServerConflict,
    NotAnEnglishCommandLine,
}

impl TfvcErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TfvcErrorCode::AuthenticationFailed => "AuthenticationFailed",
            TfvcErrorCode::NotAuthorizedToAccess => "NotAuthorizedToAccess",
            TfvcErrorCode::NotATfvcRepository => "NotATfvcRepository",
            TfvcErrorCode::NotAWorkspace => "NotAWorkspace",
            TfvcErrorCode::WorkspaceNotKnownToClc => "WorkspaceNotKnownToClc",
            TfvcErrorCode::RepositoryNotFound => "RepositoryNotFound",
            TfvcErrorCode::TfvcNotFound => "TfvcNotFound",
            TfvcErrorCode::FileNotInMappings => "FileNotInMappings",
            TfvcErrorCode::FileNotInWorkspace => "FileNotInWorkspace",
            TfvcErrorCode::ServerConflict => "ServerConflict",
            TfvcErrorCode::NotAnEnglishCommandLine => "NotAnEnglishCommandLine",
        }
    }
}

impl fmt::Display for TfvcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed tool invocation, classified from its exit code and output streams
///
/// Built only at the point where an execution result is known to be an
/// unrecoverable failure. The raw streams are kept so callers can surface them
/// in diagnostics.
#[derive(Debug, Clone, Error)]
#[error("{message} Exit code: {exit_code}")]
pub struct TfvcError {
    pub message: String,
    pub exit_code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub code: Option<TfvcErrorCode>,
    pub command: String,
}

impl TfvcError {
    /// Create an error with the generic failure message and no symbolic code
    pub fn new(command: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: TF_EXEC_FAILED_ERROR.to_string(),
            exit_code,
            stdout: None,
            stderr: None,
            code: None,
            command: command.into(),
        }
    }

    pub fn with_streams(mut self, stdout: Option<String>, stderr: Option<String>) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    pub fn with_code(mut self, code: Option<TfvcErrorCode>) -> Self {
        self.code = code;
        self
    }

    /// Append detail after the fixed failure prefix
    pub fn with_detail(mut self, detail: &str) -> Self {
        if !detail.is_empty() {
            self.message = format!("{} {}", TF_EXEC_FAILED_ERROR, detail);
        }
        self
    }

    pub fn is(&self, code: TfvcErrorCode) -> bool {
        self.code == Some(code)
    }
}

/// Top-level error for running commands through a configured tool
///
/// Wraps the classified per-command failure along with the fatal session
/// errors (version, locale, workspace) and process-level failures.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Tfvc(#[from] TfvcError),

    #[error("TF command line version {found} is too old. Minimum required: {minimum}")]
    VersionTooOld { found: TfVersion, minimum: TfVersion },

    #[error("Failed to detect TF command line version: {0}")]
    VersionDetectionFailed(String),

    #[error("No TFVC workspace mapping found for {}", .0.display())]
    WorkspaceNotFound(PathBuf),

    #[error("TF command was canceled")]
    Canceled,

    #[error("TF command timed out after {0}s")]
    TimedOut(u64),

    #[error("Failed to launch the TF command line: {0}")]
    Launch(#[source] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<ExecutorError> for RunnerError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Launch(e) => RunnerError::Launch(e),
            ExecutorError::Canceled => RunnerError::Canceled,
            ExecutorError::TimedOut(d) => RunnerError::TimedOut(d.as_secs()),
        }
    }
}

impl RunnerError {
    /// The symbolic code of a classified failure, if any
    pub fn tfvc_code(&self) -> Option<TfvcErrorCode> {
        match self {
            RunnerError::Tfvc(e) => e.code,
            _ => None,
        }
    }
}

/// Result type for command parsing
pub type TfvcResult<T> = std::result::Result<T, TfvcError>;

/// Result type for runner operations
pub type RunnerResult<T> = std::result::Result<T, RunnerError>;
