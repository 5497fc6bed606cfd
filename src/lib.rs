pub mod audit;
pub mod config;
pub mod context;
pub mod error;
pub mod error_translation;
pub mod tfvc;

// Re-export commonly used types for convenience
pub use context::{Credentials, ServerContext, SharedServerContext, Workspace, WorkspaceMapping};
pub use error::{RunnerError, RunnerResult, TF_EXEC_FAILED_ERROR, TfvcError, TfvcErrorCode, TfvcResult};
pub use tfvc::{Dialect, TfCommandLineRunner, TfTool, TfVersion, TfvcCommand, TfvcRepository};
