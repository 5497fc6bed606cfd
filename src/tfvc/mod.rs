pub mod arguments;
pub mod command;
pub mod commands;
pub mod execution;
pub mod executor;
pub mod parser;
pub mod repository;
pub mod runner;
pub mod version;

// Re-export commonly used types
pub use arguments::{ArgumentBuilder, ArgumentProvider, SECRET_MASK};
pub use command::{Dialect, TfvcCommand};
pub use execution::{ExecOptions, ExecutionResult};
pub use executor::{ExecutorError, ProcessExecutor, ProcessRequest, TokioProcessExecutor};
pub use repository::TfvcRepository;
pub use runner::{TfCommandLineRunner, TfTool};
pub use version::TfVersion;
