use crate::tfvc::execution::ExecutionResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Why a process produced no execution result
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("failed to launch process: {0}")]
    Launch(#[source] io::Error),

    #[error("process was canceled")]
    Canceled,

    #[error("process timed out after {0:?}")]
    TimedOut(Duration),
}

/// One process invocation
///
/// `args` may carry credentials in clear text, so `Debug` only reports how
/// many there are.
#[derive(Clone)]
pub struct ProcessRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
}

impl ProcessRequest {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl std::fmt::Debug for ProcessRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRequest")
            .field("program", &self.program)
            .field("args", &format_args!("[{} args]", self.args.len()))
            .field("cwd", &self.cwd)
            .field("env", &self.env.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Runs a process to completion and buffers its output
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    async fn execute(
        &self,
        request: ProcessRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, ExecutorError>;
}

/// Default executor backed by `tokio::process`
///
/// The child is killed when its future is dropped, which is what happens on
/// cancellation and timeout.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessExecutor;

impl TokioProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessExecutor for TokioProcessExecutor {
    async fn execute(
        &self,
        request: ProcessRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, ExecutorError> {
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(cwd) = &request.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &request.env {
            trace!("Setting env var: {}", key);
            cmd.env(key, value);
        }

        let output_future = cmd.output();

        let output = match request.timeout {
            Some(duration) => {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(program = %request.program.display(), "process canceled");
                        return Err(ExecutorError::Canceled);
                    }
                    result = timeout(duration, output_future) => match result {
                        Ok(output) => output.map_err(ExecutorError::Launch)?,
                        Err(_) => {
                            warn!(
                                program = %request.program.display(),
                                "process timed out after {} seconds",
                                duration.as_secs()
                            );
                            return Err(ExecutorError::TimedOut(duration));
                        }
                    },
                }
            }
            None => {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(program = %request.program.display(), "process canceled");
                        return Err(ExecutorError::Canceled);
                    }
                    output = output_future => output.map_err(ExecutorError::Launch)?,
                }
            }
        };

        // Terminated by a signal
        let exit_code = output.status.code().unwrap_or(-1);
        trace!(exit_code, "process finished");

        Ok(ExecutionResult::from_output(exit_code, &output.stdout, &output.stderr))
    }
}
