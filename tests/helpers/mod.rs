use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tfvc_bridge::audit::AuditLogger;
use tfvc_bridge::tfvc::{
    Dialect, ExecutionResult, ExecutorError, ProcessExecutor, ProcessRequest, TfCommandLineRunner, TfTool,
};
use tfvc_bridge::{Credentials, ServerContext, SharedServerContext, TfvcRepository};
use tokio_util::sync::CancellationToken;

pub const COLLECTION: &str = "http://server:8080/tfs/collection1";
pub const PASSWORD: &str = "hunter2-secret";
pub const CLC_BANNER: &str = "Team Explorer Everywhere Command Line Client (Version 14.134.0.201803131212)\n";
pub const EXE_BANNER: &str = "Microsoft (R) TF - Team Foundation Version Control Tool, Version 14.102.25619.0\r\n";

/// Server context with a collection and user/password credentials
pub fn server_context() -> ServerContext {
    ServerContext::new(COLLECTION).with_credentials(Credentials::user_password("user1", PASSWORD))
}

/// Executor that answers by sub-command verb and records every request
///
/// Version requests (`add -noprompt -?`) get the scripted banner every time,
/// separately from the one-shot per-verb answers.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<HashMap<String, Result<ExecutionResult, ExecutorError>>>,
    version: Mutex<ExecutionResult>,
    requests: Mutex<Vec<ProcessRequest>>,
}

impl ScriptedExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer `verb` with the given exit code and streams
    pub fn respond(&self, verb: &str, exit_code: i32, stdout: Option<&str>, stderr: Option<&str>) {
        self.responses
            .lock()
            .unwrap()
            .insert(verb.to_string(), Ok(ExecutionResult::new(exit_code, stdout, stderr)));
    }

    /// Answer every version request with `stdout`
    pub fn respond_version(&self, exit_code: i32, stdout: &str) {
        *self.version.lock().unwrap() = ExecutionResult::new(exit_code, Some(stdout), None);
    }

    pub fn fail(&self, verb: &str, error: ExecutorError) {
        self.responses.lock().unwrap().insert(verb.to_string(), Err(error));
    }

    pub fn requests(&self) -> Vec<ProcessRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_args(&self) -> Vec<String> {
        self.requests().last().map(|r| r.args.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ProcessExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        request: ProcessRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, ExecutorError> {
        if cancel.is_cancelled() {
            return Err(ExecutorError::Canceled);
        }

        let verb = request.args.first().cloned().unwrap_or_default();
        let is_version = request.args.iter().any(|arg| arg == "-?");
        self.requests.lock().unwrap().push(request);

        if is_version {
            return Ok(self.version.lock().unwrap().clone());
        }

        match self.responses.lock().unwrap().remove(&verb) {
            Some(response) => response,
            None => Ok(ExecutionResult::default()),
        }
    }
}

/// Repository over a scripted executor, auditing into a temp dir
pub fn scripted_repository(tool_path: &str) -> (TempDir, Arc<ScriptedExecutor>, TfvcRepository) {
    scripted_repository_for(TfTool::new(tool_path))
}

/// Same as [`scripted_repository`] for a fully configured tool
pub fn scripted_repository_for(tool: TfTool) -> (TempDir, Arc<ScriptedExecutor>, TfvcRepository) {
    let temp_dir = TempDir::new().unwrap();
    let executor = ScriptedExecutor::new();
    let banner = match tool.dialect {
        Dialect::Clc => CLC_BANNER,
        Dialect::NativeExe => EXE_BANNER,
    };
    executor.respond_version(0, banner);
    let audit = AuditLogger::with_path(temp_dir.path().join("history.log")).unwrap();

    let runner = TfCommandLineRunner::new(tool, executor.clone())
        .with_audit_logger(Arc::new(audit));
    let repo = TfvcRepository::new(
        PathBuf::from("/ws"),
        Arc::new(runner),
        SharedServerContext::new(server_context()),
    );

    (temp_dir, executor, repo)
}
