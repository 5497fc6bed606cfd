use crate::audit::{AuditLogger, Interruption};
use crate::config::settings::{Config, ConfigError};
use crate::context::Workspace;
use crate::error::{RunnerError, RunnerResult, TfvcErrorCode};
use crate::tfvc::arguments::{ArgumentProvider, redact_url_credentials};
use crate::tfvc::command::{Dialect, TfvcCommand};
use crate::tfvc::commands::{FindWorkspace, GetVersion};
use crate::tfvc::executor::{ExecutorError, ProcessExecutor, ProcessRequest, TokioProcessExecutor};
use crate::tfvc::version::TfVersion;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The configured TF command line
#[derive(Clone, PartialEq, Eq)]
pub struct TfTool {
    pub path: PathBuf,
    pub dialect: Dialect,
    pub min_version: TfVersion,
    pub proxy: Option<String>,
}

impl TfTool {
    /// A tool at `path`; `tf.exe` selects the native dialect, anything else
    /// the CLC
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_exe = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.eq_ignore_ascii_case("tf.exe"));
        let dialect = if is_exe { Dialect::NativeExe } else { Dialect::Clc };

        Self {
            path,
            dialect,
            min_version: TfVersion::minimum_for(dialect),
            proxy: None,
        }
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let location = config
            .tfvc
            .location
            .as_ref()
            .ok_or(ConfigError::MissingLocation)?;

        Ok(Self::new(location).with_proxy(config.tfvc.proxy.clone()))
    }
}

impl std::fmt::Debug for TfTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let proxy = self
            .proxy
            .as_deref()
            .map(|proxy| redact_url_credentials(proxy).unwrap_or_else(|| proxy.to_string()));
        f.debug_struct("TfTool")
            .field("path", &self.path)
            .field("dialect", &self.dialect)
            .field("min_version", &self.min_version)
            .field("proxy", &proxy)
            .finish()
    }
}

/// Runs [`TfvcCommand`]s against one configured tool
///
/// Argument construction and parsing are picked by the tool's dialect. Every
/// invocation is audited in masked form when an audit logger is attached.
///
/// The tool's version and output language are verified once, before the
/// first command is dispatched; a tool that fails the check runs nothing.
pub struct TfCommandLineRunner {
    tool: TfTool,
    executor: Arc<dyn ProcessExecutor>,
    audit: Option<Arc<AuditLogger>>,
    timeout: Duration,
    launch_retries: u32,
    restrict_workspace: bool,
    verified: OnceCell<TfVersion>,
}

impl TfCommandLineRunner {
    pub fn new(tool: TfTool, executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            tool,
            executor,
            audit: None,
            timeout: DEFAULT_TIMEOUT,
            launch_retries: 0,
            restrict_workspace: false,
            verified: OnceCell::new(),
        }
    }

    /// Build a runner from configuration using the tokio process executor
    pub fn from_config(config: &Config) -> RunnerResult<Self> {
        config.validate()?;
        let tool = TfTool::from_config(config)?;

        let mut runner = Self::new(tool, Arc::new(TokioProcessExecutor::new()))
            .with_timeout(Duration::from_secs(config.execution.timeout_seconds))
            .with_launch_retries(config.execution.launch_retries)
            .with_restrict_workspace(config.tfvc.restrict_workspace);

        if config.audit.log_commands {
            let logger = match &config.audit.log_path {
                Some(path) => AuditLogger::with_path(path),
                None => AuditLogger::new(),
            };
            match logger {
                Ok(logger) => runner = runner.with_audit_logger(Arc::new(logger)),
                Err(e) => warn!("audit log disabled: {}", e),
            }
        }

        Ok(runner)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_launch_retries(mut self, retries: u32) -> Self {
        self.launch_retries = retries;
        self
    }

    pub fn with_restrict_workspace(mut self, restrict: bool) -> Self {
        self.restrict_workspace = restrict;
        self
    }

    pub fn with_audit_logger(mut self, logger: Arc<AuditLogger>) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn tool(&self) -> &TfTool {
        &self.tool
    }

    pub fn dialect(&self) -> Dialect {
        self.tool.dialect
    }

    /// The version accepted by the first successful check, if any
    pub fn verified_version(&self) -> Option<TfVersion> {
        self.verified.get().copied()
    }

    /// Run a command in `cwd` and parse its output for the tool's dialect
    ///
    /// The first call verifies the tool; a failed check is returned here and
    /// retried on the next call.
    pub async fn run<C: TfvcCommand>(
        &self,
        command: &C,
        cwd: &Path,
        cancel: &CancellationToken,
    ) -> RunnerResult<C::Output> {
        self.verified
            .get_or_try_init(|| self.detect_version(cwd, cancel))
            .await?;
        self.dispatch(command, cwd, cancel).await
    }

    async fn dispatch<C: TfvcCommand>(
        &self,
        command: &C,
        cwd: &Path,
        cancel: &CancellationToken,
    ) -> RunnerResult<C::Output> {
        let dialect = self.tool.dialect;

        let mut args = command.arguments_for(dialect);
        if let Some(proxy) = &self.tool.proxy {
            args.add_proxy_switch(proxy);
        }
        let options = command.options_for(dialect);

        debug!(
            %dialect,
            cwd = %cwd.display(),
            command = %args.arguments_for_display(),
            "running TF command"
        );

        let request = ProcessRequest::new(&self.tool.path, args.arguments())
            .with_cwd(cwd)
            .with_env(options.env)
            .with_timeout(self.timeout);

        let mut attempt = 0;
        let result = loop {
            match self.executor.execute(request.clone(), cancel).await {
                Ok(result) => break result,
                Err(ExecutorError::Launch(e)) if attempt < self.launch_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        command = args.command(),
                        "failed to launch TF command line, retrying: {}",
                        e
                    );
                }
                Err(e) => {
                    let interruption = match &e {
                        ExecutorError::Canceled => Some(Interruption::Canceled),
                        ExecutorError::TimedOut(_) => Some(Interruption::TimedOut),
                        ExecutorError::Launch(_) => None,
                    };
                    if let (Some(audit), Some(interruption)) = (&self.audit, interruption) {
                        if let Err(log_err) = audit.log_interrupted(&args, cwd, interruption) {
                            warn!("failed to write audit log: {}", log_err);
                        }
                    }
                    return Err(e.into());
                }
            }
        };

        debug!(command = args.command(), exit_code = result.exit_code, "TF command finished");

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.log_command(&args, cwd, result.exit_code) {
                warn!("failed to write audit log: {}", e);
            }
        }

        Ok(command.parse_for(dialect, &result)?)
    }

    /// Detect the tool version and reject tools older than the minimum
    ///
    /// Always asks the tool; an accepted version also satisfies the check
    /// `run` makes before its first command.
    pub async fn check_version(&self, cwd: &Path, cancel: &CancellationToken) -> RunnerResult<TfVersion> {
        let version = self.detect_version(cwd, cancel).await?;
        // Already set by a concurrent check of the same tool
        let _ = self.verified.set(version);
        Ok(version)
    }

    async fn detect_version(&self, cwd: &Path, cancel: &CancellationToken) -> RunnerResult<TfVersion> {
        let version_str = self.dispatch(&GetVersion::new(), cwd, cancel).await?;
        if version_str.is_empty() {
            return Err(RunnerError::VersionDetectionFailed(
                "the TF command line printed no version banner".to_string(),
            ));
        }

        let version = TfVersion::parse(&version_str)?;
        if !version.is_at_least(&self.tool.min_version) {
            return Err(RunnerError::VersionTooOld {
                found: version,
                minimum: self.tool.min_version,
            });
        }

        debug!(%version, dialect = %self.tool.dialect, "TF command line version accepted");
        Ok(version)
    }

    /// Find the workspace mapping `path`
    pub async fn find_workspace(&self, path: &Path, cancel: &CancellationToken) -> RunnerResult<Workspace> {
        let cwd = if path.is_dir() {
            path
        } else {
            path.parent().unwrap_or(path)
        };
        let command = FindWorkspace::new(path).restrict_workspace(self.restrict_workspace);

        match self.run(&command, cwd, cancel).await {
            Err(RunnerError::Tfvc(e)) if e.is(TfvcErrorCode::NotAWorkspace) => {
                Err(RunnerError::WorkspaceNotFound(path.to_path_buf()))
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for TfCommandLineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfCommandLineRunner")
            .field("tool", &self.tool)
            .field("timeout", &self.timeout)
            .field("launch_retries", &self.launch_retries)
            .field("verified", &self.verified.get())
            .field("audit", &self.audit.as_ref().map(|a| a.log_path().to_path_buf()))
            .finish()
    }
}
