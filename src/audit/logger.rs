use crate::tfvc::arguments::ArgumentProvider;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// How an invocation ended without an exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Canceled,
    TimedOut,
}

impl Interruption {
    fn tag(&self) -> &'static str {
        match self {
            Interruption::Canceled => "CANCELED",
            Interruption::TimedOut => "TIMEOUT",
        }
    }
}

/// Append-only history of TF invocations
///
/// Only the masked display form of a command line is ever written.
#[derive(Debug)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a new AuditLogger with the default log path
    pub fn new() -> std::io::Result<Self> {
        Self::with_path(Self::default_log_path()?)
    }

    /// Create an AuditLogger with a custom log path
    pub fn with_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { log_path })
    }

    /// Get the default log path: ~/.config/tfvc-bridge/history.log
    fn default_log_path() -> std::io::Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "HOME environment variable not set")
        })?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("tfvc-bridge")
            .join("history.log"))
    }

    /// Log a completed invocation
    pub fn log_command(
        &self,
        command: &dyn ArgumentProvider,
        cwd: &Path,
        exit_code: i32,
    ) -> std::io::Result<()> {
        self.append(cwd, &format!("exit:{}", exit_code), &command.arguments_for_display())
    }

    /// Log an invocation that was killed before it exited
    pub fn log_interrupted(
        &self,
        command: &dyn ArgumentProvider,
        cwd: &Path,
        interruption: Interruption,
    ) -> std::io::Result<()> {
        self.append(cwd, interruption.tag(), &command.arguments_for_display())
    }

    fn append(&self, cwd: &Path, status: &str, display: &str) -> std::io::Result<()> {
        self.rotate_if_needed()?;

        let timestamp = Utc::now().to_rfc3339();
        let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());

        let log_entry = format!(
            "[{}] [{}] [{}] [{}] {}\n",
            timestamp,
            user,
            cwd.display(),
            status,
            display
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        file.write_all(log_entry.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Rotate log file if it exceeds MAX_LOG_SIZE
    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            // history.log -> history.log.1
            let backup_path = self.log_path.with_extension("log.1");
            fs::rename(&self.log_path, backup_path)?;
        }

        Ok(())
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
