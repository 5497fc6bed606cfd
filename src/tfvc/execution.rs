use std::collections::BTreeMap;

/// Exit code, stdout and stderr of a finished tool invocation
///
/// Produced by a [`ProcessExecutor`](crate::tfvc::executor::ProcessExecutor),
/// consumed read-only by the command parsers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl ExecutionResult {
    pub fn new(exit_code: i32, stdout: Option<&str>, stderr: Option<&str>) -> Self {
        Self {
            exit_code,
            stdout: stdout.map(str::to_string),
            stderr: stderr.map(str::to_string),
        }
    }

    /// Build a result from captured bytes; empty streams become `None`
    pub fn from_output(exit_code: i32, stdout: &[u8], stderr: &[u8]) -> Self {
        let text = |bytes: &[u8]| {
            if bytes.is_empty() {
                None
            } else {
                Some(String::from_utf8_lossy(bytes).into_owned())
            }
        };

        Self {
            exit_code,
            stdout: text(stdout),
            stderr: text(stderr),
        }
    }

    pub fn stdout(&self) -> &str {
        self.stdout.as_deref().unwrap_or("")
    }

    pub fn stderr(&self) -> &str {
        self.stderr.as_deref().unwrap_or("")
    }

    pub fn has_stderr(&self) -> bool {
        !self.stderr().trim().is_empty()
    }
}

/// Per-command execution options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Environment overrides applied on top of the inherited environment
    pub env: BTreeMap<String, String>,
}

impl ExecOptions {
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.env.is_empty()
    }
}
