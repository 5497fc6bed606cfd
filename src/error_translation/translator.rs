use crate::config::settings::ConfigError;
use crate::error::{RunnerError, TfvcError, TfvcErrorCode};

#[derive(Debug, Clone)]
pub struct UserFriendlyError {
    pub simple_message: String,
    pub suggestion: Option<String>,
    pub raw_error: String,
}

pub struct ErrorTranslator;

impl ErrorTranslator {
    /// Translate any runner failure into a user-facing message
    pub fn translate(error: &RunnerError) -> UserFriendlyError {
        match error {
            RunnerError::Tfvc(tfvc_err) => Self::translate_tfvc(tfvc_err),
            RunnerError::VersionTooOld { minimum, .. } => UserFriendlyError {
                simple_message: "The installed TF command line is too old.".to_string(),
                suggestion: Some(format!("Install version {} or later.", minimum)),
                raw_error: error.to_string(),
            },
            RunnerError::VersionDetectionFailed(_) => UserFriendlyError {
                simple_message: "Could not determine the TF command line version.".to_string(),
                suggestion: Some("Check that [tfvc] location points at the TF command line.".to_string()),
                raw_error: error.to_string(),
            },
            RunnerError::WorkspaceNotFound(_) => UserFriendlyError {
                simple_message: "This folder is not mapped in any TFVC workspace.".to_string(),
                suggestion: Some("Map the folder with: tf workfold".to_string()),
                raw_error: error.to_string(),
            },
            RunnerError::Canceled => UserFriendlyError {
                simple_message: "The operation was canceled.".to_string(),
                suggestion: None,
                raw_error: error.to_string(),
            },
            RunnerError::TimedOut(_) => UserFriendlyError {
                simple_message: "The TF command line did not finish in time.".to_string(),
                suggestion: Some("Increase [execution] timeout_seconds or check server connectivity.".to_string()),
                raw_error: error.to_string(),
            },
            RunnerError::Launch(_) => UserFriendlyError {
                simple_message: "The TF command line could not be started.".to_string(),
                suggestion: Some("Check that [tfvc] location points at an executable file.".to_string()),
                raw_error: error.to_string(),
            },
            RunnerError::Config(config_err) => Self::translate_config(config_err),
        }
    }

    fn translate_config(error: &ConfigError) -> UserFriendlyError {
        let suggestion = match error {
            ConfigError::MissingLocation => {
                "Set [tfvc] location in ~/.config/tfvc-bridge/config.toml".to_string()
            }
            _ => "Check your config file at ~/.config/tfvc-bridge/config.toml".to_string(),
        };

        UserFriendlyError {
            simple_message: "Configuration error occurred.".to_string(),
            suggestion: Some(suggestion),
            raw_error: error.to_string(),
        }
    }

    /// Translate a classified command failure, keyed on its symbolic code
    pub fn translate_tfvc(error: &TfvcError) -> UserFriendlyError {
        let raw_error = match error.stderr.as_deref().map(str::trim) {
            Some(stderr) if !stderr.is_empty() => format!("{}\n{}", error, stderr),
            _ => error.to_string(),
        };

        let (simple_message, suggestion) = match error.code {
            Some(code) => Self::describe(code),
            // Unknown failures pass through as-is
            None => (error.message.clone(), None),
        };

        UserFriendlyError {
            simple_message,
            suggestion,
            raw_error,
        }
    }

    fn describe(code: TfvcErrorCode) -> (String, Option<String>) {
        let (message, suggestion) = match code {
            TfvcErrorCode::AuthenticationFailed => (
                "Authentication failed - check your credentials.",
                Some("Verify your user name and password or personal access token."),
            ),
            TfvcErrorCode::NotAuthorizedToAccess => (
                "You are not authorized to access this collection.",
                Some("Ask a project administrator for access."),
            ),
            TfvcErrorCode::NotATfvcRepository => (
                "This folder does not belong to a TFVC repository.",
                None,
            ),
            TfvcErrorCode::NotAWorkspace => (
                "The workspace could not be determined for this folder.",
                Some("Open a folder that is mapped in a TFVC workspace."),
            ),
            TfvcErrorCode::WorkspaceNotKnownToClc => (
                "The workspace is not known to the TF command line.",
                Some("Run any tf command against the server once to refresh the local workspace cache."),
            ),
            TfvcErrorCode::RepositoryNotFound => ("The repository was not found on the server.", None),
            TfvcErrorCode::TfvcNotFound => (
                "The TF command line could not run.",
                Some("Check that Java is installed for the cross-platform client, or that tf.exe exists."),
            ),
            TfvcErrorCode::FileNotInMappings => (
                "The file is not under any working folder mapping.",
                Some("Check the workspace mappings with: tf workfold"),
            ),
            TfvcErrorCode::FileNotInWorkspace => (
                "The file could not be found in your workspace.",
                Some("Check the file path and that you have permission to access it."),
            ),
            TfvcErrorCode::ServerConflict => (
                "The server flagged a conflict; nothing was checked in.",
                Some("Resolve the conflicts and try the check-in again."),
            ),
            TfvcErrorCode::NotAnEnglishCommandLine => (
                "The TF command line is not configured for English output.",
                Some("Set the TF command line locale to English."),
            ),
        };

        (message.to_string(), suggestion.map(str::to_string))
    }
}
