use crate::error::{TfvcError, TfvcErrorCode};
use crate::tfvc::execution::ExecutionResult;
use tracing::debug;

/// Output stream a pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// A recognized failure phrasing. Every needle must appear (case-insensitive)
/// in the chosen stream for the pattern to match.
#[derive(Debug, Clone, Copy)]
pub struct ErrorPattern {
    pub stream: Stream,
    pub needles: &'static [&'static str],
    pub code: TfvcErrorCode,
}

/// Known failure phrasings, first match wins
pub const ERROR_PATTERNS: &[ErrorPattern] = &[
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["authentication failed"],
        code: TfvcErrorCode::AuthenticationFailed,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["workspace could not be determined"],
        code: TfvcErrorCode::NotAWorkspace,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["unable to determine the source control server"],
        code: TfvcErrorCode::NotAWorkspace,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["repository not found"],
        code: TfvcErrorCode::RepositoryNotFound,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["project collection url to use could not be determined"],
        code: TfvcErrorCode::NotATfvcRepository,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["access denied connecting", "authenticating as oauth"],
        code: TfvcErrorCode::AuthenticationFailed,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["'java' is not recognized as an internal or external command"],
        code: TfvcErrorCode::TfvcNotFound,
    },
    ErrorPattern {
        stream: Stream::Stdout,
        needles: &["error occurred during initialization of vm"],
        code: TfvcErrorCode::TfvcNotFound,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["there is no working folder mapping"],
        code: TfvcErrorCode::FileNotInMappings,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["could not be found in your workspace, or you do not have permission to access it"],
        code: TfvcErrorCode::FileNotInWorkspace,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["tf30063: you are not authorized to access"],
        code: TfvcErrorCode::NotAuthorizedToAccess,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["tf400813: resource not available for anonymous access"],
        code: TfvcErrorCode::WorkspaceNotKnownToClc,
    },
    ErrorPattern {
        stream: Stream::Stderr,
        needles: &["a resolvable conflict was flagged by the server"],
        code: TfvcErrorCode::ServerConflict,
    },
];

/// Find the symbolic code for a failed execution, if its output matches a
/// known pattern
pub fn classify(result: &ExecutionResult) -> Option<TfvcErrorCode> {
    classify_with(ERROR_PATTERNS, result)
}

pub fn classify_with(patterns: &[ErrorPattern], result: &ExecutionResult) -> Option<TfvcErrorCode> {
    let stdout = result.stdout().to_lowercase();
    let stderr = result.stderr().to_lowercase();

    patterns
        .iter()
        .find(|pattern| {
            let text = match pattern.stream {
                Stream::Stdout => &stdout,
                Stream::Stderr => &stderr,
            };
            pattern.needles.iter().all(|needle| text.contains(needle))
        })
        .map(|pattern| pattern.code)
}

/// Build the classified error for a failed execution of `command`
pub fn to_error(command: &str, result: &ExecutionResult) -> TfvcError {
    let code = classify(result);
    debug!(
        command,
        exit_code = result.exit_code,
        code = code.map(|c| c.as_str()),
        "TF command failed"
    );

    TfvcError::new(command, result.exit_code)
        .with_streams(result.stdout.clone(), result.stderr.clone())
        .with_code(code)
}
