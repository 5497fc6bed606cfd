use crate::error::TfvcResult;
use crate::error_translation::classifier;
use crate::tfvc::execution::ExecutionResult;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Exit code the tool uses for partial success
pub const EXIT_PARTIAL_SUCCESS: i32 = 1;

/// Exit code the tool uses when nothing at all happened
pub const EXIT_NOTHING_DONE: i32 = 100;

static CHANGESET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Changeset #(\d+) checked in\.$").expect("valid changeset regex"));

/// Split tool output into lines
///
/// Splits on `\n` only and strips a trailing `\r`; never splits on spaces
/// because folder and file names may contain them.
pub fn split_into_lines(output: Option<&str>, filter_empty: bool) -> Vec<&str> {
    let Some(output) = output else {
        return Vec::new();
    };

    output
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !filter_empty || !line.is_empty())
        .collect()
}

/// A folder header is a line whose last character is `:`
pub fn is_folder_header(line: &str) -> bool {
    line.len() > 1 && line.ends_with(':')
}

/// Join a file line to the current folder header
///
/// An empty header leaves the file as printed.
pub fn file_path(folder_header: &str, file: &str) -> PathBuf {
    let folder = folder_header.strip_suffix(':').unwrap_or(folder_header);
    if folder.is_empty() {
        PathBuf::from(file)
    } else {
        Path::new(folder).join(file)
    }
}

/// Walk grouped output, joining every non-header line to the most recent
/// folder header
///
/// `extract` turns a content line into its file name, or `None` to skip it.
/// A header followed by a repeat of itself (the empty-folder case) is a
/// header and a file, not two headers.
pub fn collect_grouped_paths<F>(lines: &[&str], mut extract: F) -> Vec<PathBuf>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut paths = Vec::new();
    let mut folder = "";

    for line in lines {
        if line.is_empty() {
            continue;
        }
        if is_folder_header(line) {
            folder = line;
        } else if let Some(file) = extract(line) {
            paths.push(file_path(folder, &file));
        }
    }

    paths
}

/// Extract the changeset number from checkin output
///
/// The tool prints `Changeset #<n> checked in.` as its last meaningful line.
/// No such line yields an empty string.
pub fn changeset_number(output: Option<&str>) -> String {
    split_into_lines(output, true)
        .iter()
        .rev()
        .find_map(|line| {
            CHANGESET_LINE
                .captures(line.trim())
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .unwrap_or_default()
}

/// How a command interprets non-zero exit codes
///
/// Exit 0 always succeeds. `partial_success` (when set) succeeds with benign
/// lines filtered out. [`EXIT_NOTHING_DONE`] succeeds with an empty result
/// only when every non-empty stdout line is benign and stderr is empty. Any
/// other code is a classified error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitCodePolicy {
    pub partial_success: Option<i32>,
    pub benign_prefixes: &'static [&'static str],
    pub benign_suffixes: &'static [&'static str],
}

/// Outcome of applying an [`ExitCodePolicy`]
#[derive(Debug, PartialEq, Eq)]
pub enum ExitOutcome<'a> {
    /// Parse these lines
    Parse(Vec<&'a str>),
    /// The tool did nothing; return an empty result
    Empty,
}

impl ExitCodePolicy {
    /// Only exit code 0 succeeds
    pub const STRICT: ExitCodePolicy = ExitCodePolicy {
        partial_success: None,
        benign_prefixes: &[],
        benign_suffixes: &[],
    };

    pub fn is_benign(&self, line: &str) -> bool {
        self.benign_prefixes.iter().any(|p| line.starts_with(p))
            || self.benign_suffixes.iter().any(|s| line.ends_with(s))
    }

    /// Apply the policy to `result`, returning the lines left to parse
    pub fn apply<'a>(&self, command: &str, result: &'a ExecutionResult) -> TfvcResult<ExitOutcome<'a>> {
        let lines = split_into_lines(result.stdout.as_deref(), false);

        match result.exit_code {
            0 => Ok(ExitOutcome::Parse(self.without_benign(lines))),
            code if Some(code) == self.partial_success => {
                Ok(ExitOutcome::Parse(self.without_benign(lines)))
            }
            EXIT_NOTHING_DONE if self.all_benign(&lines) && !result.has_stderr() => {
                Ok(ExitOutcome::Empty)
            }
            _ => Err(classifier::to_error(command, result)),
        }
    }

    fn without_benign<'a>(&self, lines: Vec<&'a str>) -> Vec<&'a str> {
        lines.into_iter().filter(|line| !self.is_benign(line)).collect()
    }

    fn all_benign(&self, lines: &[&str]) -> bool {
        let mut content = lines.iter().filter(|line| !line.trim().is_empty()).peekable();
        content.peek().is_some() && content.all(|line| self.is_benign(line))
    }
}
