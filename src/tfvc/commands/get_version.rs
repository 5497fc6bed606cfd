use crate::error::{TfvcError, TfvcErrorCode, TfvcResult};
use crate::error_translation::classifier;
use crate::tfvc::arguments::ArgumentBuilder;
use crate::tfvc::command::TfvcCommand;
use crate::tfvc::execution::ExecutionResult;
use regex::Regex;
use std::sync::LazyLock;

static CLC_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Team Explorer Everywhere Command Line Client \(Version ([.\d]+)\)").expect("valid CLC banner regex")
});

static EXE_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Microsoft \(R\) TF - Team Foundation Version Control Tool, Version ([.\d]+)")
        .expect("valid tf.exe banner regex")
});

/// Read the tool version from the banner printed by `add -?`
///
/// Both tools print the banner in the installed language only; anything
/// other than the English banner is rejected because the output parsers
/// depend on English text.
#[derive(Debug, Clone, Default)]
pub struct GetVersion;

impl GetVersion {
    pub fn new() -> Self {
        Self
    }

    fn parse(result: &ExecutionResult, banner: &Regex) -> TfvcResult<String> {
        if let Some(version) = banner
            .captures(result.stdout())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end_matches('.').to_string())
        {
            return Ok(version);
        }

        if result.exit_code != 0 {
            return Err(classifier::to_error("add", result));
        }

        if result.stdout().trim().is_empty() {
            return Ok(String::new());
        }

        Err(TfvcError::new("add", result.exit_code)
            .with_streams(result.stdout.clone(), result.stderr.clone())
            .with_code(Some(TfvcErrorCode::NotAnEnglishCommandLine))
            .with_detail("The TF command line is not configured for English output."))
    }
}

impl TfvcCommand for GetVersion {
    type Output = String;

    fn arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::new("add").add("-?")
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        ArgumentBuilder::new("add").add("-?")
    }

    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<String> {
        Self::parse(result, &CLC_BANNER)
    }

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<String> {
        Self::parse(result, &EXE_BANNER)
    }
}
