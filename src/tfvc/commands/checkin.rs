use crate::context::ServerContext;
use crate::error::TfvcResult;
use crate::tfvc::arguments::ArgumentBuilder;
use crate::tfvc::command::TfvcCommand;
use crate::tfvc::execution::ExecutionResult;
use crate::tfvc::parser::{self, ExitCodePolicy};
use std::path::PathBuf;

// A server conflict exits 100 with nothing checked in
const CLC_POLICY: ExitCodePolicy = ExitCodePolicy::STRICT;
const EXE_POLICY: ExitCodePolicy = ExitCodePolicy::STRICT;

/// Check in pending changes for the given files
///
/// Returns the new changeset number as printed by the tool, or an empty
/// string when nothing was reported.
#[derive(Debug, Clone)]
pub struct Checkin {
    context: Option<ServerContext>,
    files: Vec<PathBuf>,
    comment: Option<String>,
    work_items: Vec<u32>,
}

impl Checkin {
    pub fn new(context: Option<ServerContext>, files: Vec<PathBuf>) -> Self {
        Self {
            context,
            files,
            comment: None,
            work_items: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Work items to associate; only the CLC supports this
    pub fn with_work_items(mut self, work_items: Vec<u32>) -> Self {
        self.work_items = work_items;
        self
    }

    fn with_comment_switch(&self, builder: ArgumentBuilder) -> ArgumentBuilder {
        match self.comment.as_deref() {
            Some(comment) => builder.add_switch_with_value("comment", &single_line(comment), false),
            None => builder,
        }
    }
}

/// The tool takes the comment as a single argument; line breaks become spaces
fn single_line(comment: &str) -> String {
    comment.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

impl TfvcCommand for Checkin {
    type Output = String;

    fn arguments(&self) -> ArgumentBuilder {
        let builder = ArgumentBuilder::with_context("checkin", self.context.as_ref(), false).add_paths(&self.files);
        let builder = self.with_comment_switch(builder);

        if self.work_items.is_empty() {
            builder
        } else {
            let ids = self
                .work_items
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(",");
            builder.add_switch_with_value("associate", &ids, false)
        }
    }

    fn exe_arguments(&self) -> ArgumentBuilder {
        let builder = ArgumentBuilder::with_context("checkin", self.context.as_ref(), true).add_paths(&self.files);
        self.with_comment_switch(builder)
    }

    /// Example output:
    /// ```text
    /// /Users/alias/ws/addFold:
    /// Checking in edit: testHere.txt
    ///
    /// Changeset #23 checked in.
    /// ```
    fn parse_output(&self, result: &ExecutionResult) -> TfvcResult<String> {
        CLC_POLICY.apply("checkin", result)?;
        Ok(parser::changeset_number(result.stdout.as_deref()))
    }

    fn parse_exe_output(&self, result: &ExecutionResult) -> TfvcResult<String> {
        EXE_POLICY.apply("checkin", result)?;
        Ok(parser::changeset_number(result.stdout.as_deref()))
    }
}
