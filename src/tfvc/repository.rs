use crate::context::{Credentials, ServerContext, SharedServerContext, Workspace};
use crate::error::RunnerResult;
use crate::tfvc::commands::{
    Add, AutoResolveType, Checkin, Conflict, Delete, Rename, ResolveConflicts, Undo,
};
use crate::tfvc::runner::TfCommandLineRunner;
use crate::tfvc::version::TfVersion;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A TFVC workspace folder and the runner used to operate on it
///
/// The server context is shared so credentials can be refreshed while
/// operations are in flight; each operation takes one snapshot before it
/// builds its command.
#[derive(Debug, Clone)]
pub struct TfvcRepository {
    path: PathBuf,
    runner: Arc<TfCommandLineRunner>,
    context: SharedServerContext,
}

impl TfvcRepository {
    /// Create a repository for a known workspace folder
    pub fn new<P: AsRef<Path>>(
        path: P,
        runner: Arc<TfCommandLineRunner>,
        context: SharedServerContext,
    ) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            runner,
            context,
        }
    }

    /// Detect the workspace mapping `start_path` and open it
    ///
    /// The repository root is the deepest non-cloaked mapping that contains
    /// `start_path`.
    pub async fn discover_from<P: AsRef<Path>>(
        start_path: P,
        runner: Arc<TfCommandLineRunner>,
        credentials: Option<Credentials>,
        cancel: &CancellationToken,
    ) -> RunnerResult<Self> {
        let start_path = start_path.as_ref();
        let workspace = runner.find_workspace(start_path, cancel).await?;

        let root = workspace_root(&workspace, start_path);
        debug!(workspace = %workspace.name, root = %root.display(), "discovered TFVC workspace");

        let mut context = workspace.server_context();
        context.credentials = credentials;

        Ok(Self::new(root, runner, SharedServerContext::new(context)))
    }

    /// Get the workspace folder path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context(&self) -> &SharedServerContext {
        &self.context
    }

    pub fn runner(&self) -> &TfCommandLineRunner {
        &self.runner
    }

    fn snapshot(&self) -> Option<ServerContext> {
        Some(self.context.snapshot())
    }

    pub async fn add(&self, paths: Vec<PathBuf>, cancel: &CancellationToken) -> RunnerResult<Vec<PathBuf>> {
        let command = Add::new(self.snapshot(), paths);
        self.runner.run(&command, &self.path, cancel).await
    }

    pub async fn delete(&self, paths: Vec<PathBuf>, cancel: &CancellationToken) -> RunnerResult<Vec<PathBuf>> {
        let command = Delete::new(self.snapshot(), paths);
        self.runner.run(&command, &self.path, cancel).await
    }

    /// Returns the destination as reported by the tool
    pub async fn rename(
        &self,
        source: PathBuf,
        destination: PathBuf,
        cancel: &CancellationToken,
    ) -> RunnerResult<PathBuf> {
        let command = Rename::new(self.snapshot(), source, destination);
        self.runner.run(&command, &self.path, cancel).await
    }

    pub async fn undo(&self, paths: Vec<PathBuf>, cancel: &CancellationToken) -> RunnerResult<Vec<PathBuf>> {
        let command = Undo::new(self.snapshot(), paths);
        self.runner.run(&command, &self.path, cancel).await
    }

    /// Undo every pending change in the workspace folder
    pub async fn undo_all(&self, cancel: &CancellationToken) -> RunnerResult<Vec<PathBuf>> {
        let command = Undo::all(self.snapshot());
        self.runner.run(&command, &self.path, cancel).await
    }

    /// Check in `files` and return the changeset number
    pub async fn checkin(
        &self,
        files: Vec<PathBuf>,
        comment: Option<&str>,
        work_items: Vec<u32>,
        cancel: &CancellationToken,
    ) -> RunnerResult<String> {
        let mut command = Checkin::new(self.snapshot(), files).with_work_items(work_items);
        if let Some(comment) = comment {
            command = command.with_comment(comment);
        }
        self.runner.run(&command, &self.path, cancel).await
    }

    pub async fn resolve_conflicts(
        &self,
        paths: Vec<PathBuf>,
        auto_resolve: AutoResolveType,
        cancel: &CancellationToken,
    ) -> RunnerResult<Vec<Conflict>> {
        let command = ResolveConflicts::new(self.snapshot(), paths, auto_resolve);
        self.runner.run(&command, &self.path, cancel).await
    }

    pub async fn check_version(&self, cancel: &CancellationToken) -> RunnerResult<TfVersion> {
        self.runner.check_version(&self.path, cancel).await
    }

    /// Find the workspace mapping this folder
    pub async fn find_workspace(&self, cancel: &CancellationToken) -> RunnerResult<Workspace> {
        self.runner.find_workspace(&self.path, cancel).await
    }
}

fn workspace_root(workspace: &Workspace, start_path: &Path) -> PathBuf {
    workspace
        .mappings
        .iter()
        .filter(|m| !m.cloaked)
        .filter_map(|m| m.local_path.as_deref())
        .filter(|local| start_path.starts_with(local))
        .max_by_key(|local| local.components().count())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start_path.to_path_buf())
}
