//! Port traits implemented by the infrastructure crates.
//!
//! The orchestration layer only ever sees these traits, held as
//! `Arc<dyn SourceControlHost>` and `Arc<dyn CompletionService>`. Every method
//! is one network round trip; implementations must not retry.

use async_trait::async_trait;

use crate::errors::{CompletionError, HostError};
use crate::{
    Branch, BranchName, CommitInfo, CommitSha, CompletionRequest, FileEntry, NewCommit,
    NewPullRequest, PullRequest, RepoPath, RepositoryHandle, RepositoryInfo, TreeEntry, TreeSha,
};

/// The source-control host operations a run consumes.
#[async_trait]
pub trait SourceControlHost: Send + Sync {
    /// Resolves the repository and its default branch.
    async fn get_repository(&self, repo: &RepositoryHandle) -> Result<RepositoryInfo, HostError>;

    /// Reads a branch and its head commit.
    async fn get_branch(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
    ) -> Result<Branch, HostError>;

    /// Creates `refs/heads/<branch>` pointing at `sha`. Fails if it exists.
    async fn create_branch_ref(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), HostError>;

    /// Lists a directory as of `git_ref` (branch name or commit SHA).
    ///
    /// The repository root is [`RepoPath::root`].
    async fn list_directory(
        &self,
        repo: &RepositoryHandle,
        path: &RepoPath,
        git_ref: &str,
    ) -> Result<Vec<FileEntry>, HostError>;

    /// Fetches a single file with its content as of `git_ref`.
    async fn get_file(
        &self,
        repo: &RepositoryHandle,
        path: &RepoPath,
        git_ref: &str,
    ) -> Result<FileEntry, HostError>;

    /// Reads the root tree of a commit.
    async fn get_tree(&self, repo: &RepositoryHandle, sha: &CommitSha)
        -> Result<TreeSha, HostError>;

    /// Writes a tree made of `entries` layered onto `base_tree`.
    async fn create_tree(
        &self,
        repo: &RepositoryHandle,
        base_tree: &TreeSha,
        entries: &[TreeEntry],
    ) -> Result<TreeSha, HostError>;

    /// Reads a commit object.
    async fn get_commit(
        &self,
        repo: &RepositoryHandle,
        sha: &CommitSha,
    ) -> Result<CommitInfo, HostError>;

    /// Writes a commit object.
    async fn create_commit(
        &self,
        repo: &RepositoryHandle,
        commit: &NewCommit,
    ) -> Result<CommitSha, HostError>;

    /// Moves `refs/heads/<branch>` to `sha`. Fast-forward only.
    async fn update_branch_ref(
        &self,
        repo: &RepositoryHandle,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), HostError>;

    /// Opens a pull request.
    async fn create_pull_request(
        &self,
        repo: &RepositoryHandle,
        pull_request: &NewPullRequest,
    ) -> Result<PullRequest, HostError>;
}

/// The completion service: one chat request in, one text completion out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the untrimmed text of the first completion choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
