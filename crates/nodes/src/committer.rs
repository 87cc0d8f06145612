//! Committer stage: one tree, one commit, one reference update, one pull request.

use std::sync::Arc;

use pipeline::{
    BranchPlan, CommitStep, ImprovedFile, ImproverError, ImproverSettings, NewCommit,
    NewPullRequest, PullRequest, RepositoryInfo, SourceControlHost, TreeEntry,
};
use tracing::info;

/// Writes the improvements to the new branch and opens the pull request.
pub struct Committer {
    host: Arc<dyn SourceControlHost>,
    settings: ImproverSettings,
}

impl Committer {
    /// Creates the stage. Commit and pull request text come from `settings`.
    pub fn new(host: Arc<dyn SourceControlHost>, settings: ImproverSettings) -> Self {
        Self { host, settings }
    }

    /// Commits `files` onto the base snapshot and opens a pull request.
    ///
    /// Returns `Ok(None)` without any host call when `files` is empty. Nothing
    /// is rolled back when a step fails.
    pub async fn commit_changes(
        &self,
        repo: &RepositoryInfo,
        plan: &BranchPlan,
        files: &[ImprovedFile],
    ) -> Result<Option<PullRequest>, ImproverError> {
        if files.is_empty() {
            info!("no source files to improve, skipping commit and pull request");
            return Ok(None);
        }
        let handle = &repo.handle;
        let base_sha = &plan.base.head;

        let base_tree = self
            .host
            .get_tree(handle, base_sha)
            .await
            .map_err(|e| ImproverError::commit_step(CommitStep::FetchBaseTree, e))?;

        let entries: Vec<TreeEntry> = files.iter().map(TreeEntry::from).collect();
        let tree = self
            .host
            .create_tree(handle, &base_tree, &entries)
            .await
            .map_err(|e| ImproverError::commit_step(CommitStep::CreateTree, e))?;

        let parent = self
            .host
            .get_commit(handle, base_sha)
            .await
            .map_err(|e| ImproverError::commit_step(CommitStep::FetchParentCommit, e))?;

        let commit = NewCommit {
            message: self.settings.commit_message.clone(),
            tree,
            parents: vec![parent.sha],
        };
        let commit_sha = self
            .host
            .create_commit(handle, &commit)
            .await
            .map_err(|e| ImproverError::commit_step(CommitStep::CreateCommit, e))?;

        self.host
            .update_branch_ref(handle, &plan.head, &commit_sha)
            .await
            .map_err(|e| ImproverError::commit_step(CommitStep::UpdateReference, e))?;
        info!(
            branch = %plan.head,
            commit = %commit_sha,
            files = files.len(),
            "pushed improvement commit"
        );

        let request = NewPullRequest {
            title: self.settings.pull_request_title.clone(),
            body: self.settings.pull_request_body.clone(),
            head: plan.head.clone(),
            base: repo.default_branch.clone(),
        };
        let pull_request = self
            .host
            .create_pull_request(handle, &request)
            .await
            .map_err(|e| ImproverError::commit_step(CommitStep::CreatePullRequest, e))?;

        info!(number = %pull_request.number, url = %pull_request.html_url, "pull request created");
        Ok(Some(pull_request))
    }
}
