//! BranchInitializer stage: creates the timestamped improvement branch.

use std::sync::Arc;

use pipeline::{
    BranchName, BranchPlan, ImproverError, ImproverSettings, RepositoryInfo, SourceControlHost,
    Timestamp,
};
use tracing::info;

/// Creates `<prefix><YYYYMMDDHHMMSS>` at the default branch head.
pub struct BranchInitializer {
    host: Arc<dyn SourceControlHost>,
    settings: ImproverSettings,
}

impl BranchInitializer {
    /// Creates the stage. Uses `settings.branch_prefix` for branch names.
    pub fn new(host: Arc<dyn SourceControlHost>, settings: ImproverSettings) -> Self {
        Self { host, settings }
    }

    /// The branch name for a run started at `now`.
    pub fn branch_name(&self, now: Timestamp) -> Result<BranchName, ImproverError> {
        let name = format!("{}{}", self.settings.branch_prefix, now.compact());
        BranchName::new(name).ok_or_else(|| ImproverError::ConfigurationError {
            message: "branch name must not be empty".to_string(),
        })
    }

    /// Reads the default branch head and creates the new branch at the same SHA.
    ///
    /// Collisions within the same second surface as [`ImproverError::BranchCreationError`].
    pub async fn initialize(
        &self,
        repo: &RepositoryInfo,
        now: Timestamp,
    ) -> Result<BranchPlan, ImproverError> {
        let base = self
            .host
            .get_branch(&repo.handle, &repo.default_branch)
            .await
            .map_err(|e| ImproverError::BranchCreationError {
                branch: repo.default_branch.clone(),
                message: e.to_string(),
            })?;

        let head = self.branch_name(now)?;
        self.host
            .create_branch_ref(&repo.handle, &head, &base.head)
            .await
            .map_err(|e| ImproverError::BranchCreationError {
                branch: head.clone(),
                message: e.to_string(),
            })?;

        info!(branch = %head, base = %base.name, sha = %base.head, "created branch");
        Ok(BranchPlan { base, head })
    }
}
