//! Authenticator stage: credential pre-flight and repository resolution.

use std::sync::Arc;

use pipeline::{Credentials, ImproverError, RepositoryHandle, RepositoryInfo, SourceControlHost};
use tracing::{error, info};

/// Validates credentials and resolves the target repository.
pub struct Authenticator {
    host: Arc<dyn SourceControlHost>,
}

impl Authenticator {
    /// Creates the stage over `host`.
    pub fn new(host: Arc<dyn SourceControlHost>) -> Self {
        Self { host }
    }

    /// Checks that both credentials are present. Makes no network call.
    pub fn check_credentials<F>(lookup: F) -> Result<Credentials, ImproverError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Credentials::from_lookup(lookup)
            .inspect_err(|e| error!(error = %e, "credential check failed"))
    }

    /// Looks the repository up once. The first failure is terminal.
    pub async fn resolve(&self, repo: &RepositoryHandle) -> Result<RepositoryInfo, ImproverError> {
        match self.host.get_repository(repo).await {
            Ok(info) => {
                info!(
                    repository = %info.full_name,
                    default_branch = %info.default_branch,
                    "authenticated to repository"
                );
                Ok(info)
            }
            Err(e) => {
                let err = ImproverError::from_repository_lookup(&repo.full_name(), e);
                error!(repository = %repo, error = %err, "repository lookup failed");
                Err(err)
            }
        }
    }
}
