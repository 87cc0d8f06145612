//! [`RepositoryImprover`]: drives the four stages in order.

use std::sync::Arc;

use pipeline::{
    BranchPlan, CompletionService, Credentials, ImprovedFile, ImproverError, ImproverSettings,
    PullRequest, RepositoryHandle, RepositoryInfo, RunId, SourceControlHost, Timestamp,
};
use serde::Serialize;
use tracing::{error, info, info_span, Instrument};

use crate::{Authenticator, BranchInitializer, Committer, FileImprover, ImprovementGateway};

/// Clients produced from validated credentials.
pub type Clients = (Arc<dyn SourceControlHost>, Arc<dyn CompletionService>);

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Id recorded on the run's tracing span.
    pub run_id: RunId,
    /// The repository as resolved by the host.
    pub repository: RepositoryInfo,
    /// The base snapshot and the branch created for the run.
    pub branch: BranchPlan,
    /// Improved files in discovery order.
    pub improved: Vec<ImprovedFile>,
    /// `None` when no file was improved.
    pub pull_request: Option<PullRequest>,
}

/// Authenticator → BranchInitializer → FileImprover → Committer.
///
/// Stops at the first fatal error. Nothing is retried or rolled back.
pub struct RepositoryImprover {
    host: Arc<dyn SourceControlHost>,
    completion: Arc<dyn CompletionService>,
    settings: ImproverSettings,
    clock: fn() -> Timestamp,
}

impl RepositoryImprover {
    /// Creates an executor over already-built clients, using the wall clock.
    pub fn new(
        host: Arc<dyn SourceControlHost>,
        completion: Arc<dyn CompletionService>,
        settings: ImproverSettings,
    ) -> Self {
        Self {
            host,
            completion,
            settings,
            clock: Timestamp::now,
        }
    }

    /// Runs the credential pre-flight, then builds the clients with `connect`.
    ///
    /// `connect` is never called when a credential is missing.
    pub fn connect<L, F>(
        lookup: L,
        settings: ImproverSettings,
        connect: F,
    ) -> Result<Self, ImproverError>
    where
        L: Fn(&str) -> Option<String>,
        F: FnOnce(&Credentials) -> Result<Clients, ImproverError>,
    {
        let credentials = Authenticator::check_credentials(lookup)?;
        let (host, completion) = connect(&credentials)?;
        Ok(Self::new(host, completion, settings))
    }

    /// Replaces the wall clock used for the branch timestamp.
    pub fn with_clock(mut self, clock: fn() -> Timestamp) -> Self {
        self.clock = clock;
        self
    }

    /// Runs the four stages once against `repo` under a fresh [`RunId`].
    pub async fn run(&self, repo: &RepositoryHandle) -> Result<RunReport, ImproverError> {
        let run_id = RunId::new_random();
        let span = info_span!("improvement_run", %run_id, repository = %repo);
        self.run_stages(run_id, repo)
            .instrument(span)
            .await
            .inspect_err(|e| error!(%run_id, error = %e, "run aborted"))
    }

    async fn run_stages(
        &self,
        run_id: RunId,
        repo: &RepositoryHandle,
    ) -> Result<RunReport, ImproverError> {
        let repository = Authenticator::new(self.host.clone()).resolve(repo).await?;

        let branch = BranchInitializer::new(self.host.clone(), self.settings.clone())
            .initialize(&repository, (self.clock)())
            .await?;

        let gateway = ImprovementGateway::new(self.completion.clone(), self.settings.clone());
        let improved = FileImprover::new(self.host.clone(), gateway, self.settings.clone())
            .improve_all(&repository, &branch)
            .await?;

        let pull_request = Committer::new(self.host.clone(), self.settings.clone())
            .commit_changes(&repository, &branch, &improved)
            .await?;

        info!(
            branch = %branch.head,
            improved = improved.len(),
            pull_request = pull_request.as_ref().map(|pr| pr.html_url.as_str()),
            "run complete"
        );
        Ok(RunReport {
            run_id,
            repository,
            branch,
            improved,
            pull_request,
        })
    }
}
