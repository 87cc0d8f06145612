//! FileImprover stage: traversal, decoding, and per-file improvement.

use std::collections::VecDeque;
use std::sync::Arc;

use pipeline::{
    BranchPlan, EntryKind, FileEntry, ImprovedFile, ImproverError, ImproverSettings, RepoPath,
    RepositoryInfo, SourceControlHost,
};
use tracing::{debug, info, warn};

use crate::gateway::ImprovementGateway;

/// Walks the base snapshot breadth-first and collects improved source files.
pub struct FileImprover {
    host: Arc<dyn SourceControlHost>,
    gateway: ImprovementGateway,
    settings: ImproverSettings,
}

impl FileImprover {
    /// Creates the stage. Only paths ending in `settings.source_extension`
    /// are sent to `gateway`.
    pub fn new(
        host: Arc<dyn SourceControlHost>,
        gateway: ImprovementGateway,
        settings: ImproverSettings,
    ) -> Self {
        Self {
            host,
            gateway,
            settings,
        }
    }

    /// Returns one [`ImprovedFile`] per source file with a non-empty rewrite,
    /// in discovery order.
    ///
    /// Completion failures and undecodable files are skipped. Listing or fetch
    /// failures and truncated payloads abort the stage.
    pub async fn improve_all(
        &self,
        repo: &RepositoryInfo,
        plan: &BranchPlan,
    ) -> Result<Vec<ImprovedFile>, ImproverError> {
        let snapshot = plan.base.head.as_str();
        let mut queue: VecDeque<FileEntry> =
            self.list(repo, &RepoPath::root(), snapshot).await?.into();
        let mut improved = Vec::new();
        let mut candidates = 0usize;

        while let Some(entry) = queue.pop_front() {
            match entry.kind {
                EntryKind::Dir => {
                    let children = self.list(repo, &entry.path, snapshot).await?;
                    queue.extend(children);
                }
                EntryKind::File if entry.path.has_extension(&self.settings.source_extension) => {
                    candidates += 1;
                    if let Some(file) = self.improve_file(repo, entry, snapshot).await? {
                        improved.push(file);
                    }
                }
                _ => debug!(path = %entry.path, kind = ?entry.kind, "skipping entry"),
            }
        }

        info!(candidates, improved = improved.len(), "finished processing source files");
        Ok(improved)
    }

    async fn list(
        &self,
        repo: &RepositoryInfo,
        path: &RepoPath,
        snapshot: &str,
    ) -> Result<Vec<FileEntry>, ImproverError> {
        self.host
            .list_directory(&repo.handle, path, snapshot)
            .await
            .map_err(|e| ImproverError::TraversalError {
                path: path.clone(),
                message: e.to_string(),
            })
    }

    /// Loads the full content of `entry`, re-fetching when the listing did not
    /// inline it or the blob is large, and checks it is complete.
    async fn load_source(
        &self,
        repo: &RepositoryInfo,
        entry: FileEntry,
        snapshot: &str,
    ) -> Result<Option<(RepoPath, String)>, ImproverError> {
        let entry = if entry.content.is_none() || entry.size > self.settings.large_file_threshold
        {
            self.host
                .get_file(&repo.handle, &entry.path, snapshot)
                .await
                .map_err(|e| ImproverError::TraversalError {
                    path: entry.path.clone(),
                    message: e.to_string(),
                })?
        } else {
            entry
        };

        let bytes = match entry.decode_bytes() {
            Some(Ok(bytes)) => bytes,
            Some(Err(e)) => {
                warn!(path = %entry.path, error = %e, "skipping undecodable file");
                return Ok(None);
            }
            None => Vec::new(),
        };
        let received = bytes.len() as u64;
        if received < entry.size {
            return Err(ImproverError::TruncatedContent {
                path: entry.path,
                expected: entry.size,
                received,
            });
        }

        match FileEntry::decode_text(bytes) {
            Ok(text) => Ok(Some((entry.path, text))),
            Err(e) => {
                warn!(path = %entry.path, error = %e, "skipping non-text file");
                Ok(None)
            }
        }
    }

    async fn improve_file(
        &self,
        repo: &RepositoryInfo,
        entry: FileEntry,
        snapshot: &str,
    ) -> Result<Option<ImprovedFile>, ImproverError> {
        let Some((path, source)) = self.load_source(repo, entry, snapshot).await? else {
            return Ok(None);
        };

        let Some(content) = self.gateway.improve(&path, &source).await else {
            return Ok(None);
        };

        let file = ImprovedFile::new(path, &source, content);
        info!(
            path = %file.path,
            lines_before = %file.original_lines,
            lines_after = %file.improved_lines,
            delta = file.line_delta(),
            "improved file"
        );
        Ok(Some(file))
    }
}
