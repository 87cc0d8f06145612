//! In-memory fakes of both ports with call recording.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::TimeZone;
use pipeline::{
    Branch, BranchName, BranchPlan, ChatRole, CommitInfo, CommitSha, CompletionError,
    CompletionRequest, CompletionService, EntryKind, FileEntry, HostError, ImproverSettings,
    NewCommit, NewPullRequest, PullRequest, PullRequestNumber, RepoPath, RepositoryHandle,
    RepositoryInfo, SourceControlHost, Timestamp, TreeEntry, TreeSha,
};

pub const BASE_SHA: &str = "base-sha";
pub const BASE_TREE: &str = "base-tree";
pub const NEW_TREE: &str = "new-tree";
pub const NEW_COMMIT: &str = "new-commit";
pub const PR_URL: &str = "https://github.com/octo/repo/pull/7";

/// 2024-01-02 03:04:05 UTC.
pub fn fixed_clock() -> Timestamp {
    Timestamp::from_utc(chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
}

pub const FIXED_BRANCH: &str = "code-improvements-20240102030405";

pub fn handle() -> RepositoryHandle {
    RepositoryHandle::new("octo", "repo").unwrap()
}

pub fn repo_info() -> RepositoryInfo {
    RepositoryInfo {
        handle: handle(),
        full_name: "octo/repo".to_string(),
        default_branch: BranchName::new("main").unwrap(),
    }
}

pub fn branch_plan() -> BranchPlan {
    BranchPlan {
        base: Branch {
            name: BranchName::new("main").unwrap(),
            head: CommitSha::new(BASE_SHA).unwrap(),
        },
        head: BranchName::new(FIXED_BRANCH).unwrap(),
    }
}

pub fn settings() -> ImproverSettings {
    ImproverSettings::default()
}

// ---------------------------------------------------------------------------
// Source-control host
// ---------------------------------------------------------------------------

/// One recorded host call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    GetRepository,
    GetBranch(String),
    CreateBranchRef { branch: String, sha: String },
    ListDirectory { path: String, git_ref: String },
    GetFile { path: String, git_ref: String },
    GetTree(String),
    CreateTree { base_tree: String, entries: Vec<(String, String)> },
    GetCommit(String),
    CreateCommit { message: String, tree: String, parents: Vec<String> },
    UpdateBranchRef { branch: String, sha: String },
    CreatePullRequest { title: String, body: String, head: String, base: String },
}

impl HostCall {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::CreateBranchRef { .. }
                | Self::CreateTree { .. }
                | Self::CreateCommit { .. }
                | Self::UpdateBranchRef { .. }
                | Self::CreatePullRequest { .. }
        )
    }
}

/// A repository held in memory. Directory listings omit content; `get_file`
/// returns it, like the real contents API.
#[derive(Default)]
pub struct FakeHost {
    calls: Mutex<Vec<HostCall>>,
    listings: HashMap<String, Vec<FileEntry>>,
    files: HashMap<String, FileEntry>,
    failures: HashMap<&'static str, HostError>,
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

impl FakeHost {
    pub fn new() -> Self {
        let mut host = Self::default();
        host.listings.insert(String::new(), Vec::new());
        host
    }

    fn ensure_dir(&mut self, dir: &str) {
        if dir.is_empty() || self.listings.contains_key(dir) {
            return;
        }
        self.listings.insert(dir.to_string(), Vec::new());
        let parent = parent_of(dir).to_string();
        self.ensure_dir(&parent);
        self.listings.entry(parent).or_default().push(FileEntry {
            path: RepoPath::new(dir).unwrap(),
            kind: EntryKind::Dir,
            size: 0,
            content: None,
        });
    }

    fn add_entry(&mut self, listed: FileEntry, fetched: FileEntry) {
        let parent = parent_of(listed.path.as_str()).to_string();
        self.ensure_dir(&parent);
        self.files.insert(listed.path.as_str().to_string(), fetched);
        self.listings.entry(parent).or_default().push(listed);
    }

    /// Adds a text file.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        let fetched = FileEntry {
            path: RepoPath::new(path).unwrap(),
            kind: EntryKind::File,
            size: content.len() as u64,
            content: Some(STANDARD.encode(content)),
        };
        let listed = FileEntry {
            content: None,
            ..fetched.clone()
        };
        self.add_entry(listed, fetched);
        self
    }

    /// Adds a file whose fetched payload is `received` bytes short of `size`.
    pub fn with_truncated_file(mut self, path: &str, size: u64, received: &str) -> Self {
        let fetched = FileEntry {
            path: RepoPath::new(path).unwrap(),
            kind: EntryKind::File,
            size,
            content: (!received.is_empty()).then(|| STANDARD.encode(received)),
        };
        let listed = FileEntry {
            content: None,
            ..fetched.clone()
        };
        self.add_entry(listed, fetched);
        self
    }

    /// Adds a file with raw bytes (e.g. not UTF-8).
    pub fn with_binary_file(mut self, path: &str, bytes: &[u8]) -> Self {
        let fetched = FileEntry {
            path: RepoPath::new(path).unwrap(),
            kind: EntryKind::File,
            size: bytes.len() as u64,
            content: Some(STANDARD.encode(bytes)),
        };
        let listed = FileEntry {
            content: None,
            ..fetched.clone()
        };
        self.add_entry(listed, fetched);
        self
    }

    /// Adds a symlink entry.
    pub fn with_symlink(mut self, path: &str) -> Self {
        let entry = FileEntry {
            path: RepoPath::new(path).unwrap(),
            kind: EntryKind::Symlink,
            size: 0,
            content: None,
        };
        self.add_entry(entry.clone(), entry);
        self
    }

    /// Makes operation `op` (the trait method name) fail with `error`.
    pub fn failing(mut self, op: &'static str, error: HostError) -> Self {
        self.failures.insert(op, error);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_calls(&self) -> Vec<HostCall> {
        self.calls().into_iter().filter(HostCall::is_write).collect()
    }

    fn record(&self, op: &'static str, call: HostCall) -> Result<(), HostError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.get(op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SourceControlHost for FakeHost {
    async fn get_repository(&self, repo: &RepositoryHandle) -> Result<RepositoryInfo, HostError> {
        self.record("get_repository", HostCall::GetRepository)?;
        Ok(RepositoryInfo {
            handle: repo.clone(),
            full_name: repo.full_name(),
            default_branch: BranchName::new("main").unwrap(),
        })
    }

    async fn get_branch(
        &self,
        _repo: &RepositoryHandle,
        branch: &BranchName,
    ) -> Result<Branch, HostError> {
        self.record("get_branch", HostCall::GetBranch(branch.to_string()))?;
        Ok(Branch {
            name: branch.clone(),
            head: CommitSha::new(BASE_SHA).unwrap(),
        })
    }

    async fn create_branch_ref(
        &self,
        _repo: &RepositoryHandle,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), HostError> {
        self.record(
            "create_branch_ref",
            HostCall::CreateBranchRef {
                branch: branch.to_string(),
                sha: sha.to_string(),
            },
        )
    }

    async fn list_directory(
        &self,
        _repo: &RepositoryHandle,
        path: &RepoPath,
        git_ref: &str,
    ) -> Result<Vec<FileEntry>, HostError> {
        self.record(
            "list_directory",
            HostCall::ListDirectory {
                path: path.to_string(),
                git_ref: git_ref.to_string(),
            },
        )?;
        self.listings
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| HostError::with_status(404, "Not Found"))
    }

    async fn get_file(
        &self,
        _repo: &RepositoryHandle,
        path: &RepoPath,
        git_ref: &str,
    ) -> Result<FileEntry, HostError> {
        self.record(
            "get_file",
            HostCall::GetFile {
                path: path.to_string(),
                git_ref: git_ref.to_string(),
            },
        )?;
        self.files
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| HostError::with_status(404, "Not Found"))
    }

    async fn get_tree(&self, _repo: &RepositoryHandle, sha: &CommitSha) -> Result<TreeSha, HostError> {
        self.record("get_tree", HostCall::GetTree(sha.to_string()))?;
        Ok(TreeSha::new(BASE_TREE).unwrap())
    }

    async fn create_tree(
        &self,
        _repo: &RepositoryHandle,
        base_tree: &TreeSha,
        entries: &[TreeEntry],
    ) -> Result<TreeSha, HostError> {
        self.record(
            "create_tree",
            HostCall::CreateTree {
                base_tree: base_tree.to_string(),
                entries: entries
                    .iter()
                    .map(|e| (e.path.to_string(), e.content.clone()))
                    .collect(),
            },
        )?;
        Ok(TreeSha::new(NEW_TREE).unwrap())
    }

    async fn get_commit(
        &self,
        _repo: &RepositoryHandle,
        sha: &CommitSha,
    ) -> Result<CommitInfo, HostError> {
        self.record("get_commit", HostCall::GetCommit(sha.to_string()))?;
        Ok(CommitInfo {
            sha: sha.clone(),
            tree: TreeSha::new(BASE_TREE).unwrap(),
        })
    }

    async fn create_commit(
        &self,
        _repo: &RepositoryHandle,
        commit: &NewCommit,
    ) -> Result<CommitSha, HostError> {
        self.record(
            "create_commit",
            HostCall::CreateCommit {
                message: commit.message.clone(),
                tree: commit.tree.to_string(),
                parents: commit.parents.iter().map(ToString::to_string).collect(),
            },
        )?;
        Ok(CommitSha::new(NEW_COMMIT).unwrap())
    }

    async fn update_branch_ref(
        &self,
        _repo: &RepositoryHandle,
        branch: &BranchName,
        sha: &CommitSha,
    ) -> Result<(), HostError> {
        self.record(
            "update_branch_ref",
            HostCall::UpdateBranchRef {
                branch: branch.to_string(),
                sha: sha.to_string(),
            },
        )
    }

    async fn create_pull_request(
        &self,
        _repo: &RepositoryHandle,
        pull_request: &NewPullRequest,
    ) -> Result<PullRequest, HostError> {
        self.record(
            "create_pull_request",
            HostCall::CreatePullRequest {
                title: pull_request.title.clone(),
                body: pull_request.body.clone(),
                head: pull_request.head.to_string(),
                base: pull_request.base.to_string(),
            },
        )?;
        Ok(PullRequest {
            number: PullRequestNumber::new(7),
            html_url: PR_URL.to_string(),
            head: pull_request.head.clone(),
            base: pull_request.base.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Completion service
// ---------------------------------------------------------------------------

/// Answers by matching the end of the user message against registered sources.
#[derive(Default)]
pub struct FakeCompletion {
    responses: Vec<(String, Result<String, CompletionError>)>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `improved` for a file whose source is `source`.
    pub fn improving(mut self, source: &str, improved: &str) -> Self {
        self.responses
            .push((source.to_string(), Ok(improved.to_string())));
        self
    }

    /// Fails for a file whose source is `source`.
    pub fn failing_on(mut self, source: &str, error: CompletionError) -> Self {
        self.responses.push((source.to_string(), Err(error)));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The source texts that were submitted, in order.
    pub fn submitted_sources(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| r.messages.iter().find(|m| m.role == ChatRole::User))
            .map(|m| {
                m.content
                    .split_once("\n\n")
                    .map(|(_, source)| source.to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        let user = request
            .messages
            .iter()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        self.responses
            .iter()
            .find(|(source, _)| user.ends_with(&format!("\n\n{source}")))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Ok(String::new()))
    }
}
