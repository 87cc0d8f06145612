//! Wire types for the subset of the GitHub REST API the client uses.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! response bodies is ignored by serde.

use pipeline::{
    Branch, BranchName, CommitInfo, CommitSha, EntryKind, FileEntry, PullRequest,
    PullRequestNumber, RepoPath, RepositoryHandle, RepositoryInfo, TreeEntry, TreeSha,
};
use serde::{Deserialize, Serialize};

use crate::GithubError;

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Error body returned on non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryResponse {
    pub full_name: String,
    pub default_branch: String,
}

impl RepositoryResponse {
    pub fn into_info(self, handle: &RepositoryHandle) -> Result<RepositoryInfo, GithubError> {
        let default_branch = BranchName::new(self.default_branch)
            .ok_or(GithubError::MissingField("default_branch"))?;
        Ok(RepositoryInfo {
            handle: handle.clone(),
            full_name: self.full_name,
            default_branch,
        })
    }
}

/// An object reference (`{"sha": "..."}`) embedded in larger payloads.
#[derive(Debug, Deserialize)]
pub(crate) struct ShaRef {
    pub sha: String,
}

/// `GET /repos/{owner}/{repo}/branches/{branch}`
#[derive(Debug, Deserialize)]
pub(crate) struct BranchResponse {
    pub name: String,
    pub commit: ShaRef,
}

impl TryFrom<BranchResponse> for Branch {
    type Error = GithubError;

    fn try_from(value: BranchResponse) -> Result<Self, Self::Error> {
        Ok(Branch {
            name: BranchName::new(value.name).ok_or(GithubError::MissingField("name"))?,
            head: CommitSha::new(value.commit.sha).ok_or(GithubError::MissingField("commit.sha"))?,
        })
    }
}

/// One item of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentItem {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ContentItem {
    /// A file whose payload was left out because it is over the contents
    /// API's 1 MB limit. Its bytes must come from the blob endpoint.
    pub fn needs_blob(&self) -> bool {
        self.kind == "file" && self.encoding.as_deref() == Some("none")
    }
}

impl TryFrom<ContentItem> for FileEntry {
    type Error = GithubError;

    fn try_from(item: ContentItem) -> Result<Self, Self::Error> {
        let kind = match item.kind.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            "symlink" => EntryKind::Symlink,
            "submodule" => EntryKind::Submodule,
            other => return Err(GithubError::UnknownEntryKind(other.to_string())),
        };
        // Blobs over 1 MB come back with `encoding: "none"` and an empty payload.
        let content = match item.encoding.as_deref() {
            Some("base64") => item.content,
            _ => None,
        };
        Ok(FileEntry {
            path: RepoPath::new(item.path).ok_or(GithubError::MissingField("path"))?,
            kind,
            size: item.size,
            content,
        })
    }
}

/// `GET /repos/{owner}/{repo}/git/blobs/{sha}`
#[derive(Debug, Deserialize)]
pub(crate) struct BlobResponse {
    pub content: String,
    pub encoding: String,
}

impl BlobResponse {
    /// Returns the base64 payload. Other encodings are rejected.
    pub fn into_base64(self) -> Result<String, GithubError> {
        if self.encoding == "base64" {
            Ok(self.content)
        } else {
            Err(GithubError::UnexpectedResponse(format!(
                "blob encoding '{}'",
                self.encoding
            )))
        }
    }
}

/// The contents endpoint returns an array for directories and an object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ContentsResponse {
    Listing(Vec<ContentItem>),
    Single(ContentItem),
}

/// `GET /repos/{owner}/{repo}/git/trees/{sha}` and `POST .../git/trees`
#[derive(Debug, Deserialize)]
pub(crate) struct TreeResponse {
    pub sha: String,
}

impl TryFrom<TreeResponse> for TreeSha {
    type Error = GithubError;

    fn try_from(value: TreeResponse) -> Result<Self, Self::Error> {
        TreeSha::new(value.sha).ok_or(GithubError::MissingField("sha"))
    }
}

/// `GET /repos/{owner}/{repo}/git/commits/{sha}` and `POST .../git/commits`
#[derive(Debug, Deserialize)]
pub(crate) struct CommitResponse {
    pub sha: String,
    pub tree: ShaRef,
}

impl TryFrom<CommitResponse> for CommitInfo {
    type Error = GithubError;

    fn try_from(value: CommitResponse) -> Result<Self, Self::Error> {
        Ok(CommitInfo {
            sha: CommitSha::new(value.sha).ok_or(GithubError::MissingField("sha"))?,
            tree: TreeSha::new(value.tree.sha).ok_or(GithubError::MissingField("tree.sha"))?,
        })
    }
}

/// `POST /repos/{owner}/{repo}/pulls`
#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestResponse {
    pub number: u64,
    pub html_url: String,
}

impl PullRequestResponse {
    pub fn into_pull_request(self, head: &BranchName, base: &BranchName) -> PullRequest {
        PullRequest {
            number: PullRequestNumber::new(self.number),
            html_url: self.html_url,
            head: head.clone(),
            base: base.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `POST /repos/{owner}/{repo}/git/refs`
#[derive(Debug, Serialize)]
pub(crate) struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: &'a str,
}

/// `PATCH /repos/{owner}/{repo}/git/refs/heads/{branch}`
#[derive(Debug, Serialize)]
pub(crate) struct UpdateRefRequest<'a> {
    pub sha: &'a str,
    pub force: bool,
}

/// One element of a tree creation request.
#[derive(Debug, Serialize)]
pub(crate) struct TreeElement<'a> {
    pub path: &'a str,
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: &'a str,
}

impl<'a> From<&'a TreeEntry> for TreeElement<'a> {
    fn from(entry: &'a TreeEntry) -> Self {
        Self {
            path: entry.path.as_str(),
            mode: entry.mode.as_str(),
            kind: "blob",
            content: &entry.content,
        }
    }
}

/// `POST /repos/{owner}/{repo}/git/trees`
#[derive(Debug, Serialize)]
pub(crate) struct CreateTreeRequest<'a> {
    pub base_tree: &'a str,
    pub tree: Vec<TreeElement<'a>>,
}

/// `POST /repos/{owner}/{repo}/git/commits`
#[derive(Debug, Serialize)]
pub(crate) struct CreateCommitRequest<'a> {
    pub message: &'a str,
    pub tree: &'a str,
    pub parents: Vec<&'a str>,
}

/// `POST /repos/{owner}/{repo}/pulls`
#[derive(Debug, Serialize)]
pub(crate) struct CreatePullRequest<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub head: &'a str,
    pub base: &'a str,
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
