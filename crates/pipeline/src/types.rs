//! Shared value types for the improvement pipeline.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the data that flows between stages: repository metadata, directory entries,
//! rewritten files, and the request shapes sent through the ports.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ContentError;
use crate::{BranchName, CommitSha, PullRequestNumber, RepoPath, RepositoryHandle, TreeSha};

// ---------------------------------------------------------------------------
// Line counts
// ---------------------------------------------------------------------------

/// Number of lines in a piece of source text.
///
/// Used to report how much a rewrite grew or shrank a file. Addition
/// saturates at `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineCount(u64);

impl LineCount {
    /// Creates a [`LineCount`] from a raw integer.
    pub fn new(count: u64) -> Self {
        Self(count)
    }

    /// Counts the lines of `text`. A trailing newline does not start a new line.
    pub fn of(text: &str) -> Self {
        Self(text.lines().count() as u64)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Signed difference `self - other`. Exact for every pair of counts.
    pub fn subtract(self, other: LineCount) -> i128 {
        i128::from(self.0) - i128::from(other.0)
    }
}

impl std::fmt::Display for LineCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add for LineCount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for LineCount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

// ---------------------------------------------------------------------------
// Repository and branches
// ---------------------------------------------------------------------------

/// A repository as resolved by the host during authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// The handle the run was started with.
    pub handle: RepositoryHandle,
    /// `owner/name` as reported by the host (canonical casing).
    pub full_name: String,
    /// The repository's primary branch.
    pub default_branch: BranchName,
}

/// A branch and the commit its reference points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: BranchName,
    /// Head commit.
    pub head: CommitSha,
}

/// The branches a run works with, fixed by the BranchInitializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPlan {
    /// The default branch as it was when the run started. Read-only.
    pub base: Branch,
    /// The freshly created improvement branch.
    pub head: BranchName,
}

// ---------------------------------------------------------------------------
// Directory traversal
// ---------------------------------------------------------------------------

/// Kind of a directory entry returned by the contents API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory; its children are listed separately.
    Dir,
    /// Symbolic link. Not followed.
    Symlink,
    /// Git submodule. Not followed.
    Submodule,
}

/// One entry of a directory listing, or a single fetched file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the repository root.
    pub path: RepoPath,
    /// Entry kind.
    pub kind: EntryKind,
    /// Size in bytes as reported by the host.
    pub size: u64,
    /// Base64 payload. `None` for directory listings and blobs too large to inline.
    pub content: Option<String>,
}

impl FileEntry {
    /// Decodes the base64 payload to raw bytes. Embedded line breaks are ignored.
    ///
    /// Returns `None` if the entry carries no payload.
    pub fn decode_bytes(&self) -> Option<Result<Vec<u8>, ContentError>> {
        self.content.as_ref().map(|encoded| {
            let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
            STANDARD
                .decode(compact.as_bytes())
                .map_err(|e| ContentError::InvalidBase64(e.to_string()))
        })
    }

    /// Decodes the payload to UTF-8 text.
    pub fn decode_text(bytes: Vec<u8>) -> Result<String, ContentError> {
        String::from_utf8(bytes).map_err(|e| ContentError::InvalidUtf8(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Improvements and commits
// ---------------------------------------------------------------------------

/// A source file rewritten by the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovedFile {
    /// Path relative to the repository root.
    pub path: RepoPath,
    /// Rewritten content (already trimmed, never empty).
    pub content: String,
    /// Lines in the original file.
    pub original_lines: LineCount,
    /// Lines in the rewritten file.
    pub improved_lines: LineCount,
}

impl ImprovedFile {
    /// Builds an improved file, counting lines of both versions.
    pub fn new(path: RepoPath, original: &str, content: String) -> Self {
        Self {
            original_lines: LineCount::of(original),
            improved_lines: LineCount::of(&content),
            path,
            content,
        }
    }

    /// Lines added (positive) or removed (negative) by the rewrite, clamped
    /// to the `i64` range.
    pub fn line_delta(&self) -> i64 {
        let delta = self.improved_lines.subtract(self.original_lines);
        delta.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }
}

/// Git file mode of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileMode {
    /// Non-executable regular file (`100644`).
    #[serde(rename = "100644")]
    Regular,
}

impl FileMode {
    /// The octal mode string used by the Git data API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "100644",
        }
    }
}

/// A blob entry to layer onto a base tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root.
    pub path: RepoPath,
    /// File mode.
    pub mode: FileMode,
    /// Inline blob content.
    pub content: String,
}

impl From<&ImprovedFile> for TreeEntry {
    fn from(file: &ImprovedFile) -> Self {
        Self {
            path: file.path.clone(),
            mode: FileMode::Regular,
            content: file.content.clone(),
        }
    }
}

/// A commit object as read from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit SHA.
    pub sha: CommitSha,
    /// Root tree of the commit.
    pub tree: TreeSha,
}

/// A commit to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommit {
    /// Commit message.
    pub message: String,
    /// Root tree.
    pub tree: TreeSha,
    /// Parent commits (exactly one for this tool).
    pub parents: Vec<CommitSha>,
}

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

/// A pull request to be opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPullRequest {
    /// Title.
    pub title: String,
    /// Body (Markdown).
    pub body: String,
    /// Branch containing the changes.
    pub head: BranchName,
    /// Branch the changes should be merged into.
    pub base: BranchName,
}

/// A pull request as created by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Host-assigned number.
    pub number: PullRequestNumber,
    /// Web URL for humans.
    pub html_url: String,
    /// Head branch.
    pub head: BranchName,
    /// Base branch.
    pub base: BranchName,
}

// ---------------------------------------------------------------------------
// Completion requests
// ---------------------------------------------------------------------------

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Fixes the model's role.
    System,
    /// Carries the source text.
    User,
}

/// One message of a chat-style completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: ChatRole,
    /// Text.
    pub content: String,
}

/// A single chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. `"gpt-4"`).
    pub model: String,
    /// System instruction followed by the user message.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Output length cap in tokens.
    pub max_tokens: u32,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Second-precision digits, `YYYYMMDDHHMMSS`.
    pub fn compact(self) -> String {
        self.0.format("%Y%m%d%H%M%S").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
