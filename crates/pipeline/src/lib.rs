//! Core domain for repo-improver.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, and error type used by the improvement pipeline. Infrastructure crates
//! implement the port traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`BranchName`, `CommitSha`, `RepositoryHandle`, etc.) |
//! | [`types`] | Shared value types (`FileEntry`, `ImprovedFile`, `LineCount`, etc.) |
//! | [`errors`] | Error taxonomy and adapter-level errors |
//! | [`config`] | `ImproverSettings` and `Credentials` |
//! | [`ports`] | `SourceControlHost` and `CompletionService` traits |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{Credentials, ImproverSettings, COMPLETION_API_KEY_VAR, GITHUB_TOKEN_VAR};
pub use errors::{CommitStep, CompletionError, ContentError, HostError, ImproverError};
pub use identifiers::{
    BranchName, CommitSha, PullRequestNumber, RepoPath, RepositoryHandle, RunId, TreeSha,
};
pub use ports::{CompletionService, SourceControlHost};
pub use types::{
    Branch, BranchPlan, ChatMessage, ChatRole, CommitInfo, CompletionRequest, EntryKind,
    FileEntry, FileMode, ImprovedFile, LineCount, NewCommit, NewPullRequest, PullRequest,
    RepositoryInfo, Timestamp, TreeEntry,
};
