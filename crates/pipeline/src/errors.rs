//! Error taxonomy for the improvement pipeline.
//!
//! [`ImproverError`] covers conditions that halt a run. Adapter-level failures
//! ([`HostError`] from the source-control host, [`CompletionError`] from the
//! completion service) are reported by the port traits and mapped onto the
//! taxonomy by the orchestration layer. Completion failures are the one
//! recoverable case: the file is skipped and the run continues.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BranchName, RepoPath};

// ---------------------------------------------------------------------------
// Adapter-level errors
// ---------------------------------------------------------------------------

/// A failed call to the source-control host.
///
/// `status` is the HTTP status of the response, or `None` when no response was
/// received (connection failure, malformed body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostError {
    /// HTTP status code, if a response was received.
    pub status: Option<u16>,
    /// The host's message (the `message` field of GitHub error bodies).
    pub message: String,
}

impl HostError {
    /// Creates an error for a response with the given status.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates an error for a request that produced no usable response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "host returned {status}: {}", self.message),
            None => write!(f, "host request failed: {}", self.message),
        }
    }
}

impl std::error::Error for HostError {}

/// A failed call to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CompletionError {
    /// The request could not be sent or the connection failed.
    #[error("completion request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status (quota, auth, overload).
    #[error("completion service returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message reported by the service.
        message: String,
    },

    /// The response body did not contain a completion.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// File content that could not be turned into text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The transported payload was not valid base64.
    #[error("content is not valid base64: {0}")]
    InvalidBase64(String),

    /// The decoded bytes were not valid UTF-8 text.
    #[error("content is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

// ---------------------------------------------------------------------------
// Pipeline-level errors
// ---------------------------------------------------------------------------

/// The Committer step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStep {
    /// Reading the base tree.
    FetchBaseTree,
    /// Writing the new tree.
    CreateTree,
    /// Reading the parent commit.
    FetchParentCommit,
    /// Writing the new commit.
    CreateCommit,
    /// Moving the branch reference.
    UpdateReference,
    /// Opening the pull request.
    CreatePullRequest,
}

impl std::fmt::Display for CommitStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FetchBaseTree => "fetch base tree",
            Self::CreateTree => "create tree",
            Self::FetchParentCommit => "fetch parent commit",
            Self::CreateCommit => "create commit",
            Self::UpdateReference => "update reference",
            Self::CreatePullRequest => "create pull request",
        };
        f.write_str(s)
    }
}

/// Errors that halt an improvement run.
///
/// Every variant is fatal. Prior side effects (notably the new branch) are
/// never rolled back.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ImproverError {
    /// A required credential was absent or blank. No network call was made.
    #[error("{variable} must be set as an environment variable")]
    MissingCredential {
        /// Name of the environment variable that was missing.
        variable: String,
    },

    /// The host rejected the token (401).
    #[error("Authentication failed: bad credentials. Please check your GITHUB_TOKEN")]
    BadCredentials,

    /// The token is valid but lacks access to the repository (403).
    #[error("Access forbidden: insufficient permissions for '{repository}'")]
    InsufficientPermissions {
        /// `owner/name` of the repository.
        repository: String,
    },

    /// The repository does not exist or is invisible to the token (404).
    #[error("Repository not found: '{repository}'")]
    RepositoryNotFound {
        /// `owner/name` of the repository.
        repository: String,
    },

    /// Any other failure while resolving the repository.
    #[error("Host error: {message}")]
    UnknownHostError {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// The host's message.
        message: String,
    },

    /// The improvement branch could not be created.
    #[error("Failed to create branch '{branch}': {message}")]
    BranchCreationError {
        /// The branch that was being created (or the default branch, when
        /// reading it failed).
        branch: BranchName,
        /// The host's message.
        message: String,
    },

    /// A directory listing or file fetch failed during traversal.
    #[error("Failed to read '{path}': {message}")]
    TraversalError {
        /// The path being listed or fetched.
        path: RepoPath,
        /// The host's message.
        message: String,
    },

    /// A large file was still incomplete after an explicit re-fetch.
    #[error("Content of '{path}' is truncated: expected {expected} bytes, received {received}")]
    TruncatedContent {
        /// The file path.
        path: RepoPath,
        /// Size reported by the host.
        expected: u64,
        /// Bytes actually received after decoding.
        received: u64,
    },

    /// A step of the commit / pull request sequence failed.
    #[error("Commit pipeline failed at '{step}': {message}")]
    CommitPipelineError {
        /// The failing step.
        step: CommitStep,
        /// The host's message.
        message: String,
    },

    /// Invalid input or configuration (e.g. malformed repository identifier).
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },
}

impl ImproverError {
    /// Maps a failed repository lookup onto the authentication error kinds.
    pub fn from_repository_lookup(repository: &str, error: HostError) -> Self {
        match error.status {
            Some(401) => Self::BadCredentials,
            Some(403) => Self::InsufficientPermissions {
                repository: repository.to_string(),
            },
            Some(404) => Self::RepositoryNotFound {
                repository: repository.to_string(),
            },
            status => Self::UnknownHostError {
                status,
                message: error.message,
            },
        }
    }

    /// Wraps a host failure during the commit sequence.
    pub fn commit_step(step: CommitStep, error: HostError) -> Self {
        Self::CommitPipelineError {
            step,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
