//! Run settings and credentials.
//!
//! [`ImproverSettings`] holds every fixed value a run uses (prompt parameters,
//! naming, commit text). [`Credentials`] holds the two secrets and is only ever
//! constructed through [`Credentials::from_lookup`], which enforces that both
//! are present.

use serde::{Deserialize, Serialize};

use crate::errors::ImproverError;

/// Environment variable holding the GitHub token.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable holding the completion service API key.
pub const COMPLETION_API_KEY_VAR: &str = "OPENAI_API_KEY";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The source-control token and completion-service key for one run.
///
/// `Debug` output redacts both values.
#[derive(Clone)]
pub struct Credentials {
    github_token: String,
    completion_api_key: String,
}

impl Credentials {
    /// Looks both credentials up by variable name.
    ///
    /// A missing or whitespace-only value yields
    /// [`ImproverError::MissingCredential`]. The GitHub token is checked first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ImproverError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |variable: &str| {
            lookup(variable)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ImproverError::MissingCredential {
                    variable: variable.to_string(),
                })
        };

        let github_token = require(GITHUB_TOKEN_VAR)?;
        let completion_api_key = require(COMPLETION_API_KEY_VAR)?;
        Ok(Self {
            github_token,
            completion_api_key,
        })
    }

    /// The GitHub token.
    pub fn github_token(&self) -> &str {
        &self.github_token
    }

    /// The completion-service API key.
    pub fn completion_api_key(&self) -> &str {
        &self.completion_api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &"<redacted>")
            .field("completion_api_key", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Fixed parameters of an improvement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImproverSettings {
    /// Files whose path ends with this suffix are sent for improvement.
    pub source_extension: String,
    /// Prefix of the improvement branch; a `YYYYMMDDHHMMSS` stamp is appended.
    pub branch_prefix: String,
    /// Files larger than this (bytes) are re-fetched pinned to the base branch.
    pub large_file_threshold: u64,
    /// Completion model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Output length cap in tokens.
    pub max_tokens: u32,
    /// Message of the single improvement commit.
    pub commit_message: String,
    /// Pull request title.
    pub pull_request_title: String,
    /// Pull request body.
    pub pull_request_body: String,
}

impl Default for ImproverSettings {
    fn default() -> Self {
        Self {
            source_extension: ".py".to_string(),
            branch_prefix: "code-improvements-".to_string(),
            large_file_threshold: 1_000_000,
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 1500,
            commit_message: "Automated code improvements using GPT-4".to_string(),
            pull_request_title: "Automated Code Improvements".to_string(),
            pull_request_body: "This PR includes code improvements made by GPT-4.".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
