//! repo-improver GitHub infrastructure adapter.
//!
//! Implements the [`pipeline::SourceControlHost`] port against the GitHub REST
//! API (v3) using `reqwest`: repository lookup, branch and reference
//! management, contents listing, the Git data API (trees and commits), and pull
//! request creation.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! All GitHub API details (headers, URL encoding, response shapes, error
//! bodies) are handled here; the [`pipeline`] crate never sees them.
//!
//! Calls are never retried. Failures are flattened into
//! [`pipeline::HostError`] with the HTTP status preserved.

mod client;
mod errors;
mod models;

pub use client::{GithubClient, DEFAULT_API_URL};
pub use errors::GithubError;
