//! repo-improver pipeline stages and LLM gateway.
//!
//! This crate provides the four pipeline stages (Authenticator through
//! Committer), the LLM gateway that wraps every completion call with the
//! improvement prompt and the skip policy, and the [`RepositoryImprover`]
//! executor that drives one run.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Stages sequence calls between the domain types in
//! the [`pipeline`] crate and the infrastructure ports (source-control host,
//! completion service). They map adapter failures onto
//! [`pipeline::ImproverError`] and contain no transport details.
//!
//! ## Flow
//!
//! | Stage | Host writes | Fatal errors |
//! |-------|-------------|--------------|
//! | [`Authenticator`] | none | `MissingCredential`, `BadCredentials`, `InsufficientPermissions`, `RepositoryNotFound`, `UnknownHostError` |
//! | [`BranchInitializer`] | one reference | `BranchCreationError` |
//! | [`FileImprover`] | none | `TraversalError`, `TruncatedContent` |
//! | [`Committer`] | tree, commit, reference update, pull request | `CommitPipelineError` |

mod authenticator;
mod branch;
mod committer;
mod executor;
mod gateway;
mod improver;

pub use authenticator::Authenticator;
pub use branch::BranchInitializer;
pub use committer::Committer;
pub use executor::{Clients, RepositoryImprover, RunReport};
pub use gateway::{ImprovementGateway, SYSTEM_PROMPT, USER_PROMPT_PREFIX};
pub use improver::FileImprover;
