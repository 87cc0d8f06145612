//! repo-improver LLM provider infrastructure adapter.
//!
//! Implements the [`pipeline::CompletionService`] trait for OpenAI's chat
//! completions API. Other providers are added as new `impl` blocks in this
//! crate without any changes to the `pipeline` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, and response
//! parsing live here. The [`pipeline`] crate sees only
//! [`pipeline::CompletionService`]. Requests are never retried; a failed call
//! is reported as [`pipeline::CompletionError`] and the caller decides what to
//! skip.

mod openai;

pub use openai::{OpenAiProvider, ProviderError, DEFAULT_BASE_URL};
