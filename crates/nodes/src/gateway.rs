//! LLM gateway: prompt construction and the per-file skip policy.
//!
//! Every completion call goes through [`ImprovementGateway::improve`], which
//! never fails. Errors are logged and reported as "no improvement".

use std::sync::Arc;

use pipeline::{
    ChatMessage, ChatRole, CompletionRequest, CompletionService, ImproverSettings, RepoPath,
};
use tracing::{debug, error};

/// Fixes the model's role for every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that improves Python code quality: \
readability, efficiency, and compliance with coding standards. Only return the code itself, \
without explanations or Markdown fences. If no improvement is found, return nothing.";

/// Precedes the source text in the user message.
pub const USER_PROMPT_PREFIX: &str = "Improve the following Python code for better readability, \
efficiency, and compliance with PEP8 standards:";

/// Wraps the completion service with the improvement prompt.
#[derive(Clone)]
pub struct ImprovementGateway {
    service: Arc<dyn CompletionService>,
    settings: ImproverSettings,
}

impl ImprovementGateway {
    /// Wraps `service`. Model and sampling parameters come from `settings`.
    pub fn new(service: Arc<dyn CompletionService>, settings: ImproverSettings) -> Self {
        Self { service, settings }
    }

    /// Builds the chat request for one file's source text.
    pub fn request_for(&self, source: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage {
                    role: ChatRole::System,
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: ChatRole::User,
                    content: format!("{USER_PROMPT_PREFIX}\n\n{source}"),
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Returns the trimmed rewrite, or `None` when the call failed or the
    /// model returned only whitespace.
    pub async fn improve(&self, path: &RepoPath, source: &str) -> Option<String> {
        let request = self.request_for(source);
        match self.service.complete(&request).await {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    debug!(%path, "completion returned no improvement");
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(e) => {
                error!(%path, error = %e, "completion call failed, skipping file");
                None
            }
        }
    }
}
