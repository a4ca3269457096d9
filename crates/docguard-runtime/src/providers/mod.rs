//! LLM provider abstractions for docguard-runtime.
//!
//! This module defines the trait for LLM providers and includes
//! implementations for Anthropic and OpenAI.
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling.
//! See [`ApiCredential`] for the recommended patterns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use docguard_core::JudgeError;

mod anthropic;
mod factory;
mod openai;
pub mod secrets;

pub use anthropic::{AnthropicProvider, AnthropicProviderFactory, ANTHROPIC_API_KEY_ENV};
pub use factory::{ProviderFactory, ProviderRegistry};
pub use openai::{OpenAiProvider, OpenAiProviderFactory, OPENAI_API_KEY_ENV};
pub use secrets::{ApiCredential, CredentialSource};

/// Errors from LLM providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl From<ProviderError> for JudgeError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::HttpError(msg) => JudgeError::Transport(msg),
            ProviderError::RateLimited { .. } => JudgeError::RateLimited,
            ProviderError::ApiError { status, message } => JudgeError::Service { status, message },
            ProviderError::ParseError(msg) => {
                JudgeError::Transport(format!("unreadable provider envelope: {}", msg))
            }
            ProviderError::AuthError => JudgeError::Service {
                status: 401,
                message: "authentication failed".to_string(),
            },
            ProviderError::Timeout(after) => JudgeError::Timeout(after),
            ProviderError::NotConfigured(msg) => JudgeError::NotConfigured(msg),
        }
    }
}

/// Configuration for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature (0.0 for deterministic)
    pub temperature: f32,

    /// Request timeout
    pub timeout: Duration,

    /// Enable prompt caching (Anthropic-specific)
    pub prompt_caching: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: anthropic::DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            timeout: Duration::from_secs(30),
            prompt_caching: true,
        }
    }
}

/// A chat message for LLM completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response from an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,

    /// Token usage
    pub usage: TokenUsage,

    /// Model used
    pub model: String,

    /// Stop reason
    pub stop_reason: Option<String>,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,

    /// Tokens in the completion
    pub completion_tokens: u32,

    /// Tokens read from cache (Anthropic)
    pub cache_read_tokens: u32,

    /// Tokens written to cache (Anthropic)
    pub cache_creation_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

/// Provider abstraction allows swapping LLM backends.
///
/// The only place docguard talks to an LLM. The core workflow never sees a
/// provider directly; it goes through [`crate::LlmJudge`].
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Check if provider is healthy.
    async fn health_check(&self) -> bool;

    /// Get provider name for logs.
    fn name(&self) -> &str;

    /// Estimate tokens for a prompt.
    fn estimate_tokens(&self, text: &str) -> u32 {
        // Simple estimate: ~4 chars per token
        (text.len() / 4) as u32
    }
}

/// Split a system message out of a chat transcript.
///
/// Providers that take the system prompt as a separate field use this.
pub(crate) fn split_system(messages: Vec<ChatMessage>) -> (Option<String>, Vec<ChatMessage>) {
    let mut system = None;
    let mut others = Vec::new();

    for msg in messages {
        if msg.role == "system" {
            system = Some(msg.content);
        } else {
            others.push(msg);
        }
    }
    (system, others)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_creation() {
        let system = ChatMessage::system("You are a JSON validation expert.");
        assert_eq!(system.role, "system");

        let user = ChatMessage::user("Validate this.");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
            cache_read_tokens: 0,
            cache_creation_tokens: 0,
        };
        assert_eq!(usage.total(), 150);
    }

    #[test]
    fn test_token_usage_total_saturates() {
        let usage = TokenUsage {
            prompt_tokens: u32::MAX,
            completion_tokens: 10,
            ..TokenUsage::default()
        };
        assert_eq!(usage.total(), u32::MAX);
    }

    #[test]
    fn test_split_system() {
        let (system, rest) = split_system(vec![
            ChatMessage::system("rules"),
            ChatMessage::user("doc"),
        ]);
        assert_eq!(system.as_deref(), Some("rules"));
        assert_eq!(rest, vec![ChatMessage::user("doc")]);
    }

    #[test]
    fn test_provider_error_maps_to_judge_error() {
        let err: JudgeError = ProviderError::Timeout(Duration::from_secs(3)).into();
        assert_eq!(err, JudgeError::Timeout(Duration::from_secs(3)));

        let err: JudgeError = ProviderError::ApiError {
            status: 500,
            message: "overloaded".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "service returned 500: overloaded");

        let err: JudgeError = ProviderError::HttpError("dns failure".to_string()).into();
        assert_eq!(err.to_string(), "dns failure");
    }
}
