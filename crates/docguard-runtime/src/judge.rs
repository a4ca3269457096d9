//! Bridges an async [`LlmProvider`] to the blocking [`SemanticJudge`] seam.

use std::sync::Arc;

use docguard_core::{JudgeError, JudgeRequest, SemanticJudge};
use tokio::runtime::{Builder, Runtime};

use crate::providers::{ChatMessage, CompletionConfig, LlmProvider};
use crate::RuntimeError;

/// A [`SemanticJudge`] backed by an LLM provider.
///
/// Owns a current-thread tokio runtime and blocks on it for each call, so
/// [`judge`](SemanticJudge::judge) must not be called from inside another
/// async runtime. One attempt per call, bounded by
/// [`CompletionConfig::timeout`].
pub struct LlmJudge {
    provider: Arc<dyn LlmProvider>,
    config: CompletionConfig,
    runtime: Runtime,
}

impl LlmJudge {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        config: CompletionConfig,
    ) -> Result<Self, RuntimeError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RuntimeError::Runtime(e.to_string()))?;

        Ok(Self {
            provider,
            config,
            runtime,
        })
    }

    pub fn completion_config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Run the provider's health check.
    pub fn is_ready(&self) -> bool {
        self.runtime.block_on(self.provider.health_check())
    }
}

impl std::fmt::Debug for LlmJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmJudge")
            .field("provider", &self.provider.name())
            .field("model", &self.config.model)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl SemanticJudge for LlmJudge {
    fn judge(&self, request: &JudgeRequest) -> Result<String, JudgeError> {
        let messages = vec![
            ChatMessage::system(request.system_prompt()),
            ChatMessage::user(request.user_prompt()),
        ];

        let prompt_tokens: u32 = messages
            .iter()
            .map(|m| self.provider.estimate_tokens(&m.content))
            .sum();
        tracing::debug!(
            provider = self.provider.name(),
            model = %self.config.model,
            rules = request.rules.len(),
            prompt_tokens,
            "calling semantic judge"
        );

        let call = self.provider.complete(messages, &self.config);
        let response = self
            .runtime
            .block_on(async { tokio::time::timeout(self.config.timeout, call).await })
            .map_err(|_| JudgeError::Timeout(self.config.timeout))??;

        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            total_tokens = response.usage.total(),
            stop_reason = response.stop_reason.as_deref().unwrap_or("none"),
            "semantic judge answered"
        );

        Ok(response.content)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}
