//! # docguard-runtime
//!
//! LLM-backed semantic judges for docguard.
//!
//! `docguard-core` never talks to the network. This crate supplies the
//! [`SemanticJudge`](docguard_core::SemanticJudge) that does: an
//! [`LlmJudge`] wrapping one of the registered [`LlmProvider`]s, configured
//! from a [`RuntimeConfig`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use docguard_runtime::{build_workflow, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_yaml_file("docguard.yaml")?;
//! let workflow = build_workflow(&config)?;
//! let report = workflow.validate(&request);
//! ```

pub mod config;
pub mod judge;
pub mod providers;

use std::sync::Arc;

use docguard_core::{StructuralValidator, Workflow};
use thiserror::Error;

pub use config::{ConfigError, RuntimeConfig};
pub use judge::LlmJudge;
pub use providers::{
    ApiCredential, ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    ProviderFactory, ProviderRegistry, TokenUsage,
};

/// Errors from assembling a runtime workflow.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("LLM provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("failed to start async runtime: {0}")]
    Runtime(String),
}

/// Build a workflow using the built-in provider registry.
pub fn build_workflow(config: &RuntimeConfig) -> Result<Workflow, RuntimeError> {
    build_workflow_with(config, &ProviderRegistry::with_defaults())
}

/// Build a workflow, resolving `config.provider` in `registry`.
pub fn build_workflow_with(
    config: &RuntimeConfig,
    registry: &ProviderRegistry,
) -> Result<Workflow, RuntimeError> {
    config.validate_against(registry)?;

    let provider_config = config.provider_config();
    registry.validate(&config.provider, &provider_config)?;
    let provider = registry.create(&config.provider, &provider_config)?;

    let default_model = registry
        .default_config(&config.provider)
        .and_then(|defaults| defaults["model"].as_str().map(str::to_string))
        .unwrap_or_else(|| CompletionConfig::default().model);
    let completion = config.completion_config(&default_model);

    tracing::info!(
        provider = provider.name(),
        model = %completion.model,
        timeout = ?completion.timeout,
        validate_formats = config.validate_formats,
        "semantic judge configured"
    );

    let judge = LlmJudge::new(provider, completion)?;
    if !judge.is_ready() {
        return Err(RuntimeError::Provider(ProviderError::NotConfigured(format!(
            "{} provider failed its health check",
            config.provider
        ))));
    }

    Workflow::builder()
        .judge(Arc::new(judge))
        .structural(StructuralValidator::new().with_format_validation(config.validate_formats))
        .build()
        .ok_or_else(|| RuntimeError::Runtime("workflow has no judge".to_string()))
}
