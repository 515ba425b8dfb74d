// Multi-provider LLM support
//
// This module provides an abstraction layer over the completion APIs the
// agents can run against (DeepSeek, Groq, Gemini, OpenAI) behind a single
// prompt-in, text-out interface.

use anyhow::Result;
use async_trait::async_trait;

pub mod types;

// Provider implementations
pub mod gemini;
pub mod openai;

// Provider factory
pub mod factory;

pub use factory::create_provider_from_entry;
pub use gemini::GeminiProvider;
pub use openai::OpenAIProvider;
pub use types::{PromptRole, ProviderRequest, ProviderResponse};

/// Trait for LLM providers
///
/// Implementations make exactly one HTTP call per `send_message` and never
/// retry: retry policy belongs to the feedback loop.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a prompt and wait for the complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "deepseek", "groq", "gemini")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}
