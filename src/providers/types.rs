// Unified request/response types for multi-provider completion calls
//
// Every agent call is a single prompt in, text out. Providers translate this
// into their own wire format.

use serde::Serialize;

use crate::config::constants::DEFAULT_MAX_TOKENS;

/// Chat role a prompt is delivered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
}

impl PromptRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptRole::System => "system",
            PromptRole::User => "user",
        }
    }
}

/// Unified request format for all providers
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRequest {
    /// The full prompt text
    pub prompt: String,

    /// Role the prompt is sent under. Agent prompts carry their own
    /// instructions, so they go out as a system message by default.
    pub prompt_role: PromptRole,

    /// Model name (empty = provider default)
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature (0.0 to 2.0, optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ProviderRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            prompt_role: PromptRole::System,
            model: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_prompt_role(mut self, role: PromptRole) -> Self {
        self.prompt_role = role;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Unified response from any provider
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Response id (synthetic for providers that do not return one)
    pub id: String,

    /// Model that actually answered
    pub model: String,

    /// Concatenated text content
    pub text: String,

    /// Why generation stopped, when reported
    pub stop_reason: Option<String>,

    /// Provider name that produced this response
    pub provider: String,
}

impl ProviderResponse {
    /// True when the provider cut the output short at the token limit.
    ///
    /// Truncated JSON is the most common cause of malformed responses, so
    /// callers log this.
    pub fn is_truncated(&self) -> bool {
        matches!(
            self.stop_reason.as_deref(),
            Some("length") | Some("MAX_TOKENS") | Some("max_tokens")
        )
    }
}
