// LLM gateway
//
// Single entry point the agents use to talk to the completion service.
// Wraps a provider with the run's model settings, a per-call deadline and
// JSON extraction for structured responses. No retries happen here.

pub mod extract;

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ForgeError, Result};
use crate::providers::{create_provider_from_entry, LlmProvider, ProviderRequest};

pub use extract::{extract_json_greedy, extract_json_object, strip_code_fences};

/// How the caller wants the response text returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Trimmed text as returned by the model
    Raw,
    /// JSON object located inside the text
    Structured,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    Text(String),
    Structured(Value),
}

/// Shared, stateless handle to the completion service.
///
/// Cloning is cheap; all clones share one provider.
#[derive(Clone)]
pub struct LlmGateway {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
    timeout: Duration,
}

impl LlmGateway {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            model: provider.default_model().to_string(),
            provider,
            max_tokens: crate::config::constants::DEFAULT_MAX_TOKENS,
            temperature: None,
            timeout: Duration::from_secs(crate::config::constants::DEFAULT_GATEWAY_TIMEOUT_SECS),
        }
    }

    /// Build the configured provider and apply gateway settings
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn LlmProvider> = Arc::from(create_provider_from_entry(&config.provider)?);
        let mut gateway = Self::new(provider)
            .with_max_tokens(config.orchestration.max_tokens)
            .with_timeout(Duration::from_secs(config.gateway.timeout_secs));
        if let Some(t) = config.gateway.temperature {
            gateway = gateway.with_temperature(t);
        }
        Ok(gateway)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Send one prompt.
    ///
    /// Fails with `Upstream` when the call fails or exceeds the deadline, and
    /// with `MalformedResponse` when `Structured` is requested but the text
    /// holds no parseable JSON object.
    pub async fn send(&self, prompt: &str, mode: ResponseMode) -> Result<GatewayResponse> {
        let mut request = ProviderRequest::new(prompt)
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens);
        if let Some(t) = self.temperature {
            request = request.with_temperature(t);
        }

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            prompt_chars = prompt.len(),
            ?mode,
            "Sending completion request"
        );

        let response = match tokio::time::timeout(self.timeout, self.provider.send_message(&request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(ForgeError::upstream(self.provider.name(), format!("{e:#}"))),
            Err(_) => {
                return Err(ForgeError::upstream(
                    self.provider.name(),
                    format!("timed out after {}s", self.timeout.as_secs_f32()),
                ))
            }
        };

        if response.is_truncated() {
            warn!(
                provider = %response.provider,
                model = %response.model,
                max_tokens = self.max_tokens,
                "Response hit the token limit and is probably incomplete"
            );
        }
        debug!(response_chars = response.text.len(), "Received completion");

        match mode {
            ResponseMode::Raw => Ok(GatewayResponse::Text(response.text.trim().to_string())),
            ResponseMode::Structured => {
                extract_json_object(&response.text).map(GatewayResponse::Structured)
            }
        }
    }

    pub async fn send_raw(&self, prompt: &str) -> Result<String> {
        match self.send(prompt, ResponseMode::Raw).await? {
            GatewayResponse::Text(text) => Ok(text),
            GatewayResponse::Structured(value) => Ok(value.to_string()),
        }
    }

    pub async fn send_structured(&self, prompt: &str) -> Result<Value> {
        match self.send(prompt, ResponseMode::Structured).await? {
            GatewayResponse::Structured(value) => Ok(value),
            GatewayResponse::Text(text) => extract_json_object(&text),
        }
    }
}

impl std::fmt::Debug for LlmGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGateway")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}
