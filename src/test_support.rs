// Test-only helpers shared by unit tests

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::providers::{LlmProvider, ProviderRequest, ProviderResponse};

type Responder = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;
type DelayFn = Box<dyn Fn(&str) -> Duration + Send + Sync>;

/// Provider that answers from a script instead of the network.
///
/// Either pops canned responses in order (`queue`) or computes each answer
/// from the prompt (`routed`). Every request is recorded.
pub struct ScriptedProvider {
    queue: Mutex<VecDeque<Result<String>>>,
    responder: Option<Responder>,
    delay: Option<DelayFn>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn queue<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(responses.into_iter().map(|s| Ok(s.into())).collect()),
            responder: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        let provider = Self::queue(Vec::<String>::new());
        provider
            .queue
            .lock()
            .unwrap()
            .push_back(Err(anyhow::anyhow!(message.to_string())));
        provider
    }

    pub fn routed<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            queue: Mutex::new(VecDeque::new()),
            responder: Some(Box::new(responder)),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.with_delay_fn(move |_| delay)
    }

    /// Per-prompt latency, for exercising out-of-order completion
    pub fn with_delay_fn<F>(mut self, delay: F) -> Self
    where
        F: Fn(&str) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Box::new(delay));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(&request.prompt)).await;
        }

        let text = match &self.responder {
            Some(responder) => responder(&request.prompt)?,
            None => self
                .queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))?,
        };

        Ok(ProviderResponse {
            id: "scripted-1".to_string(),
            model: request.model.clone(),
            text,
            stop_reason: Some("stop".to_string()),
            provider: "scripted".to_string(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }
}
