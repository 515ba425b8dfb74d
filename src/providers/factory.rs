// Provider factory
//
// Creates the LLM provider described by the `[provider]` config entry

use anyhow::Result;

use super::gemini::GeminiProvider;
use super::openai::OpenAIProvider;
use super::LlmProvider;
use crate::config::ProviderEntry;

/// Create an `LlmProvider` from a `ProviderEntry`.
pub fn create_provider_from_entry(entry: &ProviderEntry) -> Result<Box<dyn LlmProvider>> {
    match entry {
        ProviderEntry::Deepseek { api_key, .. } => {
            let provider = OpenAIProvider::new_deepseek(api_key.clone())?;
            Ok(Box::new(apply_openai_overrides(provider, entry)))
        }

        ProviderEntry::Groq { api_key, .. } => {
            let provider = OpenAIProvider::new_groq(api_key.clone())?;
            Ok(Box::new(apply_openai_overrides(provider, entry)))
        }

        ProviderEntry::Openai { api_key, .. } => {
            let provider = OpenAIProvider::new_openai(api_key.clone())?;
            Ok(Box::new(apply_openai_overrides(provider, entry)))
        }

        ProviderEntry::Gemini { api_key, .. } => {
            let mut provider = GeminiProvider::new(api_key.clone())?;
            if let Some(m) = entry.model() {
                provider = provider.with_model(m);
            }
            if let Some(url) = entry.base_url() {
                provider = provider.with_base_url(url);
            }
            Ok(Box::new(provider))
        }
    }
}

fn apply_openai_overrides(mut provider: OpenAIProvider, entry: &ProviderEntry) -> OpenAIProvider {
    if let Some(m) = entry.model() {
        provider = provider.with_model(m);
    }
    if let Some(url) = entry.base_url() {
        provider = provider.with_base_url(url);
    }
    provider
}
