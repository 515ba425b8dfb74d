// Provider entry: which completion API the agents talk to

use serde::{Deserialize, Serialize};

/// The configured completion provider.
///
/// Serializes with a `type` tag, e.g.:
/// ```toml
/// [provider]
/// type = "groq"
/// api_key = "gsk_..."
/// model = "llama-3.3-70b-versatile"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderEntry {
    Deepseek {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    Groq {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    Gemini {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    Openai {
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
}

impl ProviderEntry {
    /// Build an entry from a provider tag ("deepseek", "groq", "gemini", "openai").
    pub fn from_parts(provider: &str, api_key: String, model: Option<String>) -> Option<Self> {
        let entry = match provider.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Self::Deepseek {
                api_key,
                model,
                base_url: None,
            },
            "groq" => Self::Groq {
                api_key,
                model,
                base_url: None,
            },
            "gemini" => Self::Gemini {
                api_key,
                model,
                base_url: None,
            },
            "openai" => Self::Openai {
                api_key,
                model,
                base_url: None,
            },
            _ => return None,
        };
        Some(entry)
    }

    /// Short provider-type tag (e.g. "deepseek", "gemini").
    pub fn provider_type(&self) -> &'static str {
        match self {
            Self::Deepseek { .. } => "deepseek",
            Self::Groq { .. } => "groq",
            Self::Gemini { .. } => "gemini",
            Self::Openai { .. } => "openai",
        }
    }

    /// Environment variable holding this provider's key.
    pub fn api_key_env_var(provider: &str) -> Option<&'static str> {
        match provider.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Some("DEEPSEEK_API_KEY"),
            "groq" => Some("GROQ_API_KEY"),
            "gemini" => Some("GEMINI_API_KEY"),
            "openai" => Some("OPENAI_API_KEY"),
            _ => None,
        }
    }

    pub fn api_key(&self) -> &str {
        match self {
            Self::Deepseek { api_key, .. }
            | Self::Groq { api_key, .. }
            | Self::Gemini { api_key, .. }
            | Self::Openai { api_key, .. } => api_key,
        }
    }

    /// Optional model override.
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::Deepseek { model, .. }
            | Self::Groq { model, .. }
            | Self::Gemini { model, .. }
            | Self::Openai { model, .. } => model.as_deref(),
        }
    }

    /// Optional endpoint override.
    pub fn base_url(&self) -> Option<&str> {
        match self {
            Self::Deepseek { base_url, .. }
            | Self::Groq { base_url, .. }
            | Self::Gemini { base_url, .. }
            | Self::Openai { base_url, .. } => base_url.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let entry = ProviderEntry::Groq {
            api_key: "gsk-test".to_string(),
            model: Some("llama-3.3-70b-versatile".to_string()),
            base_url: None,
        };
        let toml = toml::to_string(&entry).unwrap();
        assert!(toml.contains("type = \"groq\""));
        let decoded: ProviderEntry = toml::from_str(&toml).unwrap();
        assert_eq!(entry, decoded);
    }

    #[test]
    fn test_from_parts() {
        let entry = ProviderEntry::from_parts("Gemini", "g".to_string(), None).unwrap();
        assert_eq!(entry.provider_type(), "gemini");
        assert_eq!(entry.api_key(), "g");
        assert!(entry.model().is_none());
        assert!(ProviderEntry::from_parts("claude", "k".to_string(), None).is_none());
    }

    #[test]
    fn test_api_key_env_vars() {
        assert_eq!(ProviderEntry::api_key_env_var("deepseek"), Some("DEEPSEEK_API_KEY"));
        assert_eq!(ProviderEntry::api_key_env_var("GROQ"), Some("GROQ_API_KEY"));
        assert_eq!(ProviderEntry::api_key_env_var("gemini"), Some("GEMINI_API_KEY"));
        assert_eq!(ProviderEntry::api_key_env_var("mistral"), None);
    }
}
