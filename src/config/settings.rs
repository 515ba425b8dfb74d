// Configuration structs

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use super::constants::*;
use super::provider::ProviderEntry;

/// Top-level configuration, built once at startup and handed to each
/// component explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Completion provider shared by every agent
    pub provider: ProviderEntry,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub orchestration: OrchestrationConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub review: ReviewConfig,

    /// Per-role overrides of the built-in role profiles
    #[serde(default)]
    pub roles: RolesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000")
    pub bind_address: String,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Upload ceiling in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_HTTP_ADDR.to_string(),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

/// The revision budget is fixed at `DEFAULT_MAX_REVISIONS` and is not a
/// config key; a stale `max_revisions` entry is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestrationConfig {
    /// Token ceiling for every completion request
    pub max_tokens: u32,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Per-call deadline in seconds
    pub timeout_secs: u64,
    /// Sampling temperature (provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_GATEWAY_TIMEOUT_SECS,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Concurrent per-file review calls
    pub max_concurrent: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_REVIEW_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    pub backend: RoleOverrides,
    pub frontend: RoleOverrides,
}

/// Optional overrides for a role profile; unset fields keep the built-in value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_words: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forbidden_extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Enable debug logging for troubleshooting
    pub debug: bool,
    /// Append one JSON line per run to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_log_path: Option<PathBuf>,
}

impl Config {
    /// Config with defaults for everything except the provider
    pub fn with_provider(provider: ProviderEntry) -> Self {
        Self {
            provider,
            server: ServerConfig::default(),
            orchestration: OrchestrationConfig::default(),
            gateway: GatewayConfig::default(),
            review: ReviewConfig::default(),
            roles: RolesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider.api_key().trim().is_empty() {
            let var = ProviderEntry::api_key_env_var(self.provider.provider_type())
                .unwrap_or("the provider's API key variable");
            anyhow::bail!(
                "API key for provider '{}' is empty.\n\n\
                 Set it in the [provider] section of the config file or export {}",
                self.provider.provider_type(),
                var
            );
        }

        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            anyhow::bail!(
                "Invalid bind address: '{}'\n\
                 Bind address should be in format 'IP:PORT', e.g. 0.0.0.0:3000",
                self.server.bind_address
            );
        }

        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than 0");
        }

        if self.orchestration.max_tokens == 0 {
            anyhow::bail!("max_tokens must be greater than 0");
        }

        if self.gateway.timeout_secs == 0 {
            anyhow::bail!("gateway timeout_secs must be greater than 0");
        }

        if self.review.max_concurrent == 0 {
            anyhow::bail!("review max_concurrent must be greater than 0");
        }

        for (role, overrides) in [("backend", &self.roles.backend), ("frontend", &self.roles.frontend)] {
            if overrides.max_output_words == Some(0) {
                anyhow::bail!("roles.{role}.max_output_words must be greater than 0");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deepseek() -> ProviderEntry {
        ProviderEntry::Deepseek {
            api_key: "sk-test".to_string(),
            model: None,
            base_url: None,
        }
    }

    #[test]
    fn test_defaults_validate() {
        let config = Config::with_provider(deepseek());
        assert!(config.validate().is_ok());
        assert_eq!(config.orchestration.max_tokens, 8000);
        assert_eq!(config.server.max_upload_bytes, 5_000_000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:8080"]);
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let config = Config::with_provider(ProviderEntry::Groq {
            api_key: "  ".to_string(),
            model: None,
            base_url: None,
        });
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("GROQ_API_KEY"), "{err}");
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = Config::with_provider(deepseek());
        config.review.max_concurrent = 0;
        assert!(config.validate().is_err());

        let mut config = Config::with_provider(deepseek());
        config.gateway.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::with_provider(deepseek());
        config.roles.frontend.max_output_words = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_revision_budget_is_not_configurable() {
        let toml_str = r#"
            [provider]
            type = "deepseek"
            api_key = "sk-test"

            [orchestration]
            max_revisions = 5
        "#;
        let err = toml::from_str::<Config>(toml_str).unwrap_err();
        assert!(err.to_string().contains("max_revisions"));
    }

    #[test]
    fn test_bad_bind_address_rejected() {
        let mut config = Config::with_provider(deepseek());
        config.server.bind_address = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
            [provider]
            type = "gemini"
            api_key = "g-key"
            model = "gemini-1.5-pro"

            [server]
            bind_address = "127.0.0.1:4000"

            [orchestration]
            max_tokens = 4000

            [roles.frontend]
            max_output_words = 2500

            [logging]
            debug = true
            run_log_path = "/tmp/runs.jsonl"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.provider_type(), "gemini");
        assert_eq!(config.provider.model(), Some("gemini-1.5-pro"));
        assert_eq!(config.server.bind_address, "127.0.0.1:4000");
        // Unset fields in a present section fall back to defaults
        assert_eq!(config.server.max_upload_bytes, 5_000_000);
        assert_eq!(config.orchestration.max_tokens, 4000);
        assert_eq!(config.roles.frontend.max_output_words, Some(2500));
        assert_eq!(config.roles.backend, RoleOverrides::default());
        assert!(config.logging.debug);
        assert!(config.validate().is_ok());
    }
}
