// Configuration loader
// Loads from an explicit path, ~/.stackwright/config.toml, or environment variables

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::CONFIG_DIR_NAME;
use super::provider::ProviderEntry;
use super::settings::Config;

const DEFAULT_PROVIDER: &str = "deepseek";

/// Load configuration.
///
/// Order: explicit `path` (must exist), then `~/.stackwright/config.toml`,
/// then environment variables. A `.env` file in the working directory is
/// loaded into the environment first.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    dotenvy::dotenv().ok();

    let config = if let Some(path) = path {
        load_from_file(path)?
    } else if let Some(path) = default_config_path().filter(|p| p.exists()) {
        load_from_file(&path)?
    } else {
        config_from_env(|key| std::env::var(key).ok())?
    };

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// `~/.stackwright/config.toml`, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join("config.toml"))
}

/// Parse a TOML config file
pub fn load_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))
}

/// Build a config from environment lookups.
///
/// `STACKWRIGHT_PROVIDER` picks the provider (default deepseek),
/// `STACKWRIGHT_MODEL` overrides the model, and the provider's own key
/// variable (e.g. `GROQ_API_KEY`) supplies the key.
pub fn config_from_env<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = lookup("STACKWRIGHT_PROVIDER")
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    let Some(key_var) = ProviderEntry::api_key_env_var(&provider) else {
        bail!(
            "Unknown provider '{}' in STACKWRIGHT_PROVIDER.\n\
             Valid providers: deepseek, groq, gemini, openai",
            provider
        );
    };

    let Some(api_key) = lookup(key_var).filter(|k| !k.trim().is_empty()) else {
        bail!(
            "No configuration found.\n\n\
             Either create {} with a [provider] section, or set:\n  \
             export {}=\"...\"",
            default_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| format!("~/{CONFIG_DIR_NAME}/config.toml")),
            key_var
        );
    };

    let model = lookup("STACKWRIGHT_MODEL").filter(|m| !m.trim().is_empty());

    let entry = ProviderEntry::from_parts(&provider, api_key, model)
        .with_context(|| format!("Unknown provider '{provider}'"))?;

    let mut config = Config::with_provider(entry);
    if let Some(addr) = lookup("STACKWRIGHT_BIND").filter(|a| !a.trim().is_empty()) {
        config.server.bind_address = addr;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_defaults_to_deepseek() {
        let config = config_from_env(env(&[("DEEPSEEK_API_KEY", "sk-1")])).unwrap();
        assert_eq!(config.provider.provider_type(), "deepseek");
        assert_eq!(config.provider.api_key(), "sk-1");
        assert!(config.provider.model().is_none());
    }

    #[test]
    fn test_env_selects_provider_and_model() {
        let config = config_from_env(env(&[
            ("STACKWRIGHT_PROVIDER", "groq"),
            ("STACKWRIGHT_MODEL", "llama-3.1-8b-instant"),
            ("GROQ_API_KEY", "gsk-1"),
            ("STACKWRIGHT_BIND", "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(config.provider.provider_type(), "groq");
        assert_eq!(config.provider.model(), Some("llama-3.1-8b-instant"));
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_env_missing_key_fails() {
        let err = config_from_env(env(&[("STACKWRIGHT_PROVIDER", "gemini")])).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_env_unknown_provider_fails() {
        let err = config_from_env(env(&[("STACKWRIGHT_PROVIDER", "claude")])).unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[provider]\ntype = \"openai\"\napi_key = \"sk-file\"\n\n[review]\nmax_concurrent = 2"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.provider.provider_type(), "openai");
        assert_eq!(config.review.max_concurrent, 2);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_parse_config_without_provider_fails() {
        assert!(parse_config("[server]\nbind_address = \"0.0.0.0:1\"").is_err());
    }
}
