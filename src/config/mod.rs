// Configuration module
// Public interface for configuration loading

pub mod constants;
mod loader;
mod provider;
mod settings;

pub use loader::{config_from_env, default_config_path, load_config, load_from_file, parse_config};
pub use provider::ProviderEntry;
pub use settings::{
    Config, GatewayConfig, LoggingConfig, OrchestrationConfig, ReviewConfig, RoleOverrides,
    RolesConfig, ServerConfig,
};
