//! Configuration loading from disk or the process environment.

use std::path::Path;
use std::fs;
use crate::config::schema::SdkConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables read by [`load_from_env`].
pub const ENV_GATEWAY_URL: &str = "BLOCKCHAIN_SERVICE_URL";
pub const ENV_GATEWAY_USERNAME: &str = "BLOCKCHAIN_SERVICE_AUTHORIZATION_USERNAME";
pub const ENV_GATEWAY_PASSWORD: &str = "BLOCKCHAIN_SERVICE_AUTHORIZATION_PASSWORD";
pub const ENV_SIGN_MESSAGE: &str = "BLOCKCHAIN_SERVICE_SIGN_MESSAGE";
pub const ENV_PRIMARY_RPC: &str = "NODE_0_URL";
pub const ENV_FALLBACK_RPC: &str = "NODE_1_URL";
pub const ENV_EXPLORER_URL: &str = "BLOCKCHAIN_EXPLORER_URL";
pub const ENV_TOKEN_CONTRACT: &str = "TOKEN_CONTRACT_ADDRESS";
pub const ENV_COMPONENT_REPOSITORY: &str = "COMPONENT_REPOSITORY_CONTRACT_ADDRESS";
pub const ENV_USER_REPOSITORY: &str = "USER_REPOSITORY_CONTRACT_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SdkConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SdkConfig, ConfigError> {
    let config: SdkConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<SdkConfig, ConfigError> {
    config_from_lookup(|name| std::env::var(name).ok())
}

/// Build configuration from a variable lookup; unset variables keep defaults.
pub fn config_from_lookup<F>(lookup: F) -> Result<SdkConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = SdkConfig::default();

    let set = |target: &mut String, name: &str| {
        if let Some(value) = lookup(name) {
            *target = value;
        }
    };

    set(&mut config.gateway.base_url, ENV_GATEWAY_URL);
    set(&mut config.gateway.username, ENV_GATEWAY_USERNAME);
    set(&mut config.gateway.password, ENV_GATEWAY_PASSWORD);
    set(&mut config.auth.sign_message, ENV_SIGN_MESSAGE);
    set(&mut config.chain.rpc_url, ENV_PRIMARY_RPC);
    set(&mut config.explorer.base_url, ENV_EXPLORER_URL);
    set(&mut config.contracts.token, ENV_TOKEN_CONTRACT);
    set(&mut config.contracts.component_repository, ENV_COMPONENT_REPOSITORY);
    set(&mut config.contracts.user_repository, ENV_USER_REPOSITORY);
    config.chain.fallback_url = lookup(ENV_FALLBACK_RPC);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
