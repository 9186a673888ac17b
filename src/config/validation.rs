//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that URLs parse and contract addresses are well-formed
//! - Validate value ranges (timeouts > 0, poll interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SdkConfig → Result<(), Vec<ValidationError>>

use crate::blockchain::address::parse_address;
use crate::config::schema::SdkConfig;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "gateway.base_url").
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every field, collecting all problems.
pub fn validate_config(config: &SdkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "gateway.base_url", &config.gateway.base_url);
    check_url(&mut errors, "chain.rpc_url", &config.chain.rpc_url);
    if let Some(fallback) = &config.chain.fallback_url {
        check_url(&mut errors, "chain.fallback_url", fallback);
    }
    check_url(&mut errors, "explorer.base_url", &config.explorer.base_url);

    if config.gateway.poll_interval_ms == 0 {
        errors.push(ValidationError::new("gateway.poll_interval_ms", "must be greater than 0"));
    }
    if config.gateway.request_timeout_secs == 0 {
        errors.push(ValidationError::new("gateway.request_timeout_secs", "must be greater than 0"));
    }
    if config.gateway.wait_timeout_secs == Some(0) {
        errors.push(ValidationError::new("gateway.wait_timeout_secs", "must be greater than 0 when set"));
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }

    check_address(&mut errors, "contracts.token", &config.contracts.token);
    check_address(&mut errors, "contracts.component_repository", &config.contracts.component_repository);
    check_address(&mut errors, "contracts.user_repository", &config.contracts.user_repository);

    if config.auth.sign_message.trim().is_empty() {
        errors.push(ValidationError::new("auth.sign_message", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if parse_address(value).is_err() {
        errors.push(ValidationError::new(field, format!("invalid contract address '{}'", value)));
    }
}
