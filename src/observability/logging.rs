//! Structured logging.
//!
//! # Responsibilities
//! - Initialize a `tracing` subscriber for hosts that do not bring one
//! - Configure log level from the environment, falling back to config
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - Installing twice reports an error instead of panicking

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.log_level` when set.
pub fn init_logging(
    config: &ObservabilityConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}

fn default_directive(level: &str) -> String {
    format!("seedtoken_sdk={}", level)
}
