//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or process environment
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SdkConfig (validated, immutable)
//!     → handed by reference to each client constructor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, parse_config, ConfigError};
pub use validation::{validate_config, ValidationError};
pub use schema::SdkConfig;
pub use schema::{AuthConfig, ChainConfig, ContractsConfig, ExplorerConfig, GatewayConfig, ObservabilityConfig};
