//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the SDK.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the SDK.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SdkConfig {
    /// Blockchain gateway service (HTTP, Basic auth).
    pub gateway: GatewayConfig,

    /// JSON-RPC read endpoints.
    pub chain: ChainConfig,

    /// Block explorer API.
    pub explorer: ExplorerConfig,

    /// Well-known contract addresses.
    pub contracts: ContractsConfig,

    /// Wallet ownership proofs.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain gateway configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the gateway (e.g., "https://gateway.example.com").
    pub base_url: String,

    /// Basic-auth user name.
    pub username: String,

    /// Basic-auth password.
    pub password: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Interval between transaction status polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Give up waiting on a transaction after this many seconds.
    /// Unset means wait until the gateway reports a final state.
    pub wait_timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            username: String::new(),
            password: String::new(),
            request_timeout_secs: 30,
            poll_interval_ms: 1000,
            wait_timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("wait_timeout_secs", &self.wait_timeout_secs)
            .finish()
    }
}

/// Chain read configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Primary JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Fallback JSON-RPC endpoint URL.
    pub fallback_url: Option<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            fallback_url: None,
            rpc_timeout_secs: 10,
        }
    }
}

/// Block explorer configuration (Etherscan-compatible API).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Base URL; requests go to `{base_url}/api`.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Addresses of the singleton contracts.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractsConfig {
    /// ERC-20 token contract.
    pub token: String,

    /// Repository of component/CUI contracts.
    pub component_repository: String,

    /// Repository of user identity contracts.
    pub user_repository: String,
}

/// Wallet ownership proof configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Challenge string users sign to prove they hold a wallet's key.
    pub sign_message: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            sign_message: "SeedToken wallet verification".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
