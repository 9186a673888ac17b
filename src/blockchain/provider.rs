//! Read-only chain connection with primary/fallback endpoints.
//!
//! # Responsibilities
//! - Build one JSON-RPC provider per configured endpoint
//! - Run every read against the primary, falling back on transport failure
//! - Keep node answers (reverts, decode failures) distinct from outages
//! - Provide health check for RPC connectivity

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::blockchain::types::{ChainConfig, ChainError, ChainResult};
use crate::observability::metrics;

#[derive(Clone)]
struct Endpoint {
    url: Url,
    provider: DynProvider,
}

/// Shared read connection. Cheap to clone; every clone uses the same providers.
#[derive(Clone)]
pub struct ChainReader {
    /// Primary first, then fallback.
    endpoints: Arc<Vec<Endpoint>>,
    /// Request timeout duration.
    timeout_duration: Duration,
    timeout_secs: u64,
}

enum ReadFault {
    /// The node answered; trying another endpoint would not change the outcome.
    Answered(ChainError),
    /// The endpoint could not be reached or did not answer in time.
    Unreachable(String),
}

impl ChainReader {
    /// Build providers for the primary and (optional) fallback endpoints.
    ///
    /// No network traffic happens here; an unreachable node shows up on the
    /// first read.
    pub fn new(config: &ChainConfig) -> ChainResult<Self> {
        let mut endpoints = Vec::new();

        let primary_url: Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        endpoints.push(Endpoint::connect(primary_url));

        if let Some(fallback) = config.fallback_url.as_deref().filter(|u| !u.is_empty()) {
            match fallback.parse::<Url>() {
                Ok(url) => endpoints.push(Endpoint::connect(url)),
                Err(_) => tracing::warn!(url = %fallback, "Ignoring invalid fallback RPC URL"),
            }
        }

        tracing::info!(
            rpc_url = %config.rpc_url,
            endpoints = endpoints.len(),
            "Chain reader initialized"
        );

        Ok(Self {
            endpoints: Arc::new(endpoints),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            timeout_secs: config.rpc_timeout_secs,
        })
    }

    /// Run a read against each endpoint in order until one answers.
    ///
    /// `method` names the call in logs and metrics.
    pub async fn read<T, F, Fut>(&self, method: &'static str, call: F) -> ChainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T, alloy::contract::Error>>,
    {
        let mut last_error = String::from("no endpoints configured");

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            match timeout(self.timeout_duration, call(endpoint.provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => match classify(e) {
                    ReadFault::Answered(err) => return Err(err),
                    ReadFault::Unreachable(reason) => {
                        tracing::warn!(provider_idx = i, method, error = %reason, "RPC error");
                        last_error = reason;
                    }
                },
                Err(_) => {
                    tracing::warn!(provider_idx = i, method, "RPC timeout");
                    last_error = ChainError::Timeout(self.timeout_secs).to_string();
                }
            }
            if i + 1 < self.endpoints.len() {
                tracing::debug!(method, next_idx = i + 1, "Falling back to next provider");
                metrics::record_rpc_failover(method);
            }
        }

        Err(ChainError::Rpc(format!(
            "All RPC providers failed for {}: {}",
            method, last_error
        )))
    }

    /// Bound a primary-only call by the configured request timeout.
    pub async fn with_timeout<T, Fut>(&self, call: Fut) -> ChainResult<T>
    where
        Fut: Future<Output = ChainResult<T>>,
    {
        timeout(self.timeout_duration, call)
            .await
            .map_err(|_| ChainError::Timeout(self.timeout_secs))?
    }

    /// Get the latest block number.
    pub async fn block_number(&self) -> ChainResult<u64> {
        self.read("eth_blockNumber", |provider| async move {
            provider.get_block_number().await.map_err(Into::into)
        })
        .await
    }

    /// Check if the chain is reachable.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.block_number().await.is_ok();
        metrics::record_rpc_health(healthy);
        healthy
    }

    /// URL of the primary endpoint, used to attach a signer for sends.
    pub fn primary_url(&self) -> &Url {
        &self.endpoints[0].url
    }

    /// Number of configured endpoints (primary + fallback).
    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

impl Endpoint {
    fn connect(url: Url) -> Self {
        let provider = ProviderBuilder::new().connect_http(url.clone()).erased();
        Self { url, provider }
    }
}

/// JSON-RPC code nodes use for a failed `eth_call` execution.
const EXECUTION_REVERTED: i64 = 3;

fn classify(err: alloy::contract::Error) -> ReadFault {
    match err {
        alloy::contract::Error::TransportError(e) => match e.as_error_resp() {
            Some(payload)
                if payload.code == EXECUTION_REVERTED
                    || payload.message.contains("execution reverted") =>
            {
                ReadFault::Answered(ChainError::Reverted(payload.message.to_string()))
            }
            // Rate limits, unsynced nodes and the like: another endpoint may answer
            Some(payload) => {
                ReadFault::Unreachable(format!("{} (code {})", payload.message, payload.code))
            }
            None => ReadFault::Unreachable(e.to_string()),
        },
        other => ReadFault::Answered(ChainError::Decode(other.to_string())),
    }
}

impl std::fmt::Debug for ChainReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainReader")
            .field("endpoints", &self.endpoints.iter().map(|e| e.url.as_str()).collect::<Vec<_>>())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
