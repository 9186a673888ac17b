//! Gateway payloads and error definitions.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from the gateway's HTTP API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection, TLS or timeout failure.
    #[error("Gateway unreachable: {0}")]
    Network(String),

    /// The gateway rejected the configured credentials.
    #[error("Gateway rejected credentials (status {0})")]
    Unauthorized(u16),

    /// Any other non-success status.
    #[error("Gateway returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body did not have the expected shape.
    #[error("Unexpected gateway response: {0}")]
    Decode(String),

    /// Base URL or path segment could not form a URL.
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),

    /// An address argument is not 20 hex bytes; nothing was sent.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Why a transaction wait ended without confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    /// The gateway processed the transaction and reported it failed.
    #[error("Transaction {hash} failed (reported after {polls} polls)")]
    Failed { hash: TxHash, polls: u64 },

    /// No final state within the configured timeout.
    #[error("Transaction {hash} still pending after {after:?}")]
    TimedOut { hash: TxHash, after: Duration },

    /// The wait was cancelled before a final state was seen.
    #[error("Wait for transaction {hash} was cancelled")]
    Cancelled { hash: TxHash },
}

/// Lifecycle of a submitted transaction as seen through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionState {
    /// Not yet processed.
    Pending,
    /// Processed and succeeded.
    Confirmed,
    /// Processed and failed.
    Failed,
}

/// `GET /transactions/{hash}` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionResult {
    #[serde(default)]
    pub processed: bool,
    #[serde(default)]
    pub failed: bool,
}

impl TransactionResult {
    pub fn state(&self) -> TransactionState {
        match (self.processed, self.failed) {
            (false, _) => TransactionState::Pending,
            (true, false) => TransactionState::Confirmed,
            (true, true) => TransactionState::Failed,
        }
    }
}

/// `PUT /users/{addr}/authorise|revoke` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationStatus {
    /// Absent when the address was already in the requested state.
    #[serde(default)]
    pub transaction_hash: Option<TxHash>,
    pub authorised: bool,
}

/// `GET /components/{addr}/checkUsage/{subscriber}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCheck {
    /// Whether `recordUsage` would succeed for this subscriber.
    pub valid: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}
