//! Chain-specific types and error definitions.

use alloy::primitives::Address;
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Errors that can occur during chain reads, signing and address checks.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Every RPC endpoint failed at the transport level.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// A single RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with an execution error (contract revert).
    #[error("Contract call reverted: {0}")]
    Reverted(String),

    /// The node answered but the payload could not be decoded.
    #[error("Failed to decode contract response: {0}")]
    Decode(String),

    /// Text could not be parsed as a 20-byte hex address.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// Signature could not be parsed or no signer could be recovered.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Wallet document is not JSON or carries no usable address.
    #[error("Malformed wallet: {0}")]
    MalformedWallet(String),

    /// Invalid private key format.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Decimal amount could not be converted to wei.
    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    /// Subscription index is past the subscriber's history.
    #[error("Subscription {index} not found for subscriber {subscriber}")]
    SubscriptionNotFound { subscriber: Address, index: u64 },

    /// Token transfer was rejected by the node or reverted.
    #[error("Transfer rejected: {0}")]
    TransferRejected(String),

    /// Block explorer request failed or returned an error document.
    #[error("Explorer error: {0}")]
    Explorer(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
