//! Blockchain gateway subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayClient
//!     → api.rs (HTTP routes, Basic auth, status mapping)
//!     → returns a transaction hash immediately
//!
//! wait_for_transaction(hash)
//!     → waiter.rs (one poll job per hash, joiners share its result)
//!     → GET /transactions/{hash} every poll interval
//!     → Confirmation | WaitError
//! ```

pub mod api;
pub mod client;
pub mod types;
pub mod waiter;

pub use api::GatewayApi;
pub use client::GatewayClient;
pub use types::{AuthorizationStatus, GatewayError, GatewayResult, TransactionResult, TransactionState, UsageCheck, WaitError};
pub use waiter::{Confirmation, PendingTransaction, TransactionStatusSource, TransactionWaiter};
