//! Token, repository and transaction-history access.

pub mod client;
pub mod explorer;

pub use client::{parse_native_amount, LedgerClient};
pub use explorer::{ExplorerClient, ExplorerTransaction, TransactionList};
