//! SeedToken client SDK.
//!
//! Typed reads of the SeedToken contracts over JSON-RPC, token and native
//! transfers, and gateway operations with confirmation polling.

pub mod blockchain;
pub mod config;
pub mod contracts;
pub mod gateway;
pub mod ledger;
pub mod observability;
pub mod sdk;

pub use blockchain::{ChainError, ChainReader, ChainResult, WalletVerifier};
pub use config::SdkConfig;
pub use contracts::ContractRegistry;
pub use gateway::{Confirmation, GatewayClient, GatewayError, WaitError};
pub use ledger::LedgerClient;
pub use sdk::{SdkError, SeedTokenSdk};
