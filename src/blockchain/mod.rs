//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! ChainConfig (primary + fallback RPC URL)
//!     → provider.rs (read connection with failover and timeouts)
//!     → contracts / ledger (typed contract reads)
//!
//! Caller-supplied private key
//!     → wallet.rs (transient signer, one send)
//!
//! Wallet documents and signatures
//!     → address.rs (canonical form, signer recovery, ownership proofs)
//! ```
//!
//! # Security Constraints
//! - Private keys are never stored or logged
//! - All RPC calls have configurable timeouts

pub mod address;
pub mod provider;
pub mod types;
pub mod wallet;

pub use address::WalletVerifier;
pub use provider::ChainReader;
pub use types::{ChainConfig, ChainError, ChainResult};
pub use wallet::Wallet;
