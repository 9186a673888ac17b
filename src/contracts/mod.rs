//! Typed contract readers.
//!
//! # Data Flow
//! ```text
//! ContractRegistry (one ContractClientCache per EntityKind)
//!     → ComponentReader / CuiReader / IdentityReader (bound to one address)
//!     → ChainReader::read (primary, then fallback)
//!     → types.rs (uint256 → u64 snapshots)
//! ```
//!
//! Snapshots are never cached; every call reflects the latest chain state.

pub mod abi;
pub mod cache;
pub mod component;
pub mod cui;
pub mod identity;
mod subscriptions;
pub mod types;

pub use cache::{BoundContract, ContractClientCache, ContractRegistry};
pub use component::ComponentReader;
pub use cui::CuiReader;
pub use identity::IdentityReader;
pub use types::{ComponentData, CuiData, EntityKind, SubscriberData, SubscriptionRecord, UserData};
