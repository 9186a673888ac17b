//! Per-address contract handle cache.
//!
//! One handle per `(EntityKind, Address)`: each [`ContractClientCache`] serves a
//! single kind, and [`ContractRegistry`] holds one cache per kind. Handles are
//! never evicted; they are cheap, read-only, and bounded by the number of
//! distinct addresses a process looks at.

use alloy::primitives::Address;
use dashmap::DashMap;
use std::sync::Arc;

use crate::blockchain::address::parse_address;
use crate::blockchain::{ChainReader, ChainResult};
use crate::contracts::component::ComponentReader;
use crate::contracts::cui::CuiReader;
use crate::contracts::identity::IdentityReader;
use crate::contracts::types::EntityKind;
use crate::observability::metrics;

/// A reader bound to one deployed contract.
pub trait BoundContract: Send + Sync + 'static {
    /// Which contract shape this reader understands.
    const KIND: EntityKind;

    /// Bind the reader to `address` using the shared read connection.
    fn bind(address: Address, chain: ChainReader) -> Self;

    /// Address of the contract the reader is bound to.
    fn address(&self) -> Address;
}

/// Lazily constructed, shared readers for one contract kind.
pub struct ContractClientCache<T> {
    chain: ChainReader,
    handles: DashMap<Address, Arc<T>>,
}

impl<T: BoundContract> ContractClientCache<T> {
    pub fn new(chain: ChainReader) -> Self {
        Self {
            chain,
            handles: DashMap::new(),
        }
    }

    /// Return the reader for `address`, creating it on first use.
    ///
    /// Creation happens under the map's entry lock, so concurrent callers for
    /// the same address always receive the same `Arc`.
    pub fn get(&self, address: Address) -> Arc<T> {
        let handle = self
            .handles
            .entry(address)
            .or_insert_with(|| {
                tracing::debug!(kind = %T::KIND, %address, "Binding contract reader");
                Arc::new(T::bind(address, self.chain.clone()))
            })
            .value()
            .clone();

        metrics::record_cache_size(T::KIND.as_str(), self.handles.len());
        handle
    }

    /// Parse `address` (any case, `0x` optional) and return its reader.
    pub fn get_instance(&self, address: &str) -> ChainResult<Arc<T>> {
        Ok(self.get(parse_address(address)?))
    }

    /// Number of distinct contracts bound so far.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// One cache per entity kind, sharing a single read connection.
pub struct ContractRegistry {
    components: ContractClientCache<ComponentReader>,
    cuis: ContractClientCache<CuiReader>,
    identities: ContractClientCache<IdentityReader>,
}

impl ContractRegistry {
    pub fn new(chain: ChainReader) -> Self {
        Self {
            components: ContractClientCache::new(chain.clone()),
            cuis: ContractClientCache::new(chain.clone()),
            identities: ContractClientCache::new(chain),
        }
    }

    pub fn component(&self, address: &str) -> ChainResult<Arc<ComponentReader>> {
        self.components.get_instance(address)
    }

    pub fn cui(&self, address: &str) -> ChainResult<Arc<CuiReader>> {
        self.cuis.get_instance(address)
    }

    pub fn identity(&self, address: &str) -> ChainResult<Arc<IdentityReader>> {
        self.identities.get_instance(address)
    }

    /// Cached handle count for one kind.
    pub fn cached(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Component => self.components.len(),
            EntityKind::Cui => self.cuis.len(),
            EntityKind::Identity => self.identities.len(),
        }
    }
}

impl std::fmt::Debug for ContractRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractRegistry")
            .field("components", &self.components.len())
            .field("cuis", &self.cuis.len())
            .field("identities", &self.identities.len())
            .finish()
    }
}
