//! Reader for user identity contracts.

use alloy::primitives::Address;

use crate::blockchain::{ChainReader, ChainResult};
use crate::contracts::abi::IUserIdentity;
use crate::contracts::cache::BoundContract;
use crate::contracts::types::{to_host_u64, EntityKind, UserData};

/// Read-only view of one user identity contract.
#[derive(Debug)]
pub struct IdentityReader {
    address: Address,
    chain: ChainReader,
}

impl BoundContract for IdentityReader {
    const KIND: EntityKind = EntityKind::Identity;

    fn bind(address: Address, chain: ChainReader) -> Self {
        Self { address, chain }
    }

    fn address(&self) -> Address {
        self.address
    }
}

impl IdentityReader {
    /// Addresses of the CUIs this user owns.
    pub async fn components(&self) -> ChainResult<Vec<Address>> {
        let address = self.address;
        self.chain
            .read("getComponentsArray", |provider| async move {
                IUserIdentity::new(address, provider).getComponentsArray().call().await
            })
            .await
    }

    pub async fn components_count(&self) -> ChainResult<u64> {
        let address = self.address;
        self.chain
            .read("getComponentsLength", |provider| async move {
                IUserIdentity::new(address, provider).getComponentsLength().call().await
            })
            .await
            .map(to_host_u64)
    }

    /// Addresses of the CUIs this user subscribes to.
    pub async fn subscriptions(&self) -> ChainResult<Vec<Address>> {
        let address = self.address;
        self.chain
            .read("getSubscriptionsArray", |provider| async move {
                IUserIdentity::new(address, provider).getSubscriptionsArray().call().await
            })
            .await
    }

    pub async fn subscriptions_count(&self) -> ChainResult<u64> {
        let address = self.address;
        self.chain
            .read("getSubscriptionsLength", |provider| async move {
                IUserIdentity::new(address, provider).getSubscriptionsLength().call().await
            })
            .await
            .map(to_host_u64)
    }

    pub async fn data(&self) -> ChainResult<UserData> {
        let (components_count, subscriptions_count) =
            tokio::try_join!(self.components_count(), self.subscriptions_count())?;

        Ok(UserData {
            identity: self.address,
            components_count,
            subscriptions_count,
        })
    }
}
