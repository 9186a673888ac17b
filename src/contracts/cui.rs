//! Reader for CUI contracts.

use alloy::primitives::Address;

use crate::blockchain::{ChainReader, ChainResult};
use crate::contracts::abi::ICui;
use crate::contracts::cache::BoundContract;
use crate::contracts::subscriptions;
use crate::contracts::types::{to_host_u64, CuiData, EntityKind, SubscriberData, SubscriptionRecord};

/// Read-only view of one CUI contract.
#[derive(Debug)]
pub struct CuiReader {
    address: Address,
    chain: ChainReader,
}

impl BoundContract for CuiReader {
    const KIND: EntityKind = EntityKind::Cui;

    fn bind(address: Address, chain: ChainReader) -> Self {
        Self { address, chain }
    }

    fn address(&self) -> Address {
        self.address
    }
}

impl CuiReader {
    /// The contract has no aggregate getter; the five reads run concurrently.
    pub async fn data(&self) -> ChainResult<CuiData> {
        let address = self.address;
        let chain = &self.chain;

        let (owner, license_fee, latest_license_change, revoked, subscribers_count) = tokio::try_join!(
            chain.read("owner", |provider| async move {
                ICui::new(address, provider).owner().call().await
            }),
            chain.read("licenseFee", |provider| async move {
                ICui::new(address, provider).licenseFee().call().await
            }),
            chain.read("latestLicenseChange", |provider| async move {
                ICui::new(address, provider).latestLicenseChange().call().await
            }),
            chain.read("isRevoked", |provider| async move {
                ICui::new(address, provider).isRevoked().call().await
            }),
            self.subscribers_count(),
        )?;

        Ok(CuiData {
            owner,
            license_fee: to_host_u64(license_fee),
            latest_license_change: to_host_u64(latest_license_change),
            is_active: !revoked,
            subscribers_count,
        })
    }

    pub async fn subscribers(&self) -> ChainResult<Vec<Address>> {
        subscriptions::subscribers(&self.chain, self.address).await
    }

    /// Length-only read; cheaper than fetching the array.
    pub async fn subscribers_count(&self) -> ChainResult<u64> {
        let address = self.address;
        self.chain
            .read("getSubscribersArrayLength", |provider| async move {
                ICui::new(address, provider).getSubscribersArrayLength().call().await
            })
            .await
            .map(to_host_u64)
    }

    pub async fn subscriber_data(&self, subscriber: Address) -> ChainResult<SubscriberData> {
        subscriptions::subscriber_data(&self.chain, self.address, subscriber).await
    }

    pub async fn latest_subscription(&self, subscriber: Address) -> ChainResult<SubscriptionRecord> {
        subscriptions::latest_subscription(&self.chain, self.address, subscriber).await
    }

    /// Fails with `SubscriptionNotFound` when `index` is past the history.
    pub async fn subscription_by_index(
        &self,
        subscriber: Address,
        index: u64,
    ) -> ChainResult<SubscriptionRecord> {
        subscriptions::subscription_by_index(&self.chain, self.address, subscriber, index).await
    }
}
