//! Reader for component contracts.

use alloy::primitives::Address;

use crate::blockchain::{ChainReader, ChainResult};
use crate::contracts::abi::IComponent;
use crate::contracts::cache::BoundContract;
use crate::contracts::subscriptions;
use crate::contracts::types::{ComponentData, EntityKind, SubscriberData, SubscriptionRecord};

/// Read-only view of one component contract.
#[derive(Debug)]
pub struct ComponentReader {
    address: Address,
    chain: ChainReader,
}

impl BoundContract for ComponentReader {
    const KIND: EntityKind = EntityKind::Component;

    fn bind(address: Address, chain: ChainReader) -> Self {
        Self { address, chain }
    }

    fn address(&self) -> Address {
        self.address
    }
}

impl ComponentReader {
    /// Owner, pricing and counters in one call.
    pub async fn data(&self) -> ChainResult<ComponentData> {
        let address = self.address;
        self.chain
            .read("getData", |provider| async move {
                IComponent::new(address, provider).getData().call().await
            })
            .await
            .map(ComponentData::from)
    }

    /// Whether the component charges nothing.
    pub async fn is_free(&self) -> ChainResult<bool> {
        let address = self.address;
        self.chain
            .read("isFree", |provider| async move {
                IComponent::new(address, provider).isFree().call().await
            })
            .await
    }

    pub async fn subscribers(&self) -> ChainResult<Vec<Address>> {
        subscriptions::subscribers(&self.chain, self.address).await
    }

    pub async fn subscriptions(&self) -> ChainResult<Vec<Address>> {
        let address = self.address;
        self.chain
            .read("getSubscriptionsArray", |provider| async move {
                IComponent::new(address, provider).getSubscriptionsArray().call().await
            })
            .await
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
