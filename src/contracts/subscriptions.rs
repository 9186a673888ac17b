//! Subscription reads shared by component and CUI contracts.

use alloy::primitives::{Address, U256};

use crate::blockchain::{ChainError, ChainReader, ChainResult};
use crate::contracts::abi::ISubscribable;
use crate::contracts::types::{SubscriberData, SubscriptionRecord};

pub(crate) async fn subscribers(chain: &ChainReader, contract: Address) -> ChainResult<Vec<Address>> {
    chain
        .read("getSubscribersArray", |provider| async move {
            ISubscribable::new(contract, provider).getSubscribersArray().call().await
        })
        .await
}

pub(crate) async fn subscriber_data(
    chain: &ChainReader,
    contract: Address,
    subscriber: Address,
) -> ChainResult<SubscriberData> {
    chain
        .read("subscribers", |provider| async move {
            ISubscribable::new(contract, provider).subscribers(subscriber).call().await
        })
        .await
        .map(SubscriberData::from)
}

pub(crate) async fn latest_subscription(
    chain: &ChainReader,
    contract: Address,
    subscriber: Address,
) -> ChainResult<SubscriptionRecord> {
    chain
        .read("getLatestSubscriptionForUser", |provider| async move {
            ISubscribable::new(contract, provider)
                .getLatestSubscriptionForUser(subscriber)
                .call()
                .await
        })
        .await
        .map(SubscriptionRecord::from)
}

/// A revert here means the index is past the subscriber's history.
pub(crate) async fn subscription_by_index(
    chain: &ChainReader,
    contract: Address,
    subscriber: Address,
    index: u64,
) -> ChainResult<SubscriptionRecord> {
    chain
        .read("getSubscriptionForUserByIndex", |provider| async move {
            ISubscribable::new(contract, provider)
                .getSubscriptionForUserByIndex(subscriber, U256::from(index))
                .call()
                .await
        })
        .await
        .map(SubscriptionRecord::from)
        .map_err(|e| match e {
            ChainError::Reverted(reason) => {
                tracing::debug!(%contract, %subscriber, index, %reason, "Subscription index out of range");
                ChainError::SubscriptionNotFound { subscriber, index }
            }
            other => other,
        })
}
