//! Normalized views of on-chain entity state.
//!
//! Counts, fees and timestamps come off the chain as `uint256`. They are
//! narrowed to `u64`, saturating at `u64::MAX`; these fields hold counts and
//! small fees, never wei-scale amounts. Token amounts stay `U256` and are not
//! handled here.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::contracts::abi::{IComponent, ISubscribable};

/// The contract shapes the SDK knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Component,
    Cui,
    Identity,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Component => "component",
            EntityKind::Cui => "cui",
            EntityKind::Identity => "identity",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrow a chain integer to the host integer type.
pub fn to_host_u64(value: U256) -> u64 {
    value.saturating_to::<u64>()
}

/// Snapshot of a component contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentData {
    pub owner: Address,
    /// False once the component has been revoked.
    pub is_active: bool,
    pub payment_usage_is_active: bool,
    pub payment_usage_fee: u64,
    pub payment_monthly_is_active: bool,
    pub payment_monthly_fee: u64,
    pub subscribers_count: u64,
    pub subscriptions_count: u64,
}

impl From<IComponent::getDataReturn> for ComponentData {
    fn from(raw: IComponent::getDataReturn) -> Self {
        Self {
            owner: raw.owner,
            is_active: !raw.revoked,
            payment_usage_is_active: raw.paymentUsageIsActive,
            payment_usage_fee: to_host_u64(raw.paymentUsageFee),
            payment_monthly_is_active: raw.paymentMonthlyIsActive,
            payment_monthly_fee: to_host_u64(raw.paymentMonthlyFee),
            subscribers_count: to_host_u64(raw.subscribersCount),
            subscriptions_count: to_host_u64(raw.subscriptionsCount),
        }
    }
}

/// Snapshot of a CUI contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuiData {
    pub owner: Address,
    pub license_fee: u64,
    pub latest_license_change: u64,
    /// False once the CUI has been revoked.
    pub is_active: bool,
    pub subscribers_count: u64,
}

/// Snapshot of a user identity contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub identity: Address,
    pub components_count: u64,
    pub subscriptions_count: u64,
}

/// A subscriber's standing with a component or CUI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberData {
    pub is_active: bool,
    pub last_subscription_id: u64,
}

impl From<ISubscribable::subscribersReturn> for SubscriberData {
    fn from(raw: ISubscribable::subscribersReturn) -> Self {
        Self {
            is_active: raw.isActive,
            last_subscription_id: to_host_u64(raw.lastSubscriptionId),
        }
    }
}

/// One subscription period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub start: u64,
    pub end: u64,
    pub usage: u64,
    pub total_charged: u64,
    pub fee: u64,
}

impl From<ISubscribable::Subscription> for SubscriptionRecord {
    fn from(raw: ISubscribable::Subscription) -> Self {
        Self {
            start: to_host_u64(raw.start),
            end: to_host_u64(raw.end),
            usage: to_host_u64(raw.usage),
            total_charged: to_host_u64(raw.totalCharged),
            fee: to_host_u64(raw.fee),
        }
    }
}
