//! Gateway operations plus confirmation waiting.

use alloy::primitives::{Address, TxHash};
use std::sync::Arc;
use std::time::Duration;

use crate::config::GatewayConfig;
use crate::gateway::api::GatewayApi;
use crate::gateway::types::{AuthorizationStatus, GatewayResult, TransactionResult, UsageCheck, WaitError};
use crate::gateway::waiter::{Confirmation, PendingTransaction, TransactionWaiter};

/// Client for the blockchain gateway.
///
/// Every submitting call returns the transaction hash right away; use
/// [`wait_for_transaction`](Self::wait_for_transaction) to block until the
/// gateway reports a final state.
#[derive(Clone)]
pub struct GatewayClient {
    api: Arc<GatewayApi>,
    waiter: TransactionWaiter<GatewayApi>,
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let api = Arc::new(GatewayApi::new(config)?);
        let waiter = TransactionWaiter::new(
            api.clone(),
            Duration::from_millis(config.poll_interval_ms),
            config.wait_timeout_secs.map(Duration::from_secs),
        );

        tracing::debug!(
            poll_interval_ms = config.poll_interval_ms,
            wait_timeout_secs = ?config.wait_timeout_secs,
            "Gateway client created"
        );

        Ok(Self { api, waiter })
    }

    pub async fn authorize(&self, user: &str) -> GatewayResult<AuthorizationStatus> {
        self.api.authorize(user).await
    }

    pub async fn revoke(&self, user: &str) -> GatewayResult<AuthorizationStatus> {
        self.api.revoke(user).await
    }

    pub async fn create_identity(&self, owner: &str) -> GatewayResult<TxHash> {
        self.api.create_identity(owner).await
    }

    pub async fn identity_address(&self, owner: &str) -> GatewayResult<Address> {
        self.api.identity_address(owner).await
    }

    pub async fn check_usage(&self, component: &str, subscriber: &str) -> GatewayResult<UsageCheck> {
        self.api.check_usage(component, subscriber).await
    }

    pub async fn record_usage(&self, component: &str, subscriber: &str) -> GatewayResult<TxHash> {
        self.api.record_usage(component, subscriber).await
    }

    pub async fn charge_subscription(&self, component: &str, subscriber: &str) -> GatewayResult<TxHash> {
        self.api.charge_subscription(component, subscriber).await
    }

    pub async fn component_address_by_tx(&self, tx_hash: TxHash) -> GatewayResult<Address> {
        self.api.component_address_by_tx(tx_hash).await
    }

    pub async fn transaction_result(&self, tx_hash: TxHash) -> GatewayResult<TransactionResult> {
        self.api.transaction_result(tx_hash).await
    }

    /// Poll until `tx_hash` is confirmed or fails.
    pub async fn wait_for_transaction(&self, tx_hash: TxHash) -> Result<Confirmation, WaitError> {
        self.waiter.wait(tx_hash).await
    }

    pub async fn wait_for_transaction_with_timeout(
        &self,
        tx_hash: TxHash,
        limit: Duration,
    ) -> Result<Confirmation, WaitError> {
        self.waiter.wait_with_timeout(tx_hash, Some(limit)).await
    }

    /// Start waiting without awaiting; the handle can be cancelled or awaited later.
    pub fn track(&self, tx_hash: TxHash) -> PendingTransaction {
        self.waiter.wait(tx_hash)
    }

    pub fn cancel_wait(&self, tx_hash: TxHash) -> bool {
        self.waiter.cancel(tx_hash)
    }

    pub fn waits_in_flight(&self) -> usize {
        self.waiter.in_flight()
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("api", &self.api)
            .field("waits_in_flight", &self.waiter.in_flight())
            .finish()
    }
}
