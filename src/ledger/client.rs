//! Token, repository and transfer operations.
//!
//! # Responsibilities
//! - Token balances (kept as `U256`)
//! - Component repository listing and owner lookup
//! - Signed token transfers and native value sends
//! - Recent transaction history via the block explorer
//!
//! Sends go to the primary endpoint only, with a signer built from the
//! caller's key for that one call.

use alloy::network::TransactionBuilder;
use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;

use crate::blockchain::address::parse_address;
use crate::blockchain::{ChainError, ChainReader, ChainResult, Wallet};
use crate::config::{ContractsConfig, ExplorerConfig};
use crate::contracts::abi::{IComponentRepository, IToken};
use crate::contracts::types::to_host_u64;
use crate::ledger::explorer::{ExplorerClient, ExplorerTransaction, TransactionList};

/// Chain-wide reads plus the only state-changing calls made directly on chain.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    chain: ChainReader,
    token: Address,
    component_repository: Address,
    explorer: ExplorerClient,
}

impl LedgerClient {
    pub fn new(
        chain: ChainReader,
        contracts: &ContractsConfig,
        explorer: &ExplorerConfig,
    ) -> ChainResult<Self> {
        Ok(Self {
            chain,
            token: parse_address(&contracts.token)?,
            component_repository: parse_address(&contracts.component_repository)?,
            explorer: ExplorerClient::new(explorer)?,
        })
    }

    /// Token balance of `address` in the token's smallest unit.
    pub async fn token_balance(&self, address: &str) -> ChainResult<U256> {
        let account = parse_address(address)?;
        let token = self.token;
        self.chain
            .read("balanceOf", |provider| async move {
                IToken::new(token, provider).balanceOf(account).call().await
            })
            .await
    }

    /// Every contract registered in the component repository.
    pub async fn entity_addresses(&self) -> ChainResult<Vec<Address>> {
        let repository = self.component_repository;
        self.chain
            .read("getComponents", |provider| async move {
                IComponentRepository::new(repository, provider).getComponents().call().await
            })
            .await
    }

    pub async fn entity_count(&self) -> ChainResult<u64> {
        let repository = self.component_repository;
        self.chain
            .read("getComponentsLength", |provider| async move {
                IComponentRepository::new(repository, provider).getComponentsLength().call().await
            })
            .await
            .map(to_host_u64)
    }

    /// Owner recorded by the repository, or `None` when the repository has
    /// no record for `address`. A record with a zero owner is returned as-is.
    pub async fn entity_owner(&self, address: &str) -> ChainResult<Option<Address>> {
        let component = parse_address(address)?;
        let repository = self.component_repository;
        let record = self
            .chain
            .read("componentsData", |provider| async move {
                IComponentRepository::new(repository, provider)
                    .componentsData(component)
                    .call()
                    .await
            })
            .await?;

        Ok(record.exists.then_some(record.owner))
    }

    /// Transfer `amount` tokens from the key's account to `to`.
    pub async fn transfer(&self, private_key: &str, to: &str, amount: U256) -> ChainResult<TxHash> {
        let wallet = Wallet::from_private_key(private_key)?;
        let recipient = parse_address(to)?;
        let from = wallet.address();

        let provider = ProviderBuilder::new()
            .wallet(wallet.into_ethereum_wallet())
            .connect_http(self.chain.primary_url().clone());

        let token = IToken::new(self.token, provider);
        let pending = self
            .chain
            .with_timeout(async {
                token
                    .transfer(recipient, amount)
                    .send()
                    .await
                    .map_err(contract_send_failure)
            })
            .await?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(%from, to = %recipient, %amount, %tx_hash, "Token transfer submitted");
        Ok(tx_hash)
    }

    /// Send native currency. `amount` is a decimal string in whole units
    /// (e.g. "0.25"), converted to wei.
    pub async fn send_native(&self, private_key: &str, to: &str, amount: &str) -> ChainResult<TxHash> {
        let value = parse_native_amount(amount)?;
        let wallet = Wallet::from_private_key(private_key)?;
        let recipient = parse_address(to)?;
        let from = wallet.address();

        let provider = ProviderBuilder::new()
            .wallet(wallet.into_ethereum_wallet())
            .connect_http(self.chain.primary_url().clone());

        let tx = TransactionRequest::default()
            .with_to(recipient)
            .with_value(value);

        let pending = self
            .chain
            .with_timeout(async { provider.send_transaction(tx).await.map_err(send_failure) })
            .await?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(%from, to = %recipient, %value, %tx_hash, "Native transfer submitted");
        Ok(tx_hash)
    }

    /// Most recent native transactions of `address`, newest first.
    pub async fn recent_transactions(&self, address: &str, limit: usize) -> ChainResult<Vec<ExplorerTransaction>> {
        self.explorer.latest(TransactionList::Native, address, limit).await
    }

    /// Most recent token transfers of `address`, newest first.
    pub async fn recent_token_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> ChainResult<Vec<ExplorerTransaction>> {
        self.explorer.latest(TransactionList::Token, address, limit).await
    }
}

/// A node that answers with an error response refused the transaction;
/// anything else means it was never reached.
fn send_failure(err: TransportError) -> ChainError {
    match err.as_error_resp() {
        Some(payload) => ChainError::TransferRejected(payload.message.to_string()),
        None => ChainError::Rpc(format!("Send failed: {}", err)),
    }
}

fn contract_send_failure(err: alloy::contract::Error) -> ChainError {
    match err {
        alloy::contract::Error::TransportError(e) => send_failure(e),
        other => ChainError::TransferRejected(other.to_string()),
    }
}

/// Parse a non-negative decimal amount of native currency into wei.
pub fn parse_native_amount(amount: &str) -> ChainResult<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(ChainError::InvalidAmount(amount.to_string()));
    }
    parse_ether(trimmed).map_err(|_| ChainError::InvalidAmount(amount.to_string()))
}
