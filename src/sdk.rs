//! SDK entry point.
//!
//! # Data Flow
//! ```text
//! SdkConfig
//!     → ChainReader (shared by contracts and ledger)
//!     → ContractRegistry / LedgerClient  (reads, direct transfers)
//!     → GatewayClient                    (gateway writes + confirmation waits)
//!     → WalletVerifier                   (gates wallet-controlled requests)
//! ```

use alloy::primitives::Address;
use thiserror::Error;

use crate::blockchain::address::address_from_wallet;
use crate::blockchain::{ChainError, ChainReader, WalletVerifier};
use crate::config::{load_from_env, validate_config, ConfigError, SdkConfig};
use crate::contracts::ContractRegistry;
use crate::gateway::{AuthorizationStatus, GatewayClient, GatewayError};
use crate::ledger::LedgerClient;

/// Errors from building the SDK or from flows spanning several clients.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The signature does not prove control of the wallet.
    #[error("Signature does not prove ownership of wallet {0}")]
    OwnershipNotProven(Address),
}

/// Every client of the SDK, wired to one configuration.
#[derive(Debug)]
pub struct SeedTokenSdk {
    chain: ChainReader,
    contracts: ContractRegistry,
    ledger: LedgerClient,
    gateway: GatewayClient,
    wallets: WalletVerifier,
}

impl SeedTokenSdk {
    /// Build every client from a validated configuration.
    pub fn new(config: &SdkConfig) -> Result<Self, SdkError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let chain = ChainReader::new(&config.chain)?;
        let ledger = LedgerClient::new(chain.clone(), &config.contracts, &config.explorer)?;
        let gateway = GatewayClient::new(&config.gateway)?;

        tracing::info!(
            gateway = %config.gateway.base_url,
            rpc_endpoints = chain.endpoint_count(),
            "SeedToken SDK initialized"
        );

        Ok(Self {
            contracts: ContractRegistry::new(chain.clone()),
            chain,
            ledger,
            gateway,
            wallets: WalletVerifier::new(config.auth.sign_message.clone()),
        })
    }

    /// Build from the process environment.
    pub fn from_env() -> Result<Self, SdkError> {
        let config = load_from_env()?;
        Self::new(&config)
    }

    pub fn chain(&self) -> &ChainReader {
        &self.chain
    }

    pub fn contracts(&self) -> &ContractRegistry {
        &self.contracts
    }

    pub fn ledger(&self) -> &LedgerClient {
        &self.ledger
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    pub fn wallets(&self) -> &WalletVerifier {
        &self.wallets
    }

    /// Authorize the address behind `wallet_json` once `signature` proves
    /// its holder signed the challenge.
    pub async fn authorize_wallet(&self, wallet_json: &str, signature: &str) -> Result<AuthorizationStatus, SdkError> {
        let address = address_from_wallet(wallet_json)?;
        if !self.wallets.verify_ownership(wallet_json, signature)? {
            tracing::warn!(%address, "Authorization refused: ownership not proven");
            return Err(SdkError::OwnershipNotProven(address));
        }

        Ok(self.gateway.authorize(&address.to_string()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SdkConfig {
        let mut config = SdkConfig::default();
        config.contracts.token = "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string();
        config.contracts.component_repository = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".to_string();
        config.contracts.user_repository = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0".to_string();
        config
    }

    #[test]
    fn test_new_validates_config() {
        let result = SeedTokenSdk::new(&SdkConfig::default());
        assert!(matches!(result, Err(SdkError::Config(ConfigError::Validation(_)))));
    }

    #[tokio::test]
    async fn test_new_wires_clients() {
        let sdk = SeedTokenSdk::new(&config()).unwrap();
        assert_eq!(sdk.chain().endpoint_count(), 1);
        assert_eq!(sdk.wallets().challenge(), "SeedToken wallet verification");
        assert_eq!(sdk.gateway().waits_in_flight(), 0);
    }

    #[tokio::test]
    async fn test_authorize_wallet_requires_proof() {
        let sdk = SeedTokenSdk::new(&config()).unwrap();
        let wallet = r#"{"address":"f39fd6e51aad88f6f4ce6ab8827279cfffb92266"}"#;
        // Valid signature shape, wrong signer
        let signature = format!("0x{}1b", "11".repeat(64));

        match sdk.authorize_wallet(wallet, &signature).await {
            Err(SdkError::OwnershipNotProven(address)) => {
                assert_eq!(address, "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse::<Address>().unwrap());
            }
            Err(SdkError::Chain(ChainError::InvalidSignature(_))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
