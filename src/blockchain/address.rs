//! Address canonicalization and wallet signature checks.
//!
//! # Responsibilities
//! - Canonicalize and compare textual addresses (`0x` prefix, case-insensitive)
//! - Recover the signer of an EIP-191 personal message
//! - Derive the address embedded in an encrypted wallet document
//! - Prove wallet ownership and guard wallet rotation
//!
//! Wallet documents are never decrypted: the keystore format stores the
//! account address in clear, which is all these checks need.

use alloy::hex;
use alloy::primitives::{Address, Signature};
use serde_json::Value;

use crate::blockchain::types::{ChainError, ChainResult};

/// Prefix `0x` when absent. Case of the hex digits is left untouched; an
/// upper-case `0X` prefix is rewritten to `0x`.
pub fn canonicalize(address: &str) -> String {
    if address.starts_with("0x") {
        address.to_string()
    } else if let Some(rest) = address.strip_prefix("0X") {
        format!("0x{}", rest)
    } else {
        format!("0x{}", address)
    }
}

/// Compare two addresses in canonical form, ignoring case.
pub fn addresses_equal(a: &str, b: &str) -> bool {
    canonicalize(a).eq_ignore_ascii_case(&canonicalize(b))
}

/// Parse text into an [`Address`], accepting a missing `0x` prefix and any case.
pub fn parse_address(address: &str) -> ChainResult<Address> {
    canonicalize(address.trim())
        .parse()
        .map_err(|_| ChainError::InvalidAddress(address.to_string()))
}

/// Recover the address that produced `signature` over `message`.
pub fn recover_signer(message: &str, signature: &str) -> ChainResult<Address> {
    let bytes = hex::decode(signature.trim())
        .map_err(|e| ChainError::InvalidSignature(format!("not hex: {}", e)))?;
    let signature = Signature::try_from(bytes.as_slice())
        .map_err(|e| ChainError::InvalidSignature(e.to_string()))?;

    signature
        .recover_address_from_msg(message.as_bytes())
        .map_err(|e| ChainError::InvalidSignature(e.to_string()))
}

/// Read the account address stored in a wallet document.
///
/// Accepts V3 keystores (`address`) and presale wallets (`ethaddr`).
pub fn address_from_wallet(wallet_json: &str) -> ChainResult<Address> {
    let document: Value = serde_json::from_str(wallet_json)
        .map_err(|e| ChainError::MalformedWallet(format!("invalid JSON: {}", e)))?;

    let raw = document
        .get("address")
        .or_else(|| document.get("ethaddr"))
        .and_then(Value::as_str)
        .ok_or_else(|| ChainError::MalformedWallet("missing address field".to_string()))?;

    parse_address(raw).map_err(|_| ChainError::MalformedWallet(format!("unparseable address '{}'", raw)))
}

/// True when `signature` over `expected_message` was produced by the wallet's key.
pub fn verify_wallet_ownership(
    wallet_json: &str,
    signature: &str,
    expected_message: &str,
) -> ChainResult<bool> {
    let wallet_address = address_from_wallet(wallet_json)?;
    let signer = recover_signer(expected_message, signature)?;
    Ok(wallet_address == signer)
}

/// True when both wallet documents control the same address.
pub fn wallets_share_address(old_wallet_json: &str, new_wallet_json: &str) -> ChainResult<bool> {
    let old_address = address_from_wallet(old_wallet_json)?;
    let new_address = address_from_wallet(new_wallet_json)?;
    Ok(old_address == new_address)
}

/// Wallet checks bound to the challenge message users sign to prove ownership.
#[derive(Debug, Clone)]
pub struct WalletVerifier {
    challenge: String,
}

impl WalletVerifier {
    pub fn new(challenge: impl Into<String>) -> Self {
        Self {
            challenge: challenge.into(),
        }
    }

    pub fn challenge(&self) -> &str {
        &self.challenge
    }

    /// Ownership proof against the configured challenge.
    pub fn verify_ownership(&self, wallet_json: &str, signature: &str) -> ChainResult<bool> {
        verify_wallet_ownership(wallet_json, signature, &self.challenge)
    }

    /// Validate a wallet update: the same signature must be presented twice,
    /// it must prove ownership of the new wallet, and the controlling
    /// address must not change.
    pub fn verify_rotation(
        &self,
        old_wallet_json: &str,
        new_wallet_json: &str,
        old_signature: &str,
        new_signature: &str,
    ) -> ChainResult<bool> {
        if old_signature.as_bytes() != new_signature.as_bytes() {
            tracing::debug!("Wallet rotation rejected: signatures differ");
            return Ok(false);
        }

        if !self.verify_ownership(new_wallet_json, new_signature)? {
            tracing::debug!("Wallet rotation rejected: new wallet ownership not proven");
            return Ok(false);
        }

        wallets_share_address(old_wallet_json, new_wallet_json)
    }
}
