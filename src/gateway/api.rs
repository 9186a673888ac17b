//! HTTP routes of the blockchain gateway.
//!
//! # Responsibilities
//! - Authenticate every request with HTTP Basic credentials from config
//! - Map statuses onto [`GatewayError`] (401/403 → `Unauthorized`)
//! - Accept single-value bodies either bare (`"0x.."`) or wrapped
//!   (`{"transactionHash": "0x.."}`)
//! - Parse address arguments before they reach a path or body

use alloy::primitives::{Address, TxHash};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::address::parse_address;
use crate::config::GatewayConfig;
use crate::gateway::types::{AuthorizationStatus, GatewayError, GatewayResult, TransactionResult, UsageCheck};
use crate::gateway::waiter::TransactionStatusSource;
use crate::observability::metrics;

const HASH_KEYS: &[&str] = &["transactionHash", "hash"];

/// Thin client over the gateway routes. Cheap to clone.
#[derive(Clone)]
pub struct GatewayApi {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl GatewayApi {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Allow `user` to broadcast transactions through the gateway.
    pub async fn authorize(&self, user: &str) -> GatewayResult<AuthorizationStatus> {
        let url = self.url(&format!("users/{}/authorise", address_arg(user)?));
        self.send_json("authorise", self.http.put(url)).await
    }

    /// Revoke `user`; it can no longer broadcast transactions.
    pub async fn revoke(&self, user: &str) -> GatewayResult<AuthorizationStatus> {
        let url = self.url(&format!("users/{}/revoke", address_arg(user)?));
        self.send_json("revoke", self.http.put(url)).await
    }

    /// Deploy a user identity contract for `owner`.
    pub async fn create_identity(&self, owner: &str) -> GatewayResult<TxHash> {
        let body = json!({ "ownerAddress": address_arg(owner)? });
        let value: Value = self.send_json("create_identity", self.http.post(self.url("users")).json(&body)).await?;
        single_value(value, HASH_KEYS)
    }

    /// Identity contract address belonging to `owner`.
    pub async fn identity_address(&self, owner: &str) -> GatewayResult<Address> {
        let url = self.url(&format!("users/{}/identity", address_arg(owner)?));
        let value: Value = self.send_json("identity", self.http.get(url)).await?;
        single_value(value, &["userIdentityAddress", "identityAddress", "address"])
    }

    /// Dry-run of [`record_usage`](Self::record_usage).
    pub async fn check_usage(&self, component: &str, subscriber: &str) -> GatewayResult<UsageCheck> {
        let url = self.url(&format!(
            "components/{}/checkUsage/{}",
            address_arg(component)?,
            address_arg(subscriber)?
        ));
        self.send_json("check_usage", self.http.get(url)).await
    }

    pub async fn record_usage(&self, component: &str, subscriber: &str) -> GatewayResult<TxHash> {
        let url = self.url(&format!("components/{}/recordUsage", address_arg(component)?));
        let body = json!({ "subscriberAddress": address_arg(subscriber)? });
        let value: Value = self.send_json("record_usage", self.http.post(url).json(&body)).await?;
        single_value(value, HASH_KEYS)
    }

    pub async fn charge_subscription(&self, component: &str, subscriber: &str) -> GatewayResult<TxHash> {
        let url = self.url(&format!("components/{}/chargeMonthlySubscription", address_arg(component)?));
        let body = json!({ "subscriberAddress": address_arg(subscriber)? });
        let value: Value = self.send_json("charge_subscription", self.http.post(url).json(&body)).await?;
        single_value(value, HASH_KEYS)
    }

    /// Address of the component created by `tx_hash`.
    pub async fn component_address_by_tx(&self, tx_hash: TxHash) -> GatewayResult<Address> {
        let url = self.url(&format!("components/{}", tx_hash));
        let value: Value = self.send_json("component_by_tx", self.http.get(url)).await?;
        single_value(value, &["componentAddress", "address"])
    }

    pub async fn transaction_result(&self, tx_hash: TxHash) -> GatewayResult<TransactionResult> {
        let url = self.url(&format!("transactions/{}", tx_hash));
        self.send_json("transaction_result", self.http.get(url)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(&self, route: &'static str, request: RequestBuilder) -> GatewayResult<T> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| {
                metrics::record_gateway_request(route, "network");
                GatewayError::Network(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            metrics::record_gateway_request(route, "unauthorized");
            tracing::warn!(route, status = status.as_u16(), "Gateway rejected credentials");
            return Err(GatewayError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            metrics::record_gateway_request(route, "error");
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(route, status = status.as_u16(), "Gateway request failed");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        metrics::record_gateway_request(route, "ok");
        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("{}: {}", route, e)))
    }
}

impl TransactionStatusSource for GatewayApi {
    fn transaction_result(&self, tx_hash: TxHash) -> impl Future<Output = GatewayResult<TransactionResult>> + Send {
        GatewayApi::transaction_result(self, tx_hash)
    }
}

impl std::fmt::Debug for GatewayApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayApi")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish()
    }
}

/// Parsed address, rendered as checksummed `0x` hex in paths and bodies.
fn address_arg(text: &str) -> GatewayResult<Address> {
    parse_address(text).map_err(|_| GatewayError::InvalidAddress(text.to_string()))
}

/// Pull one value out of a bare string or an object holding one of `keys`.
fn single_value<T>(value: Value, keys: &[&str]) -> GatewayResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = match &value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => keys.iter().find_map(|k| map.get(*k).and_then(Value::as_str)),
        _ => None,
    }
    .ok_or_else(|| GatewayError::Decode(format!("expected one of {:?} in {}", keys, value)))?;

    raw.parse()
        .map_err(|e| GatewayError::Decode(format!("'{}': {}", raw, e)))
}
