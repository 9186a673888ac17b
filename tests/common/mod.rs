//! In-process mock gateway, JSON-RPC node and block explorer.

#![allow(dead_code)]

use alloy::hex;
use alloy::primitives::{address, keccak256, Address, TxHash, U256};
use alloy::sol_types::{SolCall, SolValue};
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use seedtoken_sdk::config::{ChainConfig, ContractsConfig, ExplorerConfig, GatewayConfig};
use seedtoken_sdk::contracts::abi::{ICui, IComponent, IComponentRepository, ISubscribable, IToken, IUserIdentity};

pub const USERNAME: &str = "svc";
pub const PASSWORD: &str = "secret";
/// `svc:secret`
const BASIC_CREDENTIALS: &str = "Basic c3ZjOnNlY3JldA==";

pub const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const REPOSITORY: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
pub const USER_REPOSITORY: Address = address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");
pub const COMPONENT: Address = address!("c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0");
pub const CUI: Address = address!("c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1");
pub const IDENTITY: Address = address!("1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d1d");
pub const OWNER: Address = address!("0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a");
pub const SUBSCRIBER: Address = address!("5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b5b");
/// Transfers and native sends to this address revert during gas estimation.
pub const REJECTING_RECIPIENT: Address = address!("bad0bad0bad0bad0bad0bad0bad0bad0bad0bad0");
/// Not registered in the repository.
pub const STRANGER: Address = address!("dededededededededededededededededededede");

/// Gateway hash that confirms on the third status poll.
pub const PENDING_TX: &str = "0x1111111111111111111111111111111111111111111111111111111111111111";
/// Gateway hash that is reported failed on the first poll.
pub const FAILED_TX: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";

pub const CONFIRM_AFTER_POLLS: u64 = 3;

pub fn tx_hash(hex: &str) -> TxHash {
    hex.parse().unwrap()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct GatewayState {
    polls: Mutex<HashMap<String, u64>>,
    pub requests: AtomicU64,
}

impl GatewayState {
    pub fn polls(&self, hash: &str) -> u64 {
        self.polls.lock().unwrap().get(hash).copied().unwrap_or(0)
    }
}

pub struct MockGateway {
    pub addr: SocketAddr,
    pub state: Arc<GatewayState>,
}

impl MockGateway {
    pub fn config(&self, poll_interval_ms: u64) -> GatewayConfig {
        GatewayConfig {
            base_url: format!("http://{}", self.addr),
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
            request_timeout_secs: 5,
            poll_interval_ms,
            wait_timeout_secs: None,
        }
    }
}

pub async fn start_gateway() -> MockGateway {
    let state = Arc::new(GatewayState::default());

    let router = Router::new()
        .route("/users", post(create_identity))
        .route("/users/{id}/authorise", put(authorise))
        .route("/users/{id}/revoke", put(revoke))
        .route("/users/{id}/identity", get(identity))
        .route("/components/{id}", get(component_by_tx))
        .route("/components/{id}/checkUsage/{subscriber}", get(check_usage))
        .route("/components/{id}/recordUsage", post(record_usage))
        .route("/components/{id}/chargeMonthlySubscription", post(charge_subscription))
        .route("/transactions/{id}", get(transaction))
        .layer(middleware::from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state.clone());

    MockGateway {
        addr: serve(router).await,
        state,
    }
}

async fn require_basic_auth(State(state): State<Arc<GatewayState>>, request: Request, next: Next) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(BASIC_CREDENTIALS);

    if authorized {
        next.run(request).await
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn create_identity(Json(body): Json<Value>) -> Response {
    if body.get("ownerAddress").and_then(Value::as_str).is_none() {
        return (StatusCode::BAD_REQUEST, "ownerAddress required").into_response();
    }
    // Bare JSON string
    Json(json!(PENDING_TX)).into_response()
}

async fn authorise(Path(_user): Path<String>) -> Json<Value> {
    Json(json!({ "transactionHash": PENDING_TX, "authorised": true }))
}

async fn revoke(Path(_user): Path<String>) -> Json<Value> {
    Json(json!({ "authorised": false }))
}

async fn identity(Path(owner): Path<String>) -> Response {
    if !owner.starts_with("0x") {
        return (StatusCode::BAD_REQUEST, "address must be canonical").into_response();
    }
    Json(json!({ "userIdentityAddress": IDENTITY.to_string() })).into_response()
}

async fn component_by_tx(Path(_tx): Path<String>) -> Json<Value> {
    Json(json!({ "componentAddress": COMPONENT.to_string() }))
}

async fn check_usage(Path((_component, subscriber)): Path<(String, String)>) -> Json<Value> {
    if subscriber.eq_ignore_ascii_case(&SUBSCRIBER.to_string()) {
        Json(json!({ "valid": true }))
    } else {
        Json(json!({ "valid": false, "errorMessage": "Subscriber is not active" }))
    }
}

async fn record_usage(Path(_component): Path<String>, Json(body): Json<Value>) -> Response {
    if body.get("subscriberAddress").and_then(Value::as_str).is_none() {
        return (StatusCode::BAD_REQUEST, "subscriberAddress required").into_response();
    }
    Json(json!({ "transactionHash": PENDING_TX })).into_response()
}

async fn charge_subscription(Path(_component): Path<String>) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Subscription not due").into_response()
}

async fn transaction(State(state): State<Arc<GatewayState>>, Path(hash): Path<String>) -> Json<Value> {
    let polls = {
        let mut polls = state.polls.lock().unwrap();
        let count = polls.entry(hash.clone()).or_insert(0);
        *count += 1;
        *count
    };

    if hash == FAILED_TX {
        Json(json!({ "processed": true, "failed": true }))
    } else {
        Json(json!({ "processed": polls >= CONFIRM_AFTER_POLLS, "failed": false }))
    }
}

// ---------------------------------------------------------------------------
// JSON-RPC node
// ---------------------------------------------------------------------------

pub const MONTHLY_FEE_OVERFLOWS: U256 = U256::MAX;

pub struct MockNode {
    pub addr: SocketAddr,
    pub calls: Arc<AtomicU64>,
    raw_transactions: Arc<Mutex<Vec<Vec<u8>>>>,
}

#[derive(Clone, Copy, PartialEq)]
enum NodeMode {
    Healthy,
    /// Answers every request with a -32005 error response.
    RateLimited,
}

#[derive(Clone)]
struct NodeState {
    mode: NodeMode,
    calls: Arc<AtomicU64>,
    raw_transactions: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockNode {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Dead primary, this node as fallback.
    pub fn chain_config_behind_dead_primary(&self) -> ChainConfig {
        ChainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            fallback_url: Some(self.url()),
            rpc_timeout_secs: 5,
        }
    }

    pub fn chain_config(&self) -> ChainConfig {
        ChainConfig {
            rpc_url: self.url(),
            fallback_url: None,
            rpc_timeout_secs: 5,
        }
    }

    /// This node as primary, `fallback` behind it.
    pub fn chain_config_with_fallback(&self, fallback: &MockNode) -> ChainConfig {
        ChainConfig {
            fallback_url: Some(fallback.url()),
            ..self.chain_config()
        }
    }

    /// Signed transactions received through `eth_sendRawTransaction`.
    pub fn raw_transactions(&self) -> Vec<Vec<u8>> {
        self.raw_transactions.lock().unwrap().clone()
    }
}

pub fn contracts_config() -> ContractsConfig {
    ContractsConfig {
        token: TOKEN.to_string(),
        component_repository: REPOSITORY.to_string(),
        user_repository: USER_REPOSITORY.to_string(),
    }
}

pub async fn start_node() -> MockNode {
    start_node_in(NodeMode::Healthy).await
}

/// A node that is up but refuses to serve anything.
pub async fn start_rate_limited_node() -> MockNode {
    start_node_in(NodeMode::RateLimited).await
}

async fn start_node_in(mode: NodeMode) -> MockNode {
    let state = NodeState {
        mode,
        calls: Arc::new(AtomicU64::new(0)),
        raw_transactions: Arc::new(Mutex::new(Vec::new())),
    };
    let router = Router::new().route("/", post(json_rpc)).with_state(state.clone());

    MockNode {
        addr: serve(router).await,
        calls: state.calls,
        raw_transactions: state.raw_transactions,
    }
}

/// One gwei, used for every fee quote.
const GAS_PRICE: &str = "0x3b9aca00";

async fn json_rpc(State(state): State<NodeState>, Json(request): Json<Value>) -> Json<Value> {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(Value::as_str).unwrap_or_default();
    let params = &request["params"];

    let outcome = if state.mode == NodeMode::RateLimited {
        Err(json!({ "code": -32005, "message": "limit exceeded" }))
    } else {
        match method {
            "eth_chainId" => Ok(json!("0x7a69")),
            "eth_blockNumber" => Ok(json!("0x2a")),
            "eth_call" => eth_call(&params[0]),
            "eth_getTransactionCount" => Ok(json!("0x0")),
            "eth_gasPrice" | "eth_maxPriorityFeePerGas" => Ok(json!(GAS_PRICE)),
            "eth_feeHistory" => Ok(fee_history()),
            "eth_estimateGas" => estimate_gas(&params[0]),
            "eth_sendRawTransaction" => send_raw_transaction(&state, &params[0]),
            _ => Err(json!({ "code": -32601, "message": "method not found" })),
        }
    };

    match outcome {
        Ok(result) => Json(json!({ "jsonrpc": "2.0", "id": id, "result": result })),
        Err(error) => Json(json!({ "jsonrpc": "2.0", "id": id, "error": error })),
    }
}

fn eth_call(call: &Value) -> Result<Value, Value> {
    let revert = || json!({ "code": 3, "message": "execution reverted", "data": "0x" });

    let to: Address = call
        .get("to")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(revert)?;
    let input = call
        .get("input")
        .or_else(|| call.get("data"))
        .and_then(Value::as_str)
        .and_then(|s| hex::decode(s).ok())
        .filter(|bytes| bytes.len() >= 4)
        .ok_or_else(revert)?;

    let selector: [u8; 4] = [input[0], input[1], input[2], input[3]];
    let args = &input[4..];

    let output = if to == COMPONENT {
        component_call(selector, args)
    } else if to == CUI {
        cui_call(selector, args)
    } else if to == IDENTITY {
        identity_call(selector)
    } else if to == REPOSITORY {
        repository_call(selector, args)
    } else if to == TOKEN {
        token_call(selector, args)
    } else {
        None
    }
    .ok_or_else(revert)?;

    Ok(json!(hex::encode_prefixed(output)))
}

fn fee_history() -> Value {
    json!({
        "oldestBlock": "0x20",
        "baseFeePerGas": vec![GAS_PRICE; 11],
        "gasUsedRatio": vec![0.5; 10],
        "reward": vec![vec![GAS_PRICE]; 10],
    })
}

fn estimate_gas(tx: &Value) -> Result<Value, Value> {
    let rejected = || json!({ "code": 3, "message": "execution reverted: transfer rejected", "data": "0x" });

    let to: Option<Address> = tx.get("to").and_then(Value::as_str).and_then(|s| s.parse().ok());
    let input = tx
        .get("input")
        .or_else(|| tx.get("data"))
        .and_then(Value::as_str)
        .and_then(|s| hex::decode(s).ok())
        .unwrap_or_default();

    if to == Some(REJECTING_RECIPIENT) {
        return Err(rejected());
    }
    if to == Some(TOKEN) {
        if input.len() < 4 || input[..4] != IToken::transferCall::SELECTOR {
            return Err(rejected());
        }
        if arg_address(&input[4..], 0) == Some(REJECTING_RECIPIENT) {
            return Err(rejected());
        }
        return Ok(json!("0xea60"));
    }
    Ok(json!("0x5208"))
}

/// Records the raw bytes and answers with their hash, as a node would.
fn send_raw_transaction(state: &NodeState, raw: &Value) -> Result<Value, Value> {
    let bytes = raw
        .as_str()
        .and_then(|s| hex::decode(s).ok())
        .ok_or_else(|| json!({ "code": -32602, "message": "invalid raw transaction" }))?;

    let hash = keccak256(&bytes);
    state.raw_transactions.lock().unwrap().push(bytes);
    Ok(json!(hash))
}

fn arg_address(args: &[u8], word: usize) -> Option<Address> {
    let start = word * 32;
    args.get(start + 12..start + 32).map(Address::from_slice)
}

fn arg_u256(args: &[u8], word: usize) -> Option<U256> {
    let start = word * 32;
    args.get(start..start + 32).map(U256::from_be_slice)
}

fn subscription_record() -> ISubscribable::Subscription {
    ISubscribable::Subscription {
        start: U256::from(1_700_000_000u64),
        end: U256::from(1_702_592_000u64),
        usage: U256::from(42u64),
        totalCharged: U256::from(420u64),
        fee: U256::from(10u64),
    }
}

/// Subscription functions shared by components and CUIs.
fn subscribable_call(selector: [u8; 4], args: &[u8]) -> Option<Vec<u8>> {
    if selector == ISubscribable::getSubscribersArrayCall::SELECTOR {
        Some(vec![SUBSCRIBER, OWNER].abi_encode())
    } else if selector == ISubscribable::subscribersCall::SELECTOR {
        let active = arg_address(args, 0)? == SUBSCRIBER;
        Some((active, U256::from(if active { 3u64 } else { 0 })).abi_encode_params())
    } else if selector == ISubscribable::getLatestSubscriptionForUserCall::SELECTOR {
        Some(subscription_record().abi_encode())
    } else if selector == ISubscribable::getSubscriptionForUserByIndexCall::SELECTOR {
        // One subscription on record; anything past it reverts
        (arg_u256(args, 1)? == U256::ZERO).then(|| subscription_record().abi_encode())
    } else {
        None
    }
}

fn component_call(selector: [u8; 4], args: &[u8]) -> Option<Vec<u8>> {
    if selector == IComponent::getDataCall::SELECTOR {
        Some(
            (
                OWNER,
                false,
                true,
                U256::from(25u64),
                true,
                MONTHLY_FEE_OVERFLOWS,
                U256::from(2u64),
                U256::from(7u64),
            )
                .abi_encode_params(),
        )
    } else if selector == IComponent::isFreeCall::SELECTOR {
        Some(false.abi_encode())
    } else if selector == IComponent::getSubscriptionsArrayCall::SELECTOR {
        Some(vec![CUI].abi_encode())
    } else {
        subscribable_call(selector, args)
    }
}

fn cui_call(selector: [u8; 4], args: &[u8]) -> Option<Vec<u8>> {
    if selector == ICui::ownerCall::SELECTOR {
        Some(OWNER.abi_encode())
    } else if selector == ICui::licenseFeeCall::SELECTOR {
        Some(U256::from(500u64).abi_encode())
    } else if selector == ICui::latestLicenseChangeCall::SELECTOR {
        Some(U256::from(1_690_000_000u64).abi_encode())
    } else if selector == ICui::isRevokedCall::SELECTOR {
        Some(true.abi_encode())
    } else if selector == ICui::getSubscribersArrayLengthCall::SELECTOR {
        Some(U256::from(2u64).abi_encode())
    } else {
        subscribable_call(selector, args)
    }
}

fn identity_call(selector: [u8; 4]) -> Option<Vec<u8>> {
    if selector == IUserIdentity::getComponentsArrayCall::SELECTOR {
        Some(vec![COMPONENT].abi_encode())
    } else if selector == IUserIdentity::getComponentsLengthCall::SELECTOR {
        Some(U256::from(1u64).abi_encode())
    } else if selector == IUserIdentity::getSubscriptionsArrayCall::SELECTOR {
        Some(vec![COMPONENT, CUI].abi_encode())
    } else if selector == IUserIdentity::getSubscriptionsLengthCall::SELECTOR {
        Some(U256::from(2u64).abi_encode())
    } else {
        None
    }
}

fn repository_call(selector: [u8; 4], args: &[u8]) -> Option<Vec<u8>> {
    if selector == IComponentRepository::getComponentsCall::SELECTOR {
        Some(vec![COMPONENT, CUI].abi_encode())
    } else if selector == IComponentRepository::getComponentsLengthCall::SELECTOR {
        Some(U256::from(2u64).abi_encode())
    } else if selector == IComponentRepository::componentsDataCall::SELECTOR {
        let component = arg_address(args, 0)?;
        let record = if component == COMPONENT || component == CUI {
            (OWNER, true)
        } else {
            (Address::ZERO, false)
        };
        Some(record.abi_encode_params())
    } else {
        None
    }
}

fn token_call(selector: [u8; 4], args: &[u8]) -> Option<Vec<u8>> {
    if selector == IToken::balanceOfCall::SELECTOR {
        let balance = if arg_address(args, 0)? == OWNER {
            // Above u64::MAX on purpose
            U256::from(5u64) * U256::from(10u64).pow(U256::from(24u64))
        } else {
            U256::ZERO
        };
        Some(balance.abi_encode())
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Block explorer
// ---------------------------------------------------------------------------

pub struct MockExplorer {
    pub addr: SocketAddr,
    pub last_query: Arc<Mutex<HashMap<String, String>>>,
}

impl MockExplorer {
    pub fn config(&self) -> ExplorerConfig {
        ExplorerConfig {
            base_url: format!("http://{}", self.addr),
            request_timeout_secs: 5,
        }
    }

    pub fn last_query(&self, key: &str) -> Option<String> {
        self.last_query.lock().unwrap().get(key).cloned()
    }
}

pub async fn start_explorer() -> MockExplorer {
    let last_query = Arc::new(Mutex::new(HashMap::new()));
    let router = Router::new()
        .route("/api", get(explorer_api))
        .with_state(last_query.clone());

    MockExplorer {
        addr: serve(router).await,
        last_query,
    }
}

async fn explorer_api(
    State(last_query): State<Arc<Mutex<HashMap<String, String>>>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    *last_query.lock().unwrap() = query.clone();

    let address = query.get("address").cloned().unwrap_or_default();
    if address.eq_ignore_ascii_case(&STRANGER.to_string()) {
        return Json(json!({ "status": "0", "message": "No transactions found", "result": [] }));
    }
    if !address.starts_with("0x") {
        return Json(json!({ "status": "0", "message": "NOTOK", "result": "Error! Invalid address format" }));
    }

    let token_symbol = if query.get("action").map(String::as_str) == Some("tokentx") {
        "SEED"
    } else {
        ""
    };

    // Newest first, more than any test asks for
    let transactions: Vec<Value> = (0..5u64)
        .map(|i| {
            json!({
                "blockNumber": (100 - i).to_string(),
                "timeStamp": (1_700_000_000 - i * 12).to_string(),
                "hash": format!("0x{:064x}", 100 - i),
                "from": OWNER.to_string(),
                "to": address.as_str(),
                "value": "1000000000000000000",
                "isError": "0",
                "tokenSymbol": token_symbol,
            })
        })
        .collect();

    Json(json!({ "status": "1", "message": "OK", "result": transactions }))
}
