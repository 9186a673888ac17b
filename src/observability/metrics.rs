//! Metrics collection.
//!
//! # Metrics
//! - `sdk_gateway_requests_total` (counter): gateway calls by route, outcome
//! - `sdk_rpc_failovers_total` (counter): endpoint failures by method
//! - `sdk_rpc_healthy` (gauge): 1=primary or fallback reachable, 0=not
//! - `sdk_transaction_waits_total` (counter): wait outcomes
//! - `sdk_contract_cache_size` (gauge): cached handles by entity kind
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; a no-op until the host
//!   installs a recorder

/// Record a completed gateway request.
pub fn record_gateway_request(route: &'static str, outcome: &'static str) {
    metrics::counter!("sdk_gateway_requests_total", "route" => route, "outcome" => outcome)
        .increment(1);
}

/// Record an RPC endpoint failure that caused a fallback attempt.
pub fn record_rpc_failover(method: &'static str) {
    metrics::counter!("sdk_rpc_failovers_total", "method" => method).increment(1);
}

/// Record the result of an RPC health check.
pub fn record_rpc_health(healthy: bool) {
    metrics::gauge!("sdk_rpc_healthy").set(if healthy { 1.0 } else { 0.0 });
}

/// Record how a transaction wait ended.
pub fn record_transaction_wait(outcome: &'static str) {
    metrics::counter!("sdk_transaction_waits_total", "outcome" => outcome).increment(1);
}

/// Record the number of cached contract handles of one kind.
pub fn record_cache_size(kind: &'static str, size: usize) {
    metrics::gauge!("sdk_contract_cache_size", "kind" => kind).set(size as f64);
}
