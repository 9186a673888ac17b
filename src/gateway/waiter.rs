//! Transaction confirmation polling.
//!
//! # States
//! ```text
//! Pending ──processed, !failed──▶ Confirmed
//!    │
//!    └────processed, failed─────▶ Failed
//! ```
//!
//! # Design Decisions
//! - One poll job per transaction hash; a second wait for the same hash
//!   joins the running job instead of starting another
//! - Fixed interval, first poll immediately; gateway errors are logged and
//!   retried on the next tick
//! - No deadline unless one is configured or passed in; jobs can always be
//!   cancelled, and stop the moment a final state is seen
//! - Dropping a [`PendingTransaction`] does not stop the job; other callers
//!   may be joined to it

use alloy::primitives::TxHash;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::gateway::types::{GatewayResult, TransactionResult, TransactionState, WaitError};
use crate::observability::metrics;

/// Where transaction status comes from.
pub trait TransactionStatusSource: Send + Sync + 'static {
    fn transaction_result(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = GatewayResult<TransactionResult>> + Send;
}

/// A confirmed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub hash: TxHash,
    /// Status requests made before the final state was seen.
    pub polls: u64,
}

#[derive(Debug, Clone)]
enum JobStatus {
    Polling,
    Done(Result<Confirmation, WaitError>),
}

struct PollJob {
    id: u64,
    status: watch::Receiver<JobStatus>,
    abort: AbortHandle,
}

type JobTable = DashMap<TxHash, PollJob>;

/// Polls transaction status until a final state.
pub struct TransactionWaiter<S> {
    source: Arc<S>,
    poll_interval: Duration,
    default_timeout: Option<Duration>,
    jobs: Arc<JobTable>,
    next_id: Arc<AtomicU64>,
}

impl<S> Clone for TransactionWaiter<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            poll_interval: self.poll_interval,
            default_timeout: self.default_timeout,
            jobs: self.jobs.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

impl<S: TransactionStatusSource> TransactionWaiter<S> {
    pub fn new(source: Arc<S>, poll_interval: Duration, default_timeout: Option<Duration>) -> Self {
        Self {
            source,
            poll_interval,
            default_timeout,
            jobs: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait for `tx_hash` using the default timeout (unbounded unless configured).
    pub fn wait(&self, tx_hash: TxHash) -> PendingTransaction {
        self.wait_with_timeout(tx_hash, self.default_timeout)
    }

    /// Wait for `tx_hash`, giving up after `limit`.
    ///
    /// When a job for this hash is already running the caller joins it and
    /// `limit` is ignored; the running job keeps the limit it started with.
    pub fn wait_with_timeout(&self, tx_hash: TxHash, limit: Option<Duration>) -> PendingTransaction {
        let (id, status, abort) = match self.jobs.entry(tx_hash) {
            Entry::Occupied(job) => {
                tracing::debug!(%tx_hash, "Joining existing confirmation poll");
                let job = job.get();
                (job.id, job.status.clone(), job.abort.clone())
            }
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let (tx, rx) = watch::channel(JobStatus::Polling);

                // The task deregisters itself under this shard's lock, which we
                // hold until the job is inserted.
                let task = tokio::spawn(poll_until_final(
                    self.source.clone(),
                    self.jobs.clone(),
                    id,
                    tx_hash,
                    self.poll_interval,
                    limit,
                    tx,
                ));
                let abort = task.abort_handle();

                tracing::debug!(%tx_hash, interval_ms = self.poll_interval.as_millis() as u64, "Confirmation poll started");
                slot.insert(PollJob {
                    id,
                    status: rx.clone(),
                    abort: abort.clone(),
                });
                (id, rx, abort)
            }
        };

        PendingTransaction {
            hash: tx_hash,
            job_id: id,
            status,
            abort,
            jobs: self.jobs.clone(),
        }
    }

    /// Stop polling `tx_hash`. Every caller waiting on it sees `Cancelled`.
    ///
    /// Returns false when no poll was running for the hash.
    pub fn cancel(&self, tx_hash: TxHash) -> bool {
        match self.jobs.remove(&tx_hash) {
            Some((_, job)) => {
                job.abort.abort();
                metrics::record_transaction_wait("cancelled");
                tracing::info!(%tx_hash, "Confirmation poll cancelled");
                true
            }
            None => false,
        }
    }

    /// Number of hashes currently being polled.
    pub fn in_flight(&self) -> usize {
        self.jobs.len()
    }
}

/// A caller's view of one poll job.
pub struct PendingTransaction {
    hash: TxHash,
    job_id: u64,
    status: watch::Receiver<JobStatus>,
    abort: AbortHandle,
    jobs: Arc<JobTable>,
}

impl PendingTransaction {
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Current state without waiting.
    pub fn state(&self) -> TransactionState {
        match &*self.status.borrow() {
            JobStatus::Polling => TransactionState::Pending,
            JobStatus::Done(Ok(_)) => TransactionState::Confirmed,
            JobStatus::Done(Err(WaitError::Failed { .. })) => TransactionState::Failed,
            // Timed out or cancelled: the chain state is unknown
            JobStatus::Done(Err(_)) => TransactionState::Pending,
        }
    }

    /// Stop the shared poll job; joined callers see `Cancelled` too.
    pub fn cancel(&self) {
        if self.jobs.remove_if(&self.hash, |_, job| job.id == self.job_id).is_some() {
            metrics::record_transaction_wait("cancelled");
            tracing::info!(tx_hash = %self.hash, "Confirmation poll cancelled");
        }
        self.abort.abort();
    }

    /// Resolve once the transaction is confirmed, or fail.
    pub async fn outcome(mut self) -> Result<Confirmation, WaitError> {
        loop {
            if let Some(result) = self.settled() {
                return result;
            }
            if self.status.changed().await.is_err() {
                // Job ended without publishing a result: it was aborted
                return self
                    .settled()
                    .unwrap_or(Err(WaitError::Cancelled { hash: self.hash }));
            }
        }
    }

    fn settled(&self) -> Option<Result<Confirmation, WaitError>> {
        match &*self.status.borrow() {
            JobStatus::Polling => None,
            JobStatus::Done(result) => Some(result.clone()),
        }
    }
}

impl IntoFuture for PendingTransaction {
    type Output = Result<Confirmation, WaitError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.outcome())
    }
}

impl std::fmt::Debug for PendingTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("hash", &self.hash)
            .field("state", &self.state())
            .finish()
    }
}

async fn poll_until_final<S: TransactionStatusSource>(
    source: Arc<S>,
    jobs: Arc<JobTable>,
    id: u64,
    tx_hash: TxHash,
    poll_interval: Duration,
    limit: Option<Duration>,
    status: watch::Sender<JobStatus>,
) {
    let polling = async {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls = 0u64;

        loop {
            ticker.tick().await;
            polls += 1;

            match source.transaction_result(tx_hash).await {
                Ok(result) => match result.state() {
                    TransactionState::Pending => {
                        tracing::debug!(%tx_hash, polls, "Transaction pending");
                    }
                    TransactionState::Confirmed => {
                        return Ok(Confirmation { hash: tx_hash, polls });
                    }
                    TransactionState::Failed => {
                        return Err(WaitError::Failed { hash: tx_hash, polls });
                    }
                },
                Err(e) => {
                    tracing::warn!(%tx_hash, polls, error = %e, "Transaction status poll failed, retrying");
                }
            }
        }
    };

    let outcome = match limit {
        Some(limit) => match timeout(limit, polling).await {
            Ok(result) => result,
            Err(_) => Err(WaitError::TimedOut { hash: tx_hash, after: limit }),
        },
        None => polling.await,
    };

    let label = match &outcome {
        Ok(confirmation) => {
            tracing::info!(%tx_hash, polls = confirmation.polls, "Transaction confirmed");
            "confirmed"
        }
        Err(e) => {
            tracing::warn!(%tx_hash, error = %e, "Transaction wait ended without confirmation");
            match e {
                WaitError::Failed { .. } => "failed",
                WaitError::TimedOut { .. } => "timed_out",
                WaitError::Cancelled { .. } => "cancelled",
            }
        }
    };
    metrics::record_transaction_wait(label);

    status.send_replace(JobStatus::Done(outcome));
    jobs.remove_if(&tx_hash, |_, job| job.id == id);
}
