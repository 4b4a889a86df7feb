//! Request counter.
//!
//! # Responsibilities
//! - Hand every dispatched request a distinct counter value `n`
//! - Keep values in arrival order: the Nth request to reach the counter sees N
//!
//! # Dispatch Modes
//! ```text
//! Locked:      handler ──lock──▶ Mutex<u64> ──n──▶ handler
//! Sequential:  handler ──mpsc──▶ counter task (owns u64) ──oneshot n──▶ handler
//! ```
//!
//! Locked lets hyper run handlers concurrently and serializes only the
//! increment. Sequential funnels every increment through one task, so the
//! counter is never shared at all.

use std::sync::{Arc, Mutex, PoisonError};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Pending increments the sequential loop will queue before handlers wait.
const SEQUENTIAL_QUEUE_DEPTH: usize = 1024;

/// How counter increments are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Concurrent handlers, increment guarded by a mutex.
    #[default]
    Locked,
    /// Single task owns the counter and answers increments one at a time.
    Sequential,
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchMode::Locked => write!(f, "locked"),
            DispatchMode::Sequential => write!(f, "sequential"),
        }
    }
}

/// Errors from the counter.
#[derive(Debug, Error)]
pub enum CounterError {
    /// The sequential counter task has stopped.
    #[error("request counter loop is no longer running")]
    Stopped,
}

/// Per-instance request counter. Cloning shares the same count.
#[derive(Debug, Clone)]
pub enum RequestCounter {
    Locked(Arc<Mutex<u64>>),
    Sequential(mpsc::Sender<oneshot::Sender<u64>>),
}

impl RequestCounter {
    /// Create a counter starting at zero.
    ///
    /// # Panics
    /// `DispatchMode::Sequential` spawns its loop on the current tokio
    /// runtime and panics when called outside one.
    pub fn new(mode: DispatchMode) -> Self {
        match mode {
            DispatchMode::Locked => RequestCounter::Locked(Arc::new(Mutex::new(0))),
            DispatchMode::Sequential => {
                let (tx, rx) = mpsc::channel(SEQUENTIAL_QUEUE_DEPTH);
                tokio::spawn(run_sequential(rx));
                RequestCounter::Sequential(tx)
            }
        }
    }

    pub fn mode(&self) -> DispatchMode {
        match self {
            RequestCounter::Locked(_) => DispatchMode::Locked,
            RequestCounter::Sequential(_) => DispatchMode::Sequential,
        }
    }

    /// Increment by one and return the new value.
    pub async fn next(&self) -> Result<u64, CounterError> {
        match self {
            RequestCounter::Locked(count) => {
                // Poison carries no risk here: the guarded value is a plain integer.
                let n = {
                    let mut guard = count.lock().unwrap_or_else(PoisonError::into_inner);
                    *guard = guard.wrapping_add(1);
                    *guard
                };
                Ok(n)
            }
            RequestCounter::Sequential(tx) => {
                let (reply_tx, reply_rx) = oneshot::channel();
                tx.send(reply_tx).await.map_err(|_| CounterError::Stopped)?;
                reply_rx.await.map_err(|_| CounterError::Stopped)
            }
        }
    }
}

/// The sequential loop. Ends once every counter handle is dropped.
async fn run_sequential(mut rx: mpsc::Receiver<oneshot::Sender<u64>>) {
    let mut count: u64 = 0;
    tracing::debug!("Sequential counter loop started");

    while let Some(reply) = rx.recv().await {
        count = count.wrapping_add(1);
        // The requester may have timed out; the increment still counts.
        let _ = reply.send(count);
    }

    tracing::debug!(final_count = count, "Sequential counter loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    async fn collect_concurrent(counter: RequestCounter, total: u64) -> BTreeSet<u64> {
        let mut tasks = Vec::new();
        for _ in 0..total {
            let counter = counter.clone();
            tasks.push(tokio::spawn(async move { counter.next().await.unwrap() }));
        }

        let mut seen = BTreeSet::new();
        for task in tasks {
            assert!(seen.insert(task.await.unwrap()), "counter value handed out twice");
        }
        seen
    }

    #[tokio::test]
    async fn test_locked_counts_from_one() {
        let counter = RequestCounter::new(DispatchMode::Locked);
        assert_eq!(counter.next().await.unwrap(), 1);
        assert_eq!(counter.next().await.unwrap(), 2);
        assert_eq!(counter.next().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_sequential_counts_from_one() {
        let counter = RequestCounter::new(DispatchMode::Sequential);
        assert_eq!(counter.mode(), DispatchMode::Sequential);
        for expected in 1..=5 {
            assert_eq!(counter.next().await.unwrap(), expected);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_locked_concurrent_values_are_distinct() {
        let seen = collect_concurrent(RequestCounter::new(DispatchMode::Locked), 500).await;
        assert_eq!(seen, (1..=500).collect());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sequential_concurrent_values_are_distinct() {
        let seen = collect_concurrent(RequestCounter::new(DispatchMode::Sequential), 500).await;
        assert_eq!(seen, (1..=500).collect());
    }

    #[tokio::test]
    async fn test_clones_share_the_count() {
        let counter = RequestCounter::new(DispatchMode::Locked);
        let other = counter.clone();
        counter.next().await.unwrap();
        assert_eq!(other.next().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_instances_are_independent() {
        let first = RequestCounter::new(DispatchMode::Sequential);
        first.next().await.unwrap();
        first.next().await.unwrap();

        let restarted = RequestCounter::new(DispatchMode::Sequential);
        assert_eq!(restarted.next().await.unwrap(), 1);
    }
}
