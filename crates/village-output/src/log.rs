//! The `EventLog` writer task.
//!
//! # Pipeline
//!
//! ```text
//! Sim ──record()──▶ unbounded mpsc ──▶ writer task ──append()──▶ LogStore
//!                                         │  on error: sleep(backoff), retry
//!                                         └─ after max_attempts: drop, count
//! ```
//!
//! `record` never blocks and never fails from the caller's point of view.
//! One writer task per log keeps appends for an agent in recording order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use village_core::{RetryConfig, SimRng};

use crate::{LogEntry, LogRecord, LogStore};

// ── Statistics ────────────────────────────────────────────────────────────────

/// Snapshot of the log's delivery counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogStats {
    /// Entries handed to `record`.
    pub recorded:  u64,
    /// Entries the store accepted.
    pub persisted: u64,
    /// Failed appends that were retried.
    pub retried:   u64,
    /// Entries given up on.
    pub dropped:   u64,
}

#[derive(Default)]
struct Counters {
    recorded:  AtomicU64,
    persisted: AtomicU64,
    retried:   AtomicU64,
    dropped:   AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> LogStats {
        LogStats {
            recorded:  self.recorded.load(Ordering::Relaxed),
            persisted: self.persisted.load(Ordering::Relaxed),
            retried:   self.retried.load(Ordering::Relaxed),
            dropped:   self.dropped.load(Ordering::Relaxed),
        }
    }
}

// ── EventLog ──────────────────────────────────────────────────────────────────

/// Handle to a running writer task.  The store type is erased.
///
/// Dropping the handle without `close` detaches the writer, which still
/// drains the queue while the runtime lives.
pub struct EventLog {
    tx:       Option<UnboundedSender<LogEntry>>,
    counters: Arc<Counters>,
    writer:   Option<JoinHandle<()>>,
}

impl EventLog {
    /// Spawn a writer task for `store` on `runtime`.
    ///
    /// `seed` drives the retry jitter so delays are reproducible.
    pub fn spawn<S: LogStore>(store: S, retry: RetryConfig, seed: u64, runtime: &Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        let writer = runtime.spawn(run_writer(store, rx, retry, SimRng::new(seed), Arc::clone(&counters)));
        Self { tx: Some(tx), counters, writer: Some(writer) }
    }

    /// Queue `entry` for persistence.
    ///
    /// After `close` has begun, entries are counted as dropped.
    pub fn record(&self, entry: LogEntry) {
        self.counters.recorded.fetch_add(1, Ordering::Relaxed);
        let sent = match &self.tx {
            Some(tx) => tx.send(entry).is_ok(),
            None => false,
        };
        if !sent {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Queue several entries in order.
    pub fn record_all<I: IntoIterator<Item = LogEntry>>(&self, entries: I) {
        for entry in entries {
            self.record(entry);
        }
    }

    pub fn stats(&self) -> LogStats {
        self.counters.snapshot()
    }

    /// Stop accepting entries, wait for the queue to drain, and flush the
    /// store.  Idempotent.
    pub async fn close(&mut self) -> LogStats {
        self.tx = None;
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.await {
                warn!(error = %e, "event log writer task failed");
            }
        }
        self.stats()
    }
}

// ── Writer task ───────────────────────────────────────────────────────────────

async fn run_writer<S: LogStore>(
    mut store: S,
    mut rx: UnboundedReceiver<LogEntry>,
    retry: RetryConfig,
    mut rng: SimRng,
    counters: Arc<Counters>,
) {
    while let Some(entry) = rx.recv().await {
        let record = LogRecord::from(&entry);
        let mut attempt = 0u32;
        loop {
            match store.append(&entry.agent_name, &record).await {
                Ok(()) => {
                    counters.persisted.fetch_add(1, Ordering::Relaxed);
                    break;
                }
                Err(e) if attempt + 1 < retry.max_attempts => {
                    let delay_ms = rng.equal_jitter(retry.backoff_ms(attempt));
                    counters.retried.fetch_add(1, Ordering::Relaxed);
                    debug!(agent = %entry.agent_name, attempt, delay_ms, error = %e, "log append failed, retrying");
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    attempt += 1;
                }
                Err(e) => {
                    counters.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(agent = %entry.agent_name, attempts = attempt + 1, error = %e, "log entry dropped");
                    break;
                }
            }
        }
    }

    if let Err(e) = store.flush() {
        warn!(error = %e, "event log flush failed");
    }
}
