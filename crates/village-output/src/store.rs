//! The `LogStore` trait and in-process stores.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::{LogRecord, OutputError, OutputResult};

/// Append-only persistence for log records, keyed by agent name.
///
/// Driven by a single writer task, so implementations never see concurrent
/// calls.  A returned error makes the writer retry the same record.
pub trait LogStore: Send + 'static {
    fn append(&mut self, agent: &str, record: &LogRecord) -> impl Future<Output = OutputResult<()>> + Send;

    /// Flush buffered output.  Called once when the log closes.
    fn flush(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

// ── MemoryLogStore ────────────────────────────────────────────────────────────

/// Shared in-memory store.  Clones share the same records, so a host can
/// keep a handle for reading while the writer task owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryLogStore {
    records: Arc<Mutex<HashMap<String, Vec<LogRecord>>>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for `agent` in append order.
    pub fn records(&self, agent: &str) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|map| map.get(agent).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Agent names with at least one record, sorted.
    pub fn agents(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .records
            .lock()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Total records across all agents.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .map(|map| map.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn push(&self, agent: &str, record: &LogRecord) -> OutputResult<()> {
        let mut map = self
            .records
            .lock()
            .map_err(|_| OutputError::Unavailable("memory store lock poisoned".into()))?;
        map.entry(agent.to_owned()).or_default().push(record.clone());
        Ok(())
    }
}

impl LogStore for MemoryLogStore {
    fn append(&mut self, agent: &str, record: &LogRecord) -> impl Future<Output = OutputResult<()>> + Send {
        std::future::ready(self.push(agent, record))
    }
}

// ── DiscardLogStore ───────────────────────────────────────────────────────────

/// Accepts and forgets every record.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiscardLogStore;

impl LogStore for DiscardLogStore {
    fn append(&mut self, _agent: &str, _record: &LogRecord) -> impl Future<Output = OutputResult<()>> + Send {
        std::future::ready(Ok(()))
    }
}
