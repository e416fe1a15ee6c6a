//! `village-output`: the append-only event log.
//!
//! Entries are produced by the simulation, queued to a single writer task,
//! and appended to a [`LogStore`] keyed by agent name.  Stores:
//!
//! | Feature   | Store             | Where records go                             |
//! |-----------|-------------------|----------------------------------------------|
//! | *(none)*  | `MemoryLogStore`  | shared in-process map (tests, UI embedding)  |
//! | *(none)*  | `DiscardLogStore` | nowhere                                      |
//! | *(none)*  | `CsvLogStore`     | `event_log.csv`                              |
//! | `sqlite`  | `SqliteLogStore`  | `event_log.db`, table `event_log`            |
//!
//! # Delivery
//!
//! Logging is best-effort.  A failed append is retried with bounded,
//! jittered exponential backoff (`RetryConfig`); after the last attempt the
//! entry is dropped and the `dropped` counter incremented.  The simulation
//! never waits on the store.
//!
//! Entries for one agent are appended in the order they were recorded.

pub mod csv;
pub mod entry;
pub mod error;
pub mod log;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use crate::csv::CsvLogStore;
pub use entry::{LocationRecord, LogEntry, LogKind, LogPhase, LogRecord};
pub use error::{OutputError, OutputResult};
pub use log::{EventLog, LogStats};
pub use store::{DiscardLogStore, LogStore, MemoryLogStore};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteLogStore;
