//! SQLite log store (feature `sqlite`).
//!
//! Creates `event_log.db` in the configured directory with one table,
//! `event_log`, indexed by `(agent, timestamp)`.

use std::future::Future;
use std::path::Path;

use rusqlite::Connection;

use crate::store::LogStore;
use crate::{LogRecord, OutputResult};

pub struct SqliteLogStore {
    conn: Connection,
}

impl SqliteLogStore {
    /// Open (or create) `event_log.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("event_log.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS event_log (
                 id        INTEGER PRIMARY KEY AUTOINCREMENT,
                 agent     TEXT    NOT NULL,
                 timestamp INTEGER NOT NULL,
                 type      TEXT    NOT NULL,
                 phase     TEXT,
                 activity  TEXT    NOT NULL,
                 x         INTEGER NOT NULL,
                 y         INTEGER NOT NULL,
                 zone      TEXT    NOT NULL,
                 duration  INTEGER,
                 content   TEXT
             );
             CREATE INDEX IF NOT EXISTS event_log_agent ON event_log (agent, timestamp);",
        )?;

        Ok(Self { conn })
    }

    fn insert(&mut self, agent: &str, r: &LogRecord) -> OutputResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO event_log \
             (agent, timestamp, type, phase, activity, x, y, zone, duration, content) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        stmt.execute(rusqlite::params![
            agent,
            r.timestamp,
            r.kind.as_str(),
            r.phase.map(|p| p.as_str()),
            r.activity,
            r.location.x,
            r.location.y,
            r.zone,
            r.duration,
            r.content,
        ])?;
        Ok(())
    }
}

impl LogStore for SqliteLogStore {
    fn append(&mut self, agent: &str, record: &LogRecord) -> impl Future<Output = OutputResult<()>> + Send {
        std::future::ready(self.insert(agent, record))
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
