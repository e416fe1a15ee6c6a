//! CSV log store.
//!
//! Creates `event_log.csv` in the configured directory, one row per record:
//!
//! ```csv
//! agent,timestamp,type,phase,activity,x,y,zone,duration,content
//! Joy,1700000000,activity,started,meditate,2,2,Joy_home,1200,
//! ```
//!
//! Absent optional fields are written as empty cells.

use std::fs::File;
use std::future::Future;
use std::path::Path;

use csv::Writer;

use crate::store::LogStore;
use crate::{LogRecord, OutputResult};

pub struct CsvLogStore {
    writer: Writer<File>,
}

impl CsvLogStore {
    /// Create (truncating) `event_log.csv` in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut writer = Writer::from_path(dir.join("event_log.csv"))?;
        writer.write_record([
            "agent", "timestamp", "type", "phase", "activity", "x", "y", "zone", "duration", "content",
        ])?;
        Ok(Self { writer })
    }

    fn write(&mut self, agent: &str, r: &LogRecord) -> OutputResult<()> {
        self.writer.write_record(&[
            agent.to_owned(),
            r.timestamp.to_string(),
            r.kind.as_str().to_owned(),
            r.phase.map(|p| p.as_str().to_owned()).unwrap_or_default(),
            r.activity.clone(),
            r.location.x.to_string(),
            r.location.y.to_string(),
            r.zone.clone(),
            r.duration.map(|d| d.to_string()).unwrap_or_default(),
            r.content.clone().unwrap_or_default(),
        ])?;
        Ok(())
    }
}

impl LogStore for CsvLogStore {
    fn append(&mut self, agent: &str, record: &LogRecord) -> impl Future<Output = OutputResult<()>> + Send {
        std::future::ready(self.write(agent, record))
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
