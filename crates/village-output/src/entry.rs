//! Log entries and their wire form.
//!
//! [`LogEntry`] is what the simulation produces; [`LogRecord`] is what a
//! store persists under the agent's name:
//!
//! ```json
//! { "timestamp": 1700000000, "activity": "Joy_home -> Cafe", "type": "movement",
//!   "location": { "x": 2, "y": 3 }, "zone": "Joy_home", "duration": 1320,
//!   "phase": "started" }
//! ```
//!
//! `duration` is in simulated seconds.  `phase` is absent on conversation
//! records, `content` on everything else.

use serde::{Deserialize, Serialize};

use village_core::{AgentId, TileCoord};
use village_schedule::ScheduleSegment;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Activity,
    Movement,
    Conversation,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Activity => "activity",
            LogKind::Movement => "movement",
            LogKind::Conversation => "conversation",
        }
    }
}

/// Which end of a segment an entry marks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogPhase {
    Started,
    Completed,
}

impl LogPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            LogPhase::Started => "started",
            LogPhase::Completed => "completed",
        }
    }
}

/// One immutable event in an agent's history.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub agent:         AgentId,
    pub agent_name:    String,
    /// Unix seconds.
    pub timestamp:     i64,
    pub kind:          LogKind,
    pub phase:         Option<LogPhase>,
    pub activity:      String,
    pub location:      TileCoord,
    pub zone:          String,
    pub duration_secs: Option<u32>,
    pub content:       Option<String>,
}

impl LogEntry {
    /// Boundary entry for `segment`.
    ///
    /// A `started` entry uses the segment's first tile and start zone, a
    /// `completed` entry its last tile and end zone.  `Hold` segments are
    /// never logged and yield `None`.
    pub fn boundary(
        agent:      AgentId,
        agent_name: &str,
        timestamp:  i64,
        phase:      LogPhase,
        segment:    &ScheduleSegment,
    ) -> Option<LogEntry> {
        let kind = match segment {
            ScheduleSegment::Activity(_) => LogKind::Activity,
            ScheduleSegment::Movement(_) => LogKind::Movement,
            ScheduleSegment::Hold(_) => return None,
        };
        let (location, zone) = match phase {
            LogPhase::Started => (segment.start_tile()?, segment.start_zone()),
            LogPhase::Completed => (segment.end_tile()?, segment.end_zone()),
        };
        Some(LogEntry {
            agent,
            agent_name:    agent_name.to_owned(),
            timestamp,
            kind,
            phase:         Some(phase),
            activity:      segment.label().into_owned(),
            location,
            zone:          zone.to_owned(),
            duration_secs: Some(segment.duration_secs()),
            content:       None,
        })
    }

    /// Conversation entry for one participant of a meeting.
    pub fn conversation(
        agent:      AgentId,
        agent_name: &str,
        timestamp:  i64,
        other_name: &str,
        location:   TileCoord,
        zone:       &str,
        content:    &str,
    ) -> LogEntry {
        LogEntry {
            agent,
            agent_name:    agent_name.to_owned(),
            timestamp,
            kind:          LogKind::Conversation,
            phase:         None,
            activity:      format!("conversation with {other_name}"),
            location,
            zone:          zone.to_owned(),
            duration_secs: None,
            content:       Some(content.to_owned()),
        }
    }
}

/// `{ x, y }` as written to stores.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub x: i32,
    pub y: i32,
}

/// Wire form of a [`LogEntry`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: i64,
    pub activity:  String,
    #[serde(rename = "type")]
    pub kind:      LogKind,
    pub location:  LocationRecord,
    pub zone:      String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration:  Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase:     Option<LogPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content:   Option<String>,
}

impl From<&LogEntry> for LogRecord {
    fn from(e: &LogEntry) -> Self {
        LogRecord {
            timestamp: e.timestamp,
            activity:  e.activity.clone(),
            kind:      e.kind,
            location:  LocationRecord { x: e.location.x, y: e.location.y },
            zone:      e.zone.clone(),
            duration:  e.duration_secs,
            phase:     e.phase,
            content:   e.content.clone(),
        }
    }
}
