//! JSON schedule loader.
//!
//! # Document format
//!
//! One array per run, one object per persona:
//!
//! ```json
//! [
//!   { "name": "Joy", "wake_up_time": "7am", "daily_schedule": [
//!       { "type": "activity", "activity": "stretch", "location": [2, 2],
//!         "duration": 20, "zone": "Joy_home" },
//!       { "type": "movement", "path": [[2, 2], [2, 3]],
//!         "start_zone": "Joy_home", "end_zone": "Joy_home", "duration": 1 }
//!   ] }
//! ]
//! ```
//!
//! `duration` is in schedule units; it is multiplied by `time_scale` and
//! rounded to whole simulated seconds.
//!
//! # Quarantine rules
//!
//! | Problem                                          | Outcome                    |
//! |--------------------------------------------------|----------------------------|
//! | `duration` missing, non-numeric, or < 1 s scaled | segment dropped            |
//! | missing `location` / short `path` / unknown type | segment becomes `Hold`     |
//! | no segments left, or all `Hold`                  | persona quarantined        |
//! | missing `name`, or name already loaded           | persona quarantined        |
//!
//! Only a document that is not a JSON array at all is an error; every other
//! problem is reported in the [`LoadReport`] and logged with `warn!`.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use village_core::TileCoord;

use crate::{
    ActivitySegment, HeldSegment, MovementSegment, Schedule, ScheduleError, ScheduleResult,
    ScheduleSegment, ScheduleSet,
};

// ── Raw records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PersonaRecord {
    name:           Option<String>,
    wake_up_time:   Option<String>,
    #[serde(default)]
    daily_schedule: Vec<Value>,
}

#[derive(Deserialize, Default)]
struct SegmentRecord {
    #[serde(rename = "type")]
    kind:       Option<String>,
    activity:   Option<String>,
    location:   Option<Value>,
    path:       Option<Value>,
    duration:   Option<Value>,
    zone:       Option<String>,
    start_zone: Option<String>,
    end_zone:   Option<String>,
}

// ── Report ────────────────────────────────────────────────────────────────────

/// One segment that was dropped or replaced by a `Hold`.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentIssue {
    pub persona: String,
    /// Index in the source `daily_schedule` array.
    pub index:   usize,
    pub reason:  String,
}

/// A persona excluded from the run.
#[derive(Debug)]
pub struct Quarantined {
    pub persona: String,
    pub error:   ScheduleError,
}

/// Everything the loader skipped or patched.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub dropped_segments: Vec<SegmentIssue>,
    pub held_segments:    Vec<SegmentIssue>,
    pub quarantined:      Vec<Quarantined>,
}

impl LoadReport {
    /// `true` if the document loaded without any repairs.
    pub fn is_clean(&self) -> bool {
        self.dropped_segments.is_empty() && self.held_segments.is_empty() && self.quarantined.is_empty()
    }
}

/// Loader output: the runnable set plus what was left out.
#[derive(Debug)]
pub struct LoadedSchedules {
    pub set:    ScheduleSet,
    pub report: LoadReport,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load schedules from a JSON file.
pub fn load_schedules_file(path: &Path, time_scale: f64) -> ScheduleResult<LoadedSchedules> {
    let file = std::fs::File::open(path)?;
    load_schedules_reader(file, time_scale)
}

/// Like [`load_schedules_file`] but accepts any `Read` source.
pub fn load_schedules_reader<R: Read>(reader: R, time_scale: f64) -> ScheduleResult<LoadedSchedules> {
    let personas: Vec<Value> = serde_json::from_reader(reader)?;
    Ok(build(personas, time_scale))
}

/// Parse a JSON schedule document held in memory.
pub fn load_schedules_str(json: &str, time_scale: f64) -> ScheduleResult<LoadedSchedules> {
    let personas: Vec<Value> = serde_json::from_str(json)?;
    Ok(build(personas, time_scale))
}

// ── Construction ──────────────────────────────────────────────────────────────

fn build(personas: Vec<Value>, time_scale: f64) -> LoadedSchedules {
    let mut set = ScheduleSet::new();
    let mut report = LoadReport::default();

    for (persona_idx, raw) in personas.into_iter().enumerate() {
        let record: PersonaRecord = match serde_json::from_value(raw) {
            Ok(r) => r,
            Err(e) => {
                quarantine(&mut report, format!("#{persona_idx}"), ScheduleError::Json(e));
                continue;
            }
        };
        let Some(name) = record.name.filter(|n| !n.trim().is_empty()) else {
            quarantine(&mut report, format!("#{persona_idx}"), ScheduleError::EmptySchedule {
                name: String::new(),
            });
            continue;
        };

        let segments = record
            .daily_schedule
            .into_iter()
            .enumerate()
            .filter_map(|(i, raw)| decode_segment(&name, i, raw, time_scale, &mut report))
            .collect::<Vec<_>>();

        if segments.iter().all(ScheduleSegment::is_hold) {
            quarantine(&mut report, name.clone(), ScheduleError::EmptySchedule { name });
            continue;
        }

        let schedule = match Schedule::new(name.clone(), segments) {
            Ok(s) => match record.wake_up_time {
                Some(w) => s.with_wake_up_time(w),
                None => s,
            },
            Err(e) => {
                quarantine(&mut report, name, e);
                continue;
            }
        };
        if let Err(e) = set.insert(schedule) {
            quarantine(&mut report, name, e);
        }
    }

    LoadedSchedules { set, report }
}

fn quarantine(report: &mut LoadReport, persona: String, error: ScheduleError) {
    warn!(persona = %persona, error = %error, "schedule quarantined");
    report.quarantined.push(Quarantined { persona, error });
}

/// Decode one raw segment.  `None` means the segment was dropped.
fn decode_segment(
    persona: &str,
    index: usize,
    raw: Value,
    time_scale: f64,
    report: &mut LoadReport,
) -> Option<ScheduleSegment> {
    let record: SegmentRecord = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            drop_segment(report, persona, index, format!("not a segment object: {e}"));
            return None;
        }
    };

    let duration_secs = match scaled_duration(record.duration.as_ref(), time_scale) {
        Ok(d) => d,
        Err(reason) => {
            drop_segment(report, persona, index, reason);
            return None;
        }
    };

    let decoded = match record.kind.as_deref() {
        Some("activity") => decode_coord(record.location.as_ref())
            .ok_or("activity has no valid location")
            .map(|location| {
                ScheduleSegment::Activity(ActivitySegment {
                    location,
                    zone: record.zone.clone().unwrap_or_default(),
                    duration_secs,
                    label: record.activity.clone().unwrap_or_default(),
                })
            }),
        Some("movement") => decode_path(record.path.as_ref())
            .filter(|p| p.len() >= 2)
            .ok_or("movement has no valid path of at least 2 points")
            .map(|path| {
                ScheduleSegment::Movement(MovementSegment {
                    path,
                    start_zone: record.start_zone.clone().or_else(|| record.zone.clone()).unwrap_or_default(),
                    end_zone: record.end_zone.clone().or_else(|| record.zone.clone()).unwrap_or_default(),
                    duration_secs,
                })
            }),
        _ => Err("unknown segment type"),
    };

    match decoded {
        Ok(segment) => Some(segment),
        Err(reason) => {
            warn!(persona, index, reason, "segment held in place");
            report.held_segments.push(SegmentIssue {
                persona: persona.to_owned(),
                index,
                reason: reason.to_owned(),
            });
            Some(ScheduleSegment::Hold(HeldSegment {
                duration_secs,
                label: record.activity.unwrap_or_else(|| record.kind.unwrap_or_default()),
                zone: record.zone.or(record.start_zone).unwrap_or_default(),
                reason: reason.to_owned(),
            }))
        }
    }
}

fn drop_segment(report: &mut LoadReport, persona: &str, index: usize, reason: String) {
    warn!(persona, index, reason = %reason, "segment dropped");
    report.dropped_segments.push(SegmentIssue { persona: persona.to_owned(), index, reason });
}

// ── Field decoding ────────────────────────────────────────────────────────────

/// Schedule units → whole simulated seconds.
fn scaled_duration(raw: Option<&Value>, time_scale: f64) -> Result<u32, String> {
    let units = raw
        .and_then(Value::as_f64)
        .ok_or_else(|| "duration is missing or not a number".to_owned())?;
    let secs = (units * time_scale).round();
    if !secs.is_finite() || secs < 1.0 || secs > u32::MAX as f64 {
        return Err(format!("duration {units} scales to {secs} s, outside 1..=u32::MAX"));
    }
    Ok(secs as u32)
}

/// `[x, y]` with integral components.
fn decode_coord(raw: Option<&Value>) -> Option<TileCoord> {
    let pair = raw?.as_array()?;
    let [x, y] = pair.as_slice() else {
        return None;
    };
    Some(TileCoord::new(integral(x)?, integral(y)?))
}

fn decode_path(raw: Option<&Value>) -> Option<Vec<TileCoord>> {
    raw?.as_array()?
        .iter()
        .map(|point| decode_coord(Some(point)))
        .collect()
}

fn integral(v: &Value) -> Option<i32> {
    let f = v.as_f64()?;
    if f.fract() != 0.0 || f < i32::MIN as f64 || f > i32::MAX as f64 {
        return None;
    }
    Some(f as i32)
}
