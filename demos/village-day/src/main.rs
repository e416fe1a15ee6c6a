//! village-day: three personas living through one simulated day.
//!
//! Loads an embedded tile map and schedule document, runs 24 h of simulated
//! time in one-minute ticks, prints meetings and conversations as they
//! happen, and writes every log entry to `output/village-day/event_log.csv`.
//!
//! ```text
//! cargo run -p village-day                   # built-in configuration
//! cargo run -p village-day -- config.json    # EngineConfig from a file
//! RUST_LOG=debug cargo run -p village-day    # session lifecycle as well
//! ```

use std::future::Future;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use village_core::{AgentId, EngineConfig};
use village_interaction::{
    DialogueOutcome, DialogueReply, DialogueRequest, DialogueResult, DialogueService, EndedSession,
    InteractionSession,
};
use village_output::CsvLogStore;
use village_schedule::load_schedules_str;
use village_sim::{SimBuilder, SimObserver, TickSummary};
use village_spatial::TileMap;

// ── Constants ─────────────────────────────────────────────────────────────────

const START_UNIX_SECS: i64 = 1_700_000_000; // fixed reference Tuesday 22:13 UTC
const DAY_TICKS:       u64 = 24 * 60;       // one tick = one simulated minute

// ── Map ───────────────────────────────────────────────────────────────────────

// 1 = wall, 0 = path, 8 = door, 2/3/4 = building interiors.
const MAP_JSON: &str = r#"{
  "tiles": [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 2, 2, 0, 0, 0, 0, 0, 0, 4, 4, 1],
    [1, 2, 2, 8, 0, 0, 0, 0, 8, 4, 4, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 3, 3, 3, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 3, 3, 3, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 8, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]
  ],
  "zones": { "2": "Joy_home", "3": "Cafe", "4": "Anger_home" }
}"#;

// ── Schedules ─────────────────────────────────────────────────────────────────

// Durations are in minutes.  Sadness carries one segment without a location
// (held in place) and one without a duration (dropped) to show the load report.
const SCHEDULES_JSON: &str = r#"[
  { "name": "Joy", "wake_up_time": "7am", "daily_schedule": [
    { "type": "activity", "activity": "stretch", "location": [3, 2], "duration": 60, "zone": "Joy_home" },
    { "type": "movement", "path": [[3, 2], [3, 3], [4, 3], [4, 4], [4, 5], [4, 6], [5, 6], [6, 6]],
      "start_zone": "Joy_home", "end_zone": "Cafe", "duration": 15 },
    { "type": "activity", "activity": "coffee", "location": [6, 6], "duration": 90, "zone": "Cafe" },
    { "type": "movement", "path": [[6, 6], [5, 6], [4, 6], [4, 5], [4, 4], [4, 3], [3, 3], [3, 2]],
      "start_zone": "Cafe", "end_zone": "Joy_home", "duration": 15 },
    { "type": "activity", "activity": "read", "location": [3, 2], "duration": 1260, "zone": "Joy_home" }
  ] },
  { "name": "Anger", "wake_up_time": "8am", "daily_schedule": [
    { "type": "activity", "activity": "grumble", "location": [8, 2], "duration": 75, "zone": "Anger_home" },
    { "type": "movement", "path": [[8, 2], [8, 3], [8, 4], [8, 5], [8, 6], [7, 6]],
      "start_zone": "Anger_home", "end_zone": "Cafe", "duration": 12 },
    { "type": "activity", "activity": "espresso", "location": [7, 6], "duration": 60, "zone": "Cafe" },
    { "type": "movement", "path": [[7, 6], [8, 6], [8, 5], [8, 4], [8, 3], [8, 2]],
      "start_zone": "Cafe", "end_zone": "Anger_home", "duration": 12 },
    { "type": "activity", "activity": "nap", "location": [8, 2], "duration": 1281, "zone": "Anger_home" }
  ] },
  { "name": "Sadness", "wake_up_time": "noon", "daily_schedule": [
    { "type": "activity", "activity": "mope", "location": [1, 3], "duration": 300, "zone": "Park" },
    { "type": "activity", "activity": "wander", "duration": 30, "zone": "Park" },
    { "type": "movement", "path": [[1, 3], [1, 4], [1, 5], [2, 5], [3, 5]],
      "start_zone": "Park", "end_zone": "Park", "duration": 20 },
    { "type": "activity", "activity": "sigh", "location": [3, 5], "zone": "Park" },
    { "type": "activity", "activity": "cry", "location": [3, 5], "duration": 1090, "zone": "Park" }
  ] }
]"#;

// ── Dialogue collaborator ─────────────────────────────────────────────────────

/// Answers every meeting from a small script instead of a chat backend.
struct CannedDialogue;

impl DialogueService for CannedDialogue {
    fn converse(&self, request: DialogueRequest) -> impl Future<Output = DialogueResult<DialogueReply>> + Send {
        let [a, b] = &request.participants;
        let line = match (a.as_str(), b.as_str()) {
            ("Joy", other) | (other, "Joy") => format!("Joy: Morning, {other}! Isn't it a lovely day?"),
            ("Anger", other) | (other, "Anger") => format!("Anger: What do you want, {other}?"),
            _ => format!("{a}: Hello, {b}."),
        };
        std::future::ready(Ok(DialogueReply::new(line)))
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints meetings and conversations and counts boundaries.
struct Narrator {
    names:       Vec<String>,
    meetings:    usize,
    transitions: usize,
}

impl Narrator {
    fn new(names: Vec<String>) -> Self {
        Self { names, meetings: 0, transitions: 0 }
    }

    fn name(&self, agent: AgentId) -> &str {
        self.names.get(agent.index()).map_or("?", String::as_str)
    }
}

/// `HH:MM` of simulated second `secs`.
fn hhmm(secs: f64) -> String {
    let minutes = (secs.max(0.0) / 60.0) as u64;
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

impl SimObserver for Narrator {
    fn on_session_started(&mut self, session: &InteractionSession) {
        self.meetings += 1;
        let (a, b) = session.participants;
        println!("[{}] {} meets {}", hhmm(session.started_at), self.name(a), self.name(b));
    }

    fn on_dialogue(&mut self, outcome: &DialogueOutcome) {
        match &outcome.result {
            Ok(reply) => println!("        \"{}\"", reply.content),
            Err(e) => println!("        (no conversation: {e})"),
        }
    }

    fn on_session_ended(&mut self, ended: &EndedSession) {
        let (a, b) = ended.session.participants;
        println!(
            "[{}] {} and {} part ways ({:?})",
            hhmm(ended.ended_at),
            self.name(a),
            self.name(b),
            ended.reason,
        );
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.transitions += summary.transitions;
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== village-day ===");

    // 1. Configuration.
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(Path::new(&path))?,
        None => EngineConfig {
            start_unix_secs: START_UNIX_SECS,
            tick_secs:       60.0,
            ..EngineConfig::default()
        },
    };

    // 2. Map and schedules.
    let map = TileMap::from_json_str(MAP_JSON)?;
    println!("Map: {} x {} tiles, {} entrances", map.width(), map.height(), map.entrances().len());

    let loaded = load_schedules_str(SCHEDULES_JSON, config.time_scale)?;
    println!(
        "Schedules: {} loaded, {} held segments, {} dropped segments, {} quarantined",
        loaded.set.len(),
        loaded.report.held_segments.len(),
        loaded.report.dropped_segments.len(),
        loaded.report.quarantined.len(),
    );
    let names: Vec<String> = loaded.set.iter().map(|(_, s)| s.name().to_owned()).collect();
    println!();

    // 3. Build and start.
    let out_dir = Path::new("output/village-day");
    std::fs::create_dir_all(out_dir)?;
    let mut sim = SimBuilder::new(config, CannedDialogue)
        .tile_map(map)
        .log_store(CsvLogStore::new(out_dir)?)
        .build()?;
    let report = sim.start(loaded.set)?;
    if report.off_map_tiles > 0 {
        println!("warning: {} schedule tiles lie outside the map", report.off_map_tiles);
    }

    // 4. Run one day, yielding between ticks so dialogue replies land.
    let mut narrator = Narrator::new(names);
    let step = sim.config.tick_secs;
    let t0 = Instant::now();
    for _ in 0..DAY_TICKS {
        sim.tick(step, &mut narrator)?;
        tokio::task::yield_now().await;
    }
    let elapsed = t0.elapsed();

    // 5. Where everyone ended up.
    println!();
    println!("{:<10} {:<12} {:<8} {:<8}", "Agent", "Position", "Moving", "Segment");
    println!("{}", "-".repeat(40));
    for state in sim.agents() {
        println!(
            "{:<10} {:<12} {:<8} {:<8}",
            state.name,
            format!("({:.1}, {:.1})", state.position.x, state.position.y),
            if state.is_moving { "yes" } else { "no" },
            state.current_segment_index,
        );
    }

    // 6. Stop and flush the log.
    sim.stop_with(&mut narrator);
    let stats = sim.shutdown().await;

    println!();
    println!("Simulated {} in {:.3} s", sim.clock, elapsed.as_secs_f64());
    println!("  segment boundaries : {}", narrator.transitions);
    println!("  meetings           : {}", narrator.meetings);
    println!(
        "  event_log.csv      : {} persisted, {} retried, {} dropped",
        stats.persisted, stats.retried, stats.dropped,
    );

    Ok(())
}
