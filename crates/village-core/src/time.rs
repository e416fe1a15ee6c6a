//! Simulation time model.
//!
//! # Design
//!
//! The host advances the clock by an arbitrary number of simulated seconds
//! per tick, so elapsed time is an `f64` rather than a fixed tick multiple.
//! A separate `Tick` counter numbers the steps for observers and logging.
//!
//!   wall_time = start_unix_secs + elapsed_secs
//!
//! Simulated time is never wall-clock time: nothing in the engine reads the
//! system clock, which keeps runs reproducible and seekable.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// A monotonically increasing step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks elapsed simulated seconds and the tick counter.
#[derive(Clone, Debug, PartialEq)]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of simulated second 0.
    pub start_unix_secs: i64,
    /// The number of completed ticks.
    pub current_tick: Tick,
    /// Simulated seconds since the run started.
    pub elapsed_secs: f64,
}

impl SimClock {
    pub fn new(start_unix_secs: i64) -> Self {
        Self {
            start_unix_secs,
            current_tick: Tick::ZERO,
            elapsed_secs: 0.0,
        }
    }

    /// Advance by `secs` simulated seconds and one tick.  Returns the new
    /// elapsed time.
    ///
    /// Callers validate `secs` (finite, non-negative) before advancing.
    #[inline]
    pub fn advance(&mut self, secs: f64) -> f64 {
        self.current_tick = self.current_tick.next();
        self.elapsed_secs += secs;
        self.elapsed_secs
    }

    /// Reset to second 0, tick 0.
    pub fn reset(&mut self) {
        self.current_tick = Tick::ZERO;
        self.elapsed_secs = 0.0;
    }

    /// Unix timestamp for simulated second `secs`.
    #[inline]
    pub fn unix_secs_at(&self, secs: f64) -> i64 {
        self.start_unix_secs + secs.floor() as i64
    }

    /// Unix timestamp corresponding to the current elapsed time.
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.unix_secs_at(self.elapsed_secs)
    }

    /// Break elapsed time into (day, hour, minute) components.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_secs = self.elapsed_secs.max(0.0) as u64;
        let days = total_secs / 86_400;
        let hours = ((total_secs % 86_400) / 3_600) as u32;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        (days, hours, minutes)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "{} (day {} {:02}:{:02})", self.current_tick, d, h, m)
    }
}
