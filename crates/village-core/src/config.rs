//! Engine configuration.
//!
//! Typically loaded from a JSON file by the host application and passed to
//! `village_sim::SimBuilder`.  Every field has a default, so `{}` is a valid
//! configuration document.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Unix timestamp of simulated second 0.  Only used to stamp log entries.
    pub start_unix_secs: i64,

    /// Simulated seconds per schedule duration unit.  Schedules are authored
    /// in minutes, so the default is 60.
    pub time_scale: f64,

    /// Simulated seconds advanced by each step of `Sim::run_ticks`.
    pub tick_secs: f64,

    /// Lifetime of an interaction session in simulated seconds.
    pub interaction_timeout_secs: f64,

    /// Agent count at which proximity detection switches from the pairwise
    /// scan to the R-tree index.
    pub proximity_index_threshold: usize,

    /// Seed for the backoff-jitter RNG.  The same seed always produces the
    /// same retry delays.
    pub seed: u64,

    /// Retry policy for event-log persistence.
    pub log_retry: RetryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_unix_secs:           0,
            time_scale:                60.0,
            tick_secs:                 1.0,
            interaction_timeout_secs:  500.0,
            proximity_index_threshold: 32,
            seed:                      42,
            log_retry:                 RetryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON configuration file.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(CoreError::Config(format!(
                "time_scale must be a positive number, got {}",
                self.time_scale
            )));
        }
        if !(self.tick_secs.is_finite() && self.tick_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "tick_secs must be a positive number, got {}",
                self.tick_secs
            )));
        }
        if !(self.interaction_timeout_secs.is_finite() && self.interaction_timeout_secs >= 0.0) {
            return Err(CoreError::Config(format!(
                "interaction_timeout_secs must be a non-negative number, got {}",
                self.interaction_timeout_secs
            )));
        }
        self.log_retry.validate()
    }
}

// ── RetryConfig ───────────────────────────────────────────────────────────────

/// Bounded exponential backoff for log persistence.
///
/// Attempt `n` (0-based) waits `min(base_delay_ms * 2^n, max_delay_ms)`
/// with equal jitter before retrying.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one.  Must be at least 1.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts:  5,
            base_delay_ms: 200,
            max_delay_ms:  10_000,
        }
    }
}

impl RetryConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_attempts == 0 {
            return Err(CoreError::Config("log_retry.max_attempts must be at least 1".into()));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(CoreError::Config(format!(
                "log_retry.base_delay_ms ({}) exceeds max_delay_ms ({})",
                self.base_delay_ms, self.max_delay_ms
            )));
        }
        Ok(())
    }

    /// Un-jittered delay before retry number `attempt` (0-based).
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        self.base_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms)
    }
}
