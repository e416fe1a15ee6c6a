//! Seeded simulation-level RNG.
//!
//! The simulation itself is deterministic; randomness is only used for
//! retry jitter in the event log.  Seeding from `EngineConfig::seed` keeps
//! even that reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Global deterministic RNG.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Equal jitter: half of `delay_ms` fixed, the other half uniform.
    ///
    /// Result is always in `[delay_ms / 2, delay_ms]`.
    pub fn equal_jitter(&mut self, delay_ms: u64) -> u64 {
        let half = delay_ms / 2;
        half + self.0.gen_range(0..=delay_ms - half)
    }
}
