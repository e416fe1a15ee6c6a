//! Cyclic time projection.
//!
//! Maps an elapsed simulated time onto a segment of a cyclic schedule:
//!
//! ```text
//! total   = Σ durations
//! cycle   = floor(t / total)
//! t_norm  = t mod total
//! index   = first i with end[i] > t_norm
//! progress = (t_norm - start[i]) / duration[i]       ∈ [0, 1)
//! ```
//!
//! If floating-point error leaves no segment with `end > t_norm` (only
//! possible when `t_norm` lands on `total` itself), the last segment is
//! returned with `progress = 1.0`.

use crate::{ScheduleError, ScheduleResult};

/// Where a schedule stands at a given instant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    pub segment_index: usize,
    /// Fraction of the current segment already elapsed.
    pub progress: f64,
    /// Number of whole schedule cycles completed before this instant.
    pub cycle: u64,
    /// Offset into the current cycle, in simulated seconds.
    pub t_norm: f64,
}

impl Projection {
    /// `true` if `self` and `other` refer to the same segment of the same
    /// cycle.
    #[inline]
    pub fn same_slot(&self, other: &Projection) -> bool {
        self.segment_index == other.segment_index && self.cycle == other.cycle
    }
}

/// Project `t_secs` onto a list of segment durations.
///
/// Negative or non-finite times are treated as 0.  Fails with
/// [`ScheduleError::ZeroTotalDuration`] when the durations sum to zero.
pub fn project(durations: &[u32], t_secs: f64) -> ScheduleResult<Projection> {
    let total: u64 = durations.iter().map(|&d| d as u64).sum();
    if total == 0 {
        return Err(ScheduleError::ZeroTotalDuration);
    }
    Ok(project_with_total(durations, total, t_secs))
}

/// Like [`project`] but with a precomputed, non-zero `total`.
pub(crate) fn project_with_total(durations: &[u32], total: u64, t_secs: f64) -> Projection {
    let t = if t_secs.is_finite() { t_secs.max(0.0) } else { 0.0 };
    let total_f = total as f64;
    let cycle = (t / total_f).floor() as u64;
    let t_norm = t.rem_euclid(total_f);

    let mut accumulated = 0u64;
    for (i, &duration) in durations.iter().enumerate() {
        accumulated += duration as u64;
        if accumulated as f64 > t_norm {
            let start = (accumulated - duration as u64) as f64;
            return Projection {
                segment_index: i,
                progress: (t_norm - start) / duration as f64,
                cycle,
                t_norm,
            };
        }
    }

    Projection {
        segment_index: durations.len().saturating_sub(1),
        progress: 1.0,
        cycle,
        t_norm,
    }
}
