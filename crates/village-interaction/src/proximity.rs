//! Adjacency detection.
//!
//! Two agents are adjacent when the Manhattan distance between their rounded
//! tiles is exactly 1.  Distance 0 (sharing a tile) means two paths overlap,
//! not that two people met, and never triggers.
//!
//! # Latch
//!
//! Every pair handed out by [`ProximityDetector::detect`] is latched.  A
//! latched pair is never reported again until the detector sees it at
//! distance > 1.  Sessions therefore fire once per approach no matter how
//! long the pair stays side by side.
//!
//! # Scan strategy
//!
//! Below `index_threshold` agents the detector compares every pair, O(n²).
//! At or above it, it bulk-loads an R-tree of occupied tiles and queries the
//! four neighbours of each agent.  Both strategies yield the same pairs.

use village_core::{AgentId, TileCoord};
use village_mobility::AgentState;
use village_spatial::OccupancyIndex;

#[cfg(feature = "fx-hash")]
type PairSet = rustc_hash::FxHashSet<(AgentId, AgentId)>;
#[cfg(not(feature = "fx-hash"))]
type PairSet = std::collections::HashSet<(AgentId, AgentId)>;

/// Canonical, order-independent key for a pair: smaller id first.
#[inline]
pub fn pair_key(a: AgentId, b: AgentId) -> (AgentId, AgentId) {
    if a <= b { (a, b) } else { (b, a) }
}

pub struct ProximityDetector {
    latched:         PairSet,
    index_threshold: usize,
}

impl ProximityDetector {
    pub fn new(index_threshold: usize) -> Self {
        Self { latched: PairSet::default(), index_threshold }
    }

    /// Release latches of separated pairs, then return the new meetings.
    ///
    /// `agents` must be indexed by `AgentId` (as `AgentStore::states` is).
    /// A pair qualifies when it is adjacent, neither agent is interacting,
    /// and the pair is not latched.  Pairs are considered in ascending key
    /// order and each agent is claimed by at most one meeting per call.
    /// Returned pairs are latched.
    pub fn detect(&mut self, agents: &[AgentState]) -> Vec<(AgentId, AgentId)> {
        self.latched.retain(|&(a, b)| {
            match (agents.get(a.index()), agents.get(b.index())) {
                (Some(sa), Some(sb)) => sa.tile().manhattan(sb.tile()) <= 1,
                _ => false,
            }
        });

        let mut candidates = self.adjacent_pairs(agents);
        candidates.sort_unstable();

        let mut claimed = vec![false; agents.len()];
        let mut meetings = Vec::new();
        for (a, b) in candidates {
            let (ia, ib) = (a.index(), b.index());
            let (Some(sa), Some(sb)) = (agents.get(ia), agents.get(ib)) else {
                continue;
            };
            if claimed[ia] || claimed[ib] || sa.is_interacting || sb.is_interacting {
                continue;
            }
            if !self.latched.insert((a, b)) {
                continue;
            }
            claimed[ia] = true;
            claimed[ib] = true;
            meetings.push((a, b));
        }
        meetings
    }

    /// Every adjacent pair, canonical keys, unsorted.
    fn adjacent_pairs(&self, agents: &[AgentState]) -> Vec<(AgentId, AgentId)> {
        let tiles: Vec<TileCoord> = agents.iter().map(AgentState::tile).collect();

        if agents.len() < self.index_threshold {
            let mut pairs = Vec::new();
            for i in 0..tiles.len() {
                for j in (i + 1)..tiles.len() {
                    if tiles[i].manhattan(tiles[j]) == 1 {
                        pairs.push(pair_key(agents[i].id, agents[j].id));
                    }
                }
            }
            return pairs;
        }

        let index = OccupancyIndex::build(agents.iter().map(|s| s.id).zip(tiles.iter().copied()));
        agents
            .iter()
            .zip(&tiles)
            .flat_map(|(s, &tile)| {
                index
                    .adjacent(tile)
                    .into_iter()
                    .filter(move |&other| s.id < other)
                    .map(move |other| (s.id, other))
            })
            .collect()
    }

    #[inline]
    pub fn is_latched(&self, a: AgentId, b: AgentId) -> bool {
        self.latched.contains(&pair_key(a, b))
    }

    #[cfg(test)]
    pub(crate) fn latched_len(&self) -> usize {
        self.latched.len()
    }
}
