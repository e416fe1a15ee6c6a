//! R-tree over occupied tiles for adjacency queries.
//!
//! Rebuilt from scratch whenever it is needed; agents move every tick so an
//! incremental index would be churned anyway.  Only used once the population
//! is large enough that an all-pairs scan costs more than a bulk load.
//!
//! Points are stored as `f64`.  Every `i32` tile is exact in `f64`, and the
//! envelope arithmetic cannot overflow however far apart two tiles are.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use village_core::{AgentId, TileCoord};

/// R-tree entry: one agent standing on one tile.
#[derive(Clone, Debug)]
struct OccupantEntry {
    point: [f64; 2],
    agent: AgentId,
}

impl RTreeObject for OccupantEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for OccupantEntry {
    /// Squared Euclidean distance between tiles.  A value of exactly 1 is an
    /// orthogonal neighbour; diagonals give 2.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Snapshot of which agent occupies which tile.
pub struct OccupancyIndex {
    tree: RTree<OccupantEntry>,
}

impl OccupancyIndex {
    /// Bulk-load from `(agent, tile)` pairs.  Several agents may share a tile.
    pub fn build<I>(occupants: I) -> Self
    where
        I: IntoIterator<Item = (AgentId, TileCoord)>,
    {
        let entries = occupants
            .into_iter()
            .map(|(agent, tile)| OccupantEntry { point: point(tile), agent })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Agents on the four tiles orthogonally adjacent to `tile`, sorted by id.
    ///
    /// Agents on `tile` itself are not included.
    pub fn adjacent(&self, tile: TileCoord) -> Vec<AgentId> {
        let query = point(tile);
        let mut agents: Vec<AgentId> = self
            .tree
            .locate_within_distance(query, 1.0)
            .filter(|e| e.distance_2(&query) == 1.0)
            .map(|e| e.agent)
            .collect();
        agents.sort_unstable();
        agents
    }
}

#[inline]
fn point(tile: TileCoord) -> [f64; 2] {
    [f64::from(tile.x), f64::from(tile.y)]
}
