//! Tile kinds and the integer code table used by map documents.

use village_core::ZoneId;

/// Code for an open, walkable tile.
pub const CODE_WALKABLE: u16 = 0;
/// Code for a wall or other impassable tile.
pub const CODE_BLOCKED: u16 = 1;
/// Code for a building entrance (out-of-building transfer tile).
pub const CODE_ENTRANCE: u16 = 8;

/// What occupies one tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    Blocked,
    Walkable,
    Entrance,
    /// Interior of a building or area identified by a deployment-specific code.
    Zone(ZoneId),
}

impl TileKind {
    /// Decode a map code.  Every code maps to exactly one kind.
    pub fn from_code(code: u16) -> TileKind {
        match code {
            CODE_WALKABLE => TileKind::Walkable,
            CODE_BLOCKED => TileKind::Blocked,
            CODE_ENTRANCE => TileKind::Entrance,
            other => TileKind::Zone(ZoneId(other)),
        }
    }

    /// Encode back to the map code.
    pub fn code(self) -> u16 {
        match self {
            TileKind::Walkable => CODE_WALKABLE,
            TileKind::Blocked => CODE_BLOCKED,
            TileKind::Entrance => CODE_ENTRANCE,
            TileKind::Zone(z) => z.0,
        }
    }

    /// Agents may step on open ground and entrances; zone tiles are building
    /// interiors.
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, TileKind::Walkable | TileKind::Entrance)
    }
}
