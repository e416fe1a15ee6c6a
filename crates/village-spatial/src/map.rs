//! The immutable tile map.
//!
//! # Data layout
//!
//! Tiles are stored row-major in one `Vec<TileKind>`:
//!
//! ```text
//! tiles[y * width + x]
//! ```
//!
//! Dimensions are fixed at load time.  The map is read-only afterwards and is
//! shared between agents behind an `Arc` without locking.
//!
//! # JSON documents
//!
//! Either a bare matrix of codes, or an object with a zone legend:
//!
//! ```json
//! { "tiles": [[1,1,1],[1,2,1],[1,8,1]], "zones": { "2": "Joy_home" } }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use village_core::{TileCoord, ZoneId};

use crate::{SpatialError, SpatialResult, TileKind};

#[derive(Deserialize)]
#[serde(untagged)]
enum MapDocument {
    Matrix(Vec<Vec<u16>>),
    WithLegend {
        tiles: Vec<Vec<u16>>,
        // String keys: untagged enums cannot read integer map keys.
        #[serde(default)]
        zones: BTreeMap<String, String>,
    },
}

/// Static walkability and zone lookup table.
#[derive(Clone, Debug)]
pub struct TileMap {
    width:  usize,
    height: usize,
    tiles:  Vec<TileKind>,
    /// Optional human-readable names for zone codes.
    zone_names: BTreeMap<ZoneId, String>,
}

impl TileMap {
    /// Build a map from rows of tile codes.  All rows must have the same
    /// non-zero length.
    pub fn from_rows(rows: &[Vec<u16>]) -> SpatialResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(SpatialError::EmptyMap);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(SpatialError::RaggedRow { row: row_idx, expected: width, got: row.len() });
            }
            tiles.extend(row.iter().map(|&code| TileKind::from_code(code)));
        }

        Ok(Self { width, height, tiles, zone_names: BTreeMap::new() })
    }

    /// Parse a JSON map document (bare matrix or `{ tiles, zones }`).
    pub fn from_json_str(json: &str) -> SpatialResult<Self> {
        match serde_json::from_str::<MapDocument>(json)? {
            MapDocument::Matrix(rows) => Self::from_rows(&rows),
            MapDocument::WithLegend { tiles, zones } => {
                let names = zones
                    .into_iter()
                    .map(|(key, name)| match key.trim().parse::<u16>() {
                        Ok(code) => Ok((ZoneId(code), name)),
                        Err(_) => Err(SpatialError::BadZoneCode(key)),
                    })
                    .collect::<SpatialResult<Vec<_>>>()?;
                Ok(Self::from_rows(&tiles)?.with_zone_names(names))
            }
        }
    }

    /// Attach names to zone codes.  Later entries replace earlier ones.
    pub fn with_zone_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (ZoneId, S)>,
        S: Into<String>,
    {
        self.zone_names
            .extend(names.into_iter().map(|(zone, name)| (zone, name.into())));
        self
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `true` if `coord` lies on the grid.
    #[inline]
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.offset(coord.x as i64, coord.y as i64).is_some()
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// The tile at column `x`, row `y`.  `Blocked` outside the grid.
    #[inline]
    pub fn tile_at(&self, x: i64, y: i64) -> TileKind {
        self.offset(x, y).map_or(TileKind::Blocked, |i| self.tiles[i])
    }

    /// `false` outside the grid.
    #[inline]
    pub fn is_walkable(&self, x: i64, y: i64) -> bool {
        self.tile_at(x, y).is_walkable()
    }

    /// Zone of the tile at `(x, y)`.
    ///
    /// A zone tile answers its own code.  An entrance answers the zone of the
    /// first orthogonally adjacent zone tile, probing left, right, up, down.
    /// Everything else, including off-grid coordinates, is `None`.
    pub fn zone_at(&self, x: i64, y: i64) -> Option<ZoneId> {
        match self.tile_at(x, y) {
            TileKind::Zone(zone) => Some(zone),
            TileKind::Entrance => [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
                .into_iter()
                .find_map(|(nx, ny)| match self.tile_at(nx, ny) {
                    TileKind::Zone(zone) => Some(zone),
                    _ => None,
                }),
            TileKind::Blocked | TileKind::Walkable => None,
        }
    }

    #[inline]
    pub fn zone_at_coord(&self, coord: TileCoord) -> Option<ZoneId> {
        self.zone_at(coord.x as i64, coord.y as i64)
    }

    /// Registered name of `zone`, if the map carries a legend entry for it.
    pub fn zone_name(&self, zone: ZoneId) -> Option<&str> {
        self.zone_names.get(&zone).map(String::as_str)
    }

    /// Name of the zone under `coord`, if both the zone and its name exist.
    pub fn zone_name_at(&self, coord: TileCoord) -> Option<&str> {
        self.zone_at_coord(coord).and_then(|zone| self.zone_name(zone))
    }

    /// Every entrance tile in row-major order with the zone it leads into.
    pub fn entrances(&self) -> Vec<(TileCoord, Option<ZoneId>)> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == TileKind::Entrance)
            .map(|(i, _)| {
                let coord = TileCoord::new((i % self.width) as i32, (i / self.width) as i32);
                (coord, self.zone_at_coord(coord))
            })
            .collect()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    #[inline]
    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as u64, y as u64);
        if x >= self.width as u64 || y >= self.height as u64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}
