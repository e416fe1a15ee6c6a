//! `village-spatial`: tile map and spatial indexing.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`tile`]  | `TileKind` and the tile-code decoding table               |
//! | [`map`]   | `TileMap` (immutable grid), JSON loading, zone legend     |
//! | [`index`] | `OccupancyIndex`: R-tree of agent tiles for adjacency    |
//! | [`error`] | `SpatialError`, `SpatialResult<T>`                        |
//!
//! Lookups never fail: any coordinate outside the grid is `Blocked`.

pub mod error;
pub mod index;
pub mod map;
pub mod tile;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use index::OccupancyIndex;
pub use map::TileMap;
pub use tile::TileKind;
