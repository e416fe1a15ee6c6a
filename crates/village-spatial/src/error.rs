//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced while loading a tile map.
///
/// Lookups on a loaded map never error; out-of-range coordinates read as
/// `Blocked`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("tile map has no rows or no columns")]
    EmptyMap,

    #[error("tile map row {row} has {got} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, got: usize },

    #[error("zone legend key {0:?} is not a tile code")]
    BadZoneCode(String),

    #[error("tile map JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
