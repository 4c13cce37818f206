use thiserror::Error;

use crate::geometry::Vec2;
use crate::coords::GridCoords;

/// Errors reported by [NavGrid](crate::NavGrid) construction and queries. An unreachable
/// destination is not an error: it shows up as a [Route](crate::Route) that did not reach it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavGridError {
    #[error("world size {width}x{height} does not cover a single cell")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("resolution must be finite and positive, got {0}")]
    InvalidResolution(f32),
    #[error("position {0} is not finite")]
    NonFinitePosition(Vec2),
    #[error("{position} maps to cell {coords}, which lies outside the grid")]
    OutOfBounds { position: Vec2, coords: GridCoords },
    #[error("cell {0} lies outside the grid")]
    CellOutOfBounds(GridCoords),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Misuse of an [IndexedPriorityQueue](crate::IndexedPriorityQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("an item with the same key is already queued")]
    DuplicateKey,
    #[error("no item with this key is queued")]
    MissingKey,
}
