//! # nav_grid
//!
//! Grid-based pathfinding for 2D agents moving around polygonal obstacles. A [NavGrid] samples a
//! world area centered on the origin into a lattice of cells, obstacles implementing [Shape] are
//! rasterized onto its walkability mask, and paths between arbitrary world points are found with
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) over the 8-connected lattice. Edge
//! costs and the heuristic are both Euclidean distances in world units.
//!
//! The frontier of the search is an [IndexedPriorityQueue], a binary heap that also tracks the slot
//! of every item so queued nodes can be re-prioritized in place when a cheaper route to them is
//! found. Connected components of walkable cells are kept in a
//! [UnionFind](petgraph::unionfind::UnionFind) structure so reachability can be checked without
//! flood-filling.
//!
//! ```
//! use nav_grid::{NavGrid, Rect, Vec2};
//!
//! let mut grid = NavGrid::new(10.0, 10.0).unwrap();
//! grid.mark_obstacle(&Rect::new(-0.5, 0.5, 5.0, -2.5));
//! let route = grid.search(Vec2::new(-3.0, 2.0), Vec2::new(3.0, 2.0)).unwrap();
//! assert!(route.reached);
//! assert_eq!(route.waypoints.last(), Some(&Vec2::new(3.0, 2.0)));
//! ```
pub mod config;
pub mod coords;
pub mod error;
pub mod geometry;
pub mod nav_grid;
pub mod priority_queue;
pub mod search;

use itertools::Itertools;

pub use crate::config::NavGridConfig;
pub use crate::error::{NavGridError, QueueError};
pub use crate::geometry::{Bounds, Circle, Polygon, Rect, Shape, Vec2};
pub use crate::coords::GridCoords;
pub use crate::nav_grid::NavGrid;
pub use crate::priority_queue::IndexedPriorityQueue;
pub use crate::search::Route;

/// World units per cell used by [NavGrid::new].
pub const RESOLUTION: f32 = 1.0;

/// Sum of the distances between consecutive waypoints.
pub fn path_length(waypoints: &[Vec2]) -> f32 {
    waypoints
        .iter()
        .tuple_windows()
        .map(|(a, b)| a.distance(*b))
        .sum()
}
