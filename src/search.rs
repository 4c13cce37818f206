//! A* over the 8-connected cells of a [NavGrid]. Expanded nodes are kept in an insertion-ordered
//! map that doubles as the closed set and as the arena that parent links index into, so a path is
//! rebuilt by following indices back to the start.
use core::cmp::Ordering;
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use log::{info, warn};

use crate::error::NavGridError;
use crate::geometry::Vec2;
use crate::coords::GridCoords;
use crate::nav_grid::NavGrid;
use crate::priority_queue::IndexedPriorityQueue;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A discovered cell. Identity is `coords` alone: the frontier keys on it, so a cheaper
/// rediscovery of the same cell replaces the queued node instead of adding a second one.
#[derive(Clone, Copy, Debug)]
struct PathNode {
    coords: GridCoords,
    /// Cost from the start.
    g: f32,
    /// `g` plus the straight-line distance to the destination.
    f: f32,
    /// Index of the predecessor in the closed set.
    previous: Option<usize>,
}

impl PathNode {
    fn key(&self) -> GridCoords {
        self.coords
    }

    /// Lowest `f` first. On equal `f`, nodes further from the start go first.
    fn frontier_order(a: &PathNode, b: &PathNode) -> Ordering {
        match b.f.total_cmp(&a.f) {
            Ordering::Equal => a.g.total_cmp(&b.g),
            s => s,
        }
    }
}

/// Outcome of [NavGrid::search].
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Cell samples from the start cell onwards, followed by the exact destination if it was
    /// reached. An unreached route ends at the last cell the search settled on.
    pub waypoints: Vec<Vec2>,
    pub reached: bool,
    /// Cost of the waypoints, including the final step onto the exact destination.
    pub cost: f32,
    /// Number of nodes whose neighbours were generated.
    pub expanded: usize,
    /// The search stopped because [max_expansions](crate::NavGridConfig::max_expansions) was hit.
    pub budget_exhausted: bool,
}

impl Route {
    pub fn length(&self) -> f32 {
        crate::path_length(&self.waypoints)
    }
}

/// Walks parent links from `start` back to the root and returns the cells root-first.
fn reverse_path(closed: &FxIndexMap<GridCoords, Option<usize>>, start: usize) -> Vec<GridCoords> {
    let mut path: Vec<GridCoords> = std::iter::successors(Some(start), |&ix| {
        closed.get_index(ix).and_then(|(_, previous)| *previous)
    })
    .filter_map(|ix| closed.get_index(ix).map(|(coords, _)| *coords))
    .collect();
    path.reverse();
    path
}

impl NavGrid {
    /// Computes a path from `start` to `destination`, see [search](Self::search).
    pub fn path(&self, start: Vec2, destination: Vec2) -> Result<Vec<Vec2>, NavGridError> {
        self.search(start, destination).map(|route| route.waypoints)
    }

    /// Runs A* from the cell closest to `start` to the cell closest to `destination`. Moves go to
    /// the eight neighbouring cells and cost the distance between cell samples; the heuristic is
    /// the straight-line distance to the exact destination. Cells are never expanded twice.
    ///
    /// Fails if either point maps outside the grid. If the destination cannot be reached, the
    /// returned [Route] is not marked as reached and its waypoints stop short of the destination.
    pub fn search(&self, start: Vec2, destination: Vec2) -> Result<Route, NavGridError> {
        let s = self.locate(start)?;
        let e = self.locate(destination)?;
        info!("Computing path from {} to {} (cells {} to {})", start, destination, s, e);
        let max_expansions = self.config().max_expansions;

        let mut frontier =
            IndexedPriorityQueue::with_comparator(PathNode::key, PathNode::frontier_order);
        let mut closed: FxIndexMap<GridCoords, Option<usize>> = FxIndexMap::default();
        let mut node = PathNode {
            coords: s,
            g: 0.0,
            f: self.sample(s).distance(destination),
            previous: None,
        };
        let mut expanded = 0;
        let mut budget_exhausted = false;
        let terminal = loop {
            let (ix, _) = closed.insert_full(node.coords, node.previous);
            if node.coords == e {
                break ix;
            }
            if max_expansions.is_some_and(|max| expanded >= max) {
                budget_exhausted = true;
                break ix;
            }
            expanded += 1;
            let point = self.sample(node.coords);
            // The predecessor is always closed, so the closed check also keeps the search from
            // stepping straight back.
            for n in node.coords.moore_neighborhood() {
                if !self.is_walkable(n) || closed.contains_key(&n) {
                    continue;
                }
                let n_point = self.sample(n);
                let g = node.g + point.distance(n_point);
                let candidate = PathNode {
                    coords: n,
                    g,
                    f: g + n_point.distance(destination),
                    previous: Some(ix),
                };
                match frontier.get(&candidate).map(|current| current.g) {
                    Some(current_g) if current_g <= g => {}
                    Some(_) => {
                        frontier.update(candidate)?;
                    }
                    None => frontier.push(candidate)?,
                }
            }
            match frontier.pop() {
                Some(next) => node = next,
                None => break ix,
            }
        };

        let reached = node.coords == e;
        let mut waypoints: Vec<Vec2> = reverse_path(&closed, terminal)
            .into_iter()
            .map(|coords| self.sample(coords))
            .collect();
        let mut cost = node.g;
        if reached {
            cost += self.sample(e).distance(destination);
            waypoints.push(destination);
            info!(
                "Found path with {} waypoints and cost {:.3} after expanding {} nodes",
                waypoints.len(),
                cost,
                expanded
            );
        } else if budget_exhausted {
            warn!(
                "Gave up on reaching {} after expanding {} nodes",
                destination, expanded
            );
        } else {
            warn!("{} is not reachable from {}", destination, start);
        }
        Ok(Route {
            waypoints,
            reached,
            cost,
            expanded,
            budget_exhausted,
        })
    }
}
