use core::fmt;
use grid_util::grid::{BoolGrid, Grid, SimpleGrid};
use itertools::Itertools;
use log::{debug, info};
use petgraph::unionfind::UnionFind;

use crate::config::NavGridConfig;
use crate::coords::GridCoords;
use crate::error::NavGridError;
use crate::geometry::{Shape, Vec2};

/// [NavGrid] samples a rectangular world area centered on the origin at a fixed resolution and
/// keeps a walkability mask over the samples in a [BoolGrid] ([true] meaning traversable).
/// Obstacles are rasterized onto the mask with [mark_obstacle](Self::mark_obstacle) and paths are
/// searched with [path](Self::path)/[search](Self::search). Connected components of walkable cells
/// are tracked in a [UnionFind] structure so reachability can be answered without searching.
///
/// The shape of the grid never changes after construction; only walkability does.
#[derive(Clone, Debug)]
pub struct NavGrid {
    width: f32,
    height: f32,
    config: NavGridConfig,
    points: SimpleGrid<Vec2>,
    walkable: BoolGrid,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl NavGrid {
    /// A fully walkable grid covering `width` x `height` world units with the default
    /// configuration.
    pub fn new(width: f32, height: f32) -> Result<NavGrid, NavGridError> {
        NavGrid::with_config(width, height, NavGridConfig::default())
    }

    /// Builds the sample grid. Cell counts are truncated, so cells never partially cover the
    /// world boundary. Row 0 samples `y = height / 2` and column 0 samples `x = -width / 2`.
    pub fn with_config(
        width: f32,
        height: f32,
        config: NavGridConfig,
    ) -> Result<NavGrid, NavGridError> {
        let resolution = config.resolution;
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(NavGridError::InvalidResolution(resolution));
        }
        if !width.is_finite() || !height.is_finite() {
            return Err(NavGridError::InvalidDimensions { width, height });
        }
        // Saturating casts send negative sizes to zero
        let columns = (width / resolution) as usize;
        let rows = (height / resolution) as usize;
        if columns == 0 || rows == 0 {
            return Err(NavGridError::InvalidDimensions { width, height });
        }
        let left = -width / 2.0;
        let top = height / 2.0;
        let mut points: SimpleGrid<Vec2> = SimpleGrid::new(columns, rows, Vec2::ZERO);
        for (y, x) in (0..rows).cartesian_product(0..columns) {
            points.set(
                x,
                y,
                Vec2::new(left + x as f32 * resolution, top - y as f32 * resolution),
            );
        }
        let mut grid = NavGrid {
            width,
            height,
            config,
            points,
            walkable: BoolGrid::new(columns, rows, true),
            components: UnionFind::new(rows * columns),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    pub fn width(&self) -> f32 {
        self.width
    }
    pub fn height(&self) -> f32 {
        self.height
    }
    pub fn rows(&self) -> usize {
        self.walkable.height()
    }
    pub fn columns(&self) -> usize {
        self.walkable.width()
    }
    pub fn resolution(&self) -> f32 {
        self.config.resolution
    }
    pub fn config(&self) -> &NavGridConfig {
        &self.config
    }
    /// World-space sample of every cell, indexed by column (`x`) and row (`y`).
    pub fn points(&self) -> &SimpleGrid<Vec2> {
        &self.points
    }
    /// Walkability of every cell, indexed by column (`x`) and row (`y`).
    pub fn walkable(&self) -> &BoolGrid {
        &self.walkable
    }
    /// Coordinates of every cell, row by row from the top.
    pub fn cells(&self) -> impl Iterator<Item = GridCoords> {
        (0..self.rows() as i32)
            .cartesian_product(0..self.columns() as i32)
            .map(|(i, j)| GridCoords::new(i, j))
    }

    pub fn in_bounds(&self, coords: GridCoords) -> bool {
        coords.i >= 0
            && coords.j >= 0
            && self
                .walkable
                .index_in_bounds(coords.j as usize, coords.i as usize)
    }
    /// World-space sample of a cell; the inverse of [closest_cell](Self::closest_cell) on sample
    /// locations.
    pub fn point(&self, coords: GridCoords) -> Option<Vec2> {
        self.in_bounds(coords)
            .then(|| self.points.get_point(coords.into()))
    }
    /// Sample of a cell already known to be in bounds.
    pub(crate) fn sample(&self, coords: GridCoords) -> Vec2 {
        self.points.get_point(coords.into())
    }
    /// Cells outside the grid are never walkable.
    pub fn is_walkable(&self, coords: GridCoords) -> bool {
        self.in_bounds(coords) && self.walkable.get_point(coords.into())
    }
    fn cell_ix(&self, coords: GridCoords) -> Option<usize> {
        self.in_bounds(coords)
            .then(|| self.walkable.get_ix(coords.j as usize, coords.i as usize))
    }

    /// Maps a world position to the nearest cell. The column is
    /// `round((x + width / 2) / resolution)` and the row is `round((height / 2 - y) / resolution)`,
    /// rounding half away from zero, so every sample maps back to its own cell. The result is not
    /// clamped and may lie outside the grid.
    pub fn closest_cell(&self, position: Vec2) -> GridCoords {
        let resolution = self.config.resolution;
        let j = ((position.x + self.width / 2.0) / resolution).round() as i32;
        let i = ((self.height / 2.0 - position.y) / resolution).round() as i32;
        GridCoords::new(i, j)
    }

    /// Like [closest_cell](Self::closest_cell), but fails if the position is not finite or the
    /// cell lies outside the grid.
    pub fn locate(&self, position: Vec2) -> Result<GridCoords, NavGridError> {
        if !position.is_finite() {
            return Err(NavGridError::NonFinitePosition(position));
        }
        let coords = self.closest_cell(position);
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(NavGridError::OutOfBounds { position, coords })
        }
    }

    /// Sets the walkability of a single cell. Joins newly connected components and flags the
    /// components as dirty if they are (potentially) broken apart into multiple.
    pub fn set_walkable(&mut self, coords: GridCoords, walkable: bool) -> Result<(), NavGridError> {
        if !self.in_bounds(coords) {
            return Err(NavGridError::CellOutOfBounds(coords));
        }
        if self.walkable.get_point(coords.into()) == walkable {
            return Ok(());
        }
        self.walkable.set_point(coords.into(), walkable);
        if walkable {
            self.join_neighbours(coords);
        } else {
            self.components_dirty = true;
        }
        Ok(())
    }

    /// Marks every cell whose sample lies inside `shape` as unwalkable. Only cells within the
    /// shape's bounding box are tested, and cells of the box outside the grid are skipped.
    /// Returns the number of cells that became unwalkable.
    pub fn mark_obstacle<S: Shape + ?Sized>(&mut self, shape: &S) -> usize {
        let bounds = shape.bounding_box();
        let left_top = self.closest_cell(bounds.left_top());
        let right_bottom = self.closest_cell(bounds.right_bottom());
        let last_row = self.rows() as i32 - 1;
        let last_column = self.columns() as i32 - 1;
        let mut marked = 0;
        for i in left_top.i.max(0)..=right_bottom.i.min(last_row) {
            for j in left_top.j.max(0)..=right_bottom.j.min(last_column) {
                let coords = GridCoords::new(i, j);
                if self.is_walkable(coords) && shape.contains(&self.sample(coords)) {
                    self.walkable.set_point(coords.into(), false);
                    marked += 1;
                }
            }
        }
        if marked > 0 {
            self.components_dirty = true;
        }
        debug!(
            "Obstacle {:?} covers cells {} to {}, {} newly blocked",
            bounds, left_top, right_bottom, marked
        );
        marked
    }

    /// Marks a batch of obstacles, returning the total number of newly blocked cells.
    pub fn mark_obstacles<I>(&mut self, shapes: I) -> usize
    where
        I: IntoIterator,
        I::Item: Shape,
    {
        shapes
            .into_iter()
            .map(|shape| self.mark_obstacle(&shape))
            .sum()
    }

    /// Makes every cell walkable again.
    pub fn clear(&mut self) {
        self.walkable = BoolGrid::new(self.columns(), self.rows(), true);
        self.components_dirty = true;
    }

    /// Retrieves the component id of a cell, or [None] outside the grid. Stale while
    /// [components_dirty](Self::components_dirty) holds.
    pub fn get_component(&self, coords: GridCoords) -> Option<usize> {
        self.cell_ix(coords).map(|ix| self.components.find(ix))
    }

    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up walkable 8-neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        self.components = UnionFind::new(self.rows() * self.columns());
        self.components_dirty = false;
        for coords in self.cells() {
            if !self.is_walkable(coords) {
                continue;
            }
            let GridCoords { i, j } = coords;
            // Only forward neighbours; the others link back to this cell themselves
            for n in [
                GridCoords::new(i, j + 1),
                GridCoords::new(i + 1, j - 1),
                GridCoords::new(i + 1, j),
                GridCoords::new(i + 1, j + 1),
            ] {
                self.union_if_walkable(coords, n);
            }
        }
    }

    /// Checks whether a search from `start` can reach `destination`, regenerating dirty
    /// components first. A search leaves its start cell even if that cell is blocked, so a
    /// blocked start is connected through its walkable neighbours.
    pub fn reachable(&mut self, start: Vec2, destination: Vec2) -> Result<bool, NavGridError> {
        let s = self.locate(start)?;
        let e = self.locate(destination)?;
        self.update();
        if s == e {
            return Ok(true);
        }
        if !self.is_walkable(e) {
            return Ok(false);
        }
        let same = |a: GridCoords| self.get_component(a) == self.get_component(e);
        if self.is_walkable(s) {
            Ok(same(s))
        } else {
            Ok(s.moore_neighborhood()
                .any(|n| self.is_walkable(n) && same(n)))
        }
    }

    fn join_neighbours(&mut self, coords: GridCoords) {
        for n in coords.moore_neighborhood() {
            self.union_if_walkable(coords, n);
        }
    }

    fn union_if_walkable(&mut self, a: GridCoords, b: GridCoords) {
        if !self.is_walkable(a) || !self.is_walkable(b) {
            return;
        }
        if let (Some(a_ix), Some(b_ix)) = (self.cell_ix(a), self.cell_ix(b)) {
            self.components.union(a_ix, b_ix);
        }
    }
}

/// One line per row, `.` for walkable and `#` for blocked cells.
impl fmt::Display for NavGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.rows() {
            let row = (0..self.columns())
                .map(|x| if self.walkable.get(x, y) { '.' } else { '#' })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Rect};

    #[test]
    fn construction_samples_top_left_first() {
        let grid = NavGrid::new(10.0, 10.0).unwrap();
        assert_eq!(grid.rows(), 10);
        assert_eq!(grid.columns(), 10);
        assert_eq!(grid.point(GridCoords::new(0, 0)), Some(Vec2::new(-5.0, 5.0)));
        assert_eq!(grid.point(GridCoords::new(9, 9)), Some(Vec2::new(4.0, -4.0)));
        assert_eq!(grid.point(GridCoords::new(0, 1)), Some(Vec2::new(-4.0, 5.0)));
        assert_eq!(grid.point(GridCoords::new(1, 0)), Some(Vec2::new(-5.0, 4.0)));
        assert!(grid.cells().all(|c| grid.is_walkable(c)));
        assert_eq!(grid.cells().count(), 100);
    }

    #[test]
    fn fractional_sizes_are_truncated() {
        let grid = NavGrid::new(10.7, 5.2).unwrap();
        assert_eq!(grid.columns(), 10);
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.points().height(), grid.walkable().height());
        assert_eq!(grid.points().width(), grid.walkable().width());
    }

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(matches!(
            NavGrid::new(0.5, 10.0),
            Err(NavGridError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            NavGrid::new(-4.0, 10.0),
            Err(NavGridError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            NavGrid::new(f32::NAN, 10.0),
            Err(NavGridError::InvalidDimensions { .. })
        ));
        let config = NavGridConfig::default().with_resolution(0.0);
        assert_eq!(
            NavGrid::with_config(10.0, 10.0, config).unwrap_err(),
            NavGridError::InvalidResolution(0.0)
        );
    }

    #[test]
    fn closest_cell_inverts_sampling() {
        for (width, height, resolution) in [
            (10.0, 10.0, 1.0),
            (10.0, 10.0, 0.5),
            (5.0, 5.0, 1.0),
            (7.0, 3.0, 1.0),
            (4.0, 1.0, 1.0),
            (5.2, 3.7, 1.0),
            (3.0, 2.5, 0.5),
        ] {
            let config = NavGridConfig::default().with_resolution(resolution);
            let grid = NavGrid::with_config(width, height, config).unwrap();
            for coords in grid.cells() {
                let point = grid.point(coords).unwrap();
                assert_eq!(grid.closest_cell(point), coords, "{width}x{height} at {point}");
                assert_eq!(grid.locate(point), Ok(coords));
            }
        }
    }

    /// With an odd number of rows the top row samples `y = height / 2`, half a cell off the
    /// origin row spacing.
    #[test]
    fn odd_sized_grid_searches_from_its_corners() {
        let grid = NavGrid::new(5.0, 5.0).unwrap();
        let corner = grid.point(GridCoords::new(0, 0)).unwrap();
        assert_eq!(corner, Vec2::new(-2.5, 2.5));
        assert_eq!(grid.closest_cell(Vec2::new(0.0, 0.0)), GridCoords::new(3, 3));
        let route = grid.search(corner, Vec2::new(0.0, 0.0)).unwrap();
        assert!(route.reached);
        assert_eq!(route.waypoints.first(), Some(&corner));
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let grid = NavGrid::new(10.0, 10.0).unwrap();
        for position in [
            Vec2::new(f32::NAN, f32::NAN),
            Vec2::new(0.0, f32::NAN),
            Vec2::new(f32::INFINITY, 0.0),
        ] {
            assert!(matches!(
                grid.locate(position),
                Err(NavGridError::NonFinitePosition(_))
            ));
        }
    }

    #[test]
    fn closest_cell_rounds_half_away_from_zero() {
        let grid = NavGrid::new(10.0, 10.0).unwrap();
        assert_eq!(grid.closest_cell(Vec2::new(0.5, 0.5)), GridCoords::new(5, 6));
        assert_eq!(grid.closest_cell(Vec2::new(-0.5, -0.5)), GridCoords::new(6, 5));
        assert_eq!(grid.closest_cell(Vec2::new(0.4, -0.4)), GridCoords::new(5, 5));
    }

    #[test]
    fn closest_cell_is_unclamped() {
        let grid = NavGrid::new(10.0, 10.0).unwrap();
        let far = grid.closest_cell(Vec2::new(100.0, -100.0));
        assert_eq!(far, GridCoords::new(105, 105));
        assert!(!grid.in_bounds(far));
        assert!(matches!(
            grid.locate(Vec2::new(100.0, -100.0)),
            Err(NavGridError::OutOfBounds { .. })
        ));
        // Extreme values saturate instead of overflowing
        let extreme = grid.closest_cell(Vec2::new(0.0, f32::MIN));
        assert!(!grid.in_bounds(extreme));
    }

    #[test]
    fn marks_rectangle_interior() {
        let mut grid = NavGrid::new(10.0, 10.0).unwrap();
        let rect = Rect::new(-2.5, 1.5, 2.5, -1.5);
        assert_eq!(grid.mark_obstacle(&rect), 16);
        for coords in grid.cells() {
            let point = grid.point(coords).unwrap();
            let inside = point.x > -2.5 && point.x < 1.5 && point.y > -1.5 && point.y < 2.5;
            assert_eq!(grid.is_walkable(coords), !inside, "cell {coords} at {point}");
        }
        // Marking again changes nothing
        assert_eq!(grid.mark_obstacle(&rect), 0);
        grid.clear();
        assert!(grid.cells().all(|c| grid.is_walkable(c)));
    }

    #[test]
    fn obstacles_beyond_the_edge_are_clipped() {
        let mut grid = NavGrid::new(10.0, 10.0).unwrap();
        assert_eq!(grid.mark_obstacle(&Rect::new(3.5, 20.0, 20.0, 3.5)), 2);
        assert!(!grid.is_walkable(GridCoords::new(0, 9)));
        assert!(!grid.is_walkable(GridCoords::new(1, 9)));
        assert_eq!(grid.mark_obstacle(&Rect::new(50.0, 60.0, 60.0, 50.0)), 0);
        assert_eq!(grid.mark_obstacle(&Rect::new(-60.0, 60.0, 60.0, -60.0)), 98);
    }

    #[test]
    fn circle_uses_precise_containment() {
        let mut grid = NavGrid::new(10.0, 10.0).unwrap();
        assert_eq!(grid.mark_obstacle(&Circle::new(Vec2::new(0.0, 0.0), 1.0)), 5);
        // Corner of the bounding box stays free
        assert!(grid.is_walkable(grid.closest_cell(Vec2::new(1.0, 1.0))));
        assert!(!grid.is_walkable(grid.closest_cell(Vec2::new(0.0, 1.0))));
    }

    #[test]
    fn batch_marking_sums_cells() {
        let mut grid = NavGrid::new(10.0, 10.0).unwrap();
        let marked = grid.mark_obstacles(vec![
            Rect::new(-5.0, -5.0, 5.0, -5.0),
            Rect::new(4.0, 4.0, 5.0, -5.0),
        ]);
        assert_eq!(marked, 20);
    }

    #[test]
    fn set_walkable_checks_bounds() {
        let mut grid = NavGrid::new(4.0, 4.0).unwrap();
        let outside = GridCoords::new(4, 0);
        assert_eq!(
            grid.set_walkable(outside, false),
            Err(NavGridError::CellOutOfBounds(outside))
        );
        grid.set_walkable(GridCoords::new(1, 1), false).unwrap();
        assert!(!grid.is_walkable(GridCoords::new(1, 1)));
        assert!(grid.components_dirty());
    }

    /// A full-height wall splits the grid into two components until it is cleared.
    #[test]
    fn components_follow_walls() {
        let mut grid = NavGrid::new(10.0, 10.0).unwrap();
        let left = Vec2::new(-3.0, 0.0);
        let right = Vec2::new(3.0, 0.0);
        assert!(grid.reachable(left, right).unwrap());
        grid.mark_obstacle(&Rect::new(-0.5, 0.5, 6.0, -6.0));
        assert!(grid.components_dirty());
        assert!(!grid.reachable(left, right).unwrap());
        assert!(!grid.components_dirty());
        // Reopening one cell joins the components again without a full regeneration
        let gap = grid.closest_cell(Vec2::new(0.0, 2.0));
        grid.set_walkable(gap, true).unwrap();
        assert!(grid.reachable(left, right).unwrap());
        grid.clear();
        assert!(grid.reachable(left, right).unwrap());
    }

    #[test]
    fn blocked_start_reaches_through_neighbours() {
        let mut grid = NavGrid::new(6.0, 6.0).unwrap();
        let start = Vec2::new(0.0, 0.0);
        grid.set_walkable(grid.closest_cell(start), false).unwrap();
        assert!(grid.reachable(start, Vec2::new(2.0, 2.0)).unwrap());
        assert!(grid.reachable(start, start).unwrap());
        let blocked_goal = Vec2::new(2.0, 2.0);
        grid.set_walkable(grid.closest_cell(blocked_goal), false).unwrap();
        assert!(!grid.reachable(start, blocked_goal).unwrap());
    }
}
