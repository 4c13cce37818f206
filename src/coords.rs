use core::fmt;
use grid_util::point::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row/column address of a cell. Row 0 is the top of the world, column 0 the left. Coordinates
/// are signed because world positions may map outside the grid.
///
/// On the underlying [grid_util] grids the column is `x` and the row is `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridCoords {
    pub i: i32,
    pub j: i32,
}

impl GridCoords {
    pub const fn new(i: i32, j: i32) -> GridCoords {
        GridCoords { i, j }
    }

    /// The eight surrounding cells, in the neighbour order of [Point::moore_neighborhood].
    pub fn moore_neighborhood(&self) -> impl Iterator<Item = GridCoords> {
        Point::from(*self)
            .moore_neighborhood()
            .into_iter()
            .map(GridCoords::from)
    }
}

impl From<GridCoords> for Point {
    fn from(coords: GridCoords) -> Point {
        Point::new(coords.j, coords.i)
    }
}

impl From<Point> for GridCoords {
    fn from(point: Point) -> GridCoords {
        GridCoords::new(point.y, point.x)
    }
}

impl fmt::Display for GridCoords {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.i, self.j)
    }
}
