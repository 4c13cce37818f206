//! World-space primitives consumed by the grid: an axis-aligned rectangle and the [Shape]
//! capability obstacles implement, on top of [glam]'s [Vec2]. World coordinates are y-up, so a
//! rectangle's `top` is larger than its `bottom`.
pub use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounds in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Bounds {
        Bounds {
            left,
            right,
            top,
            bottom,
        }
    }
    pub fn left_top(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }
    pub fn right_bottom(&self) -> Vec2 {
        Vec2::new(self.right, self.bottom)
    }
    pub fn contains(&self, point: &Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y <= self.top
            && point.y >= self.bottom
    }
}

/// An obstacle that can be rasterized onto a grid. The bounding box is used to cull cells before
/// the precise [contains](Shape::contains) test runs, so it must enclose every point for which
/// `contains` returns [true].
pub trait Shape {
    fn bounding_box(&self) -> Bounds;
    fn contains(&self, point: &Vec2) -> bool;
}

impl<S: Shape + ?Sized> Shape for &S {
    fn bounding_box(&self) -> Bounds {
        (**self).bounding_box()
    }
    fn contains(&self, point: &Vec2) -> bool {
        (**self).contains(point)
    }
}

impl<S: Shape + ?Sized> Shape for Box<S> {
    fn bounding_box(&self) -> Bounds {
        (**self).bounding_box()
    }
    fn contains(&self, point: &Vec2) -> bool {
        (**self).contains(point)
    }
}

/// Solid axis-aligned rectangle, boundary included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub bounds: Bounds,
}

impl Rect {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Rect {
        Rect {
            bounds: Bounds::new(left, right, top, bottom),
        }
    }
    /// Rectangle of the given size centered on `center`.
    pub fn centered(center: Vec2, width: f32, height: f32) -> Rect {
        Rect::new(
            center.x - width / 2.0,
            center.x + width / 2.0,
            center.y + height / 2.0,
            center.y - height / 2.0,
        )
    }
}

impl Shape for Rect {
    fn bounding_box(&self) -> Bounds {
        self.bounds
    }
    fn contains(&self, point: &Vec2) -> bool {
        self.bounds.contains(point)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Circle {
        Circle { center, radius }
    }
}

impl Shape for Circle {
    fn bounding_box(&self) -> Bounds {
        Bounds::new(
            self.center.x - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
            self.center.y - self.radius,
        )
    }
    fn contains(&self, point: &Vec2) -> bool {
        self.center.distance(*point) <= self.radius
    }
}

/// Simple polygon given by its vertices in order. Containment uses the even-odd rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Polygon {
        Polygon { vertices }
    }
}

impl Shape for Polygon {
    fn bounding_box(&self) -> Bounds {
        let mut bounds = Bounds::new(
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::NEG_INFINITY,
            f32::INFINITY,
        );
        for v in &self.vertices {
            bounds.left = bounds.left.min(v.x);
            bounds.right = bounds.right.max(v.x);
            bounds.top = bounds.top.max(v.y);
            bounds.bottom = bounds.bottom.min(v.y);
        }
        bounds
    }
    fn contains(&self, point: &Vec2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[j];
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
