//! Geometry primitives
//!
//! All coordinates are integer working units (pixels of the scanned page
//! unless stated otherwise). Rectangles follow the usual raster convention:
//! `(x, y)` is the top-left corner and `y` grows downwards.

pub mod line;
pub mod polygon;

pub use line::{BrokenLine, Line};
pub use polygon::Polygon;

use serde::{Deserialize, Serialize};

/// A point in working units
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Copy of this point moved by (dx, dy)
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Width and height of an area
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dimension {
    pub width: i32,
    pub height: i32,
}

impl Dimension {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// The four corners, clockwise from top-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rectangle::new(x, y, right - x, bottom - y)
    }

    /// Union of all rectangles, `None` for an empty iterator
    pub fn union_all<'a>(rects: impl IntoIterator<Item = &'a Rectangle>) -> Option<Rectangle> {
        rects.into_iter().fold(None, |acc, r| match acc {
            None => Some(*r),
            Some(u) => Some(u.union(r)),
        })
    }

    /// Whether the vertical extents of both rectangles share at least one ordinate
    pub fn overlaps_vertically(&self, top: i32, bottom: i32) -> bool {
        self.y.max(top) <= self.bottom().min(bottom)
    }

    /// Horizontal distance between the two boxes, 0 when they overlap
    pub fn x_gap(&self, other: &Rectangle) -> i32 {
        (other.x - self.right()).max(self.x - other.right()).max(0)
    }

    /// Vertical distance between the two boxes, 0 when they overlap
    pub fn y_gap(&self, other: &Rectangle) -> i32 {
        (other.y - self.bottom()).max(self.y - other.bottom()).max(0)
    }
}
