//! Straight and broken lines

use serde::{Deserialize, Serialize};

use super::Point;

/// Straight line defined by two points, extrapolated beyond them
///
/// Used both for horizontal lines (staff lines, queried with `y_at`) and for
/// vertical sticks (bar lines, queried with `x_at`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    pub start: Point,
    pub stop: Point,
}

impl Line {
    pub fn new(start: Point, stop: Point) -> Self {
        Self { start, stop }
    }

    /// Ordinate of the line at abscissa `x`
    pub fn y_at(&self, x: i32) -> i32 {
        let dx = self.stop.x - self.start.x;
        if dx == 0 {
            return self.start.y;
        }
        let slope = (self.stop.y - self.start.y) as f64 / dx as f64;
        (self.start.y as f64 + slope * (x - self.start.x) as f64).round() as i32
    }

    /// Abscissa of the line at ordinate `y`
    pub fn x_at(&self, y: i32) -> i32 {
        let dy = self.stop.y - self.start.y;
        if dy == 0 {
            return self.start.x;
        }
        let slope = (self.stop.x - self.start.x) as f64 / dy as f64;
        (self.start.x as f64 + slope * (y - self.start.y) as f64).round() as i32
    }
}

/// Sequence of points, such as the limit between two systems
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BrokenLine {
    pub points: Vec<Point>,
}

impl BrokenLine {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}
