//! Simple polygons used as detection zones

use serde::{Deserialize, Serialize};

use super::{Point, Rectangle};

/// Closed simple polygon (last vertex implicitly joined to the first)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Even-odd containment test
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let (px, py) = (p.x as f64, p.y as f64);
        let mut inside = false;
        let mut j = n - 1;

        for i in 0..n {
            let (xi, yi) = (self.vertices[i].x as f64, self.vertices[i].y as f64);
            let (xj, yj) = (self.vertices[j].x as f64, self.vertices[j].y as f64);

            if (yi > py) != (yj > py) {
                let cross = (xj - xi) * (py - yi) / (yj - yi) + xi;
                if px < cross {
                    inside = !inside;
                }
            }
            j = i;
        }

        inside
    }

    /// Whether the whole rectangle lies inside the polygon
    pub fn contains_rect(&self, rect: &Rectangle) -> bool {
        rect.corners().iter().all(|c| self.contains(*c))
    }

    pub fn bounds(&self) -> Option<Rectangle> {
        let first = self.vertices.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for v in &self.vertices {
            min_x = min_x.min(v.x);
            min_y = min_y.min(v.y);
            max_x = max_x.max(v.x);
            max_y = max_y.max(v.y);
        }
        Some(Rectangle::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0, 0),
            Point::new(100, 0),
            Point::new(100, 100),
            Point::new(0, 100),
        ])
    }

    #[test]
    fn test_contains_point() {
        let poly = square();
        assert!(poly.contains(Point::new(50, 50)));
        assert!(!poly.contains(Point::new(150, 50)));
        assert!(!poly.contains(Point::new(50, -1)));
    }

    #[test]
    fn test_contains_rect() {
        let poly = square();
        assert!(poly.contains_rect(&Rectangle::new(10, 10, 20, 20)));
        assert!(!poly.contains_rect(&Rectangle::new(90, 10, 20, 20)));
    }

    #[test]
    fn test_degenerate_polygon() {
        let poly = Polygon::new(vec![Point::new(0, 0), Point::new(10, 10)]);
        assert!(!poly.contains(Point::new(5, 5)));
        assert_eq!(Polygon::default().bounds(), None);
    }
}
