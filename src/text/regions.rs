//! Detection zones around a system
//!
//! ```text
//!  +-------- top limit (system above) --------+
//!  |                 North                    |
//!  nw ------ first staff line - margin ------ ne
//!  | West |       staves ...          | East  |
//!  sw ------ last staff line + margin ------- se
//!  |                 South                    |
//!  +------ bottom limit (system below) -------+
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{Scale, TextConstants};
use crate::geometry::{Point, Polygon};
use crate::score::SystemBoundary;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZoneSide {
    North,
    South,
    West,
    East,
}

impl fmt::Display for ZoneSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZoneSide::North => "North",
            ZoneSide::South => "South",
            ZoneSide::West => "West",
            ZoneSide::East => "East",
        };
        f.write_str(name)
    }
}

/// A named detection zone
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Region {
    pub side: ZoneSide,
    pub polygon: Polygon,
}

impl Region {
    pub fn new(side: ZoneSide, polygon: Polygon) -> Self {
        Self { side, polygon }
    }
}

fn build_polygon(head: &[Point], tail: &[Point]) -> Polygon {
    Polygon::new(head.iter().chain(tail.iter()).copied().collect())
}

/// Build the north, south, west and east zones of a system, in that order
pub fn build_regions(boundary: &SystemBoundary, scale: &Scale, constants: &TextConstants) -> Vec<Region> {
    let margin_above = scale.to_pixels(constants.staff_margin_above);
    let margin_below = scale.to_pixels(constants.staff_margin_below);

    let width = boundary.sheet_width;
    let left = boundary.left;
    let right = boundary.right;
    let first = &boundary.first_line;
    let last = &boundary.last_line;

    // Move up a bit
    let nw = Point::new(0, first.y_at(0) - margin_above);
    let ne = Point::new(width, first.y_at(width) - margin_above);

    // Move down a bit
    let sw = Point::new(0, last.y_at(0) + margin_below);
    let se = Point::new(width, last.y_at(width) + margin_below);

    vec![
        Region::new(ZoneSide::North, build_polygon(&boundary.top_limit.points, &[ne, nw])),
        Region::new(ZoneSide::South, build_polygon(&boundary.bottom_limit.points, &[se, sw])),
        Region::new(
            ZoneSide::West,
            build_polygon(
                &[nw, Point::new(left, first.y_at(left)), Point::new(left, last.y_at(left))],
                &[sw],
            ),
        ),
        Region::new(
            ZoneSide::East,
            build_polygon(
                &[Point::new(right, first.y_at(right)), ne, se],
                &[Point::new(right, last.y_at(right))],
            ),
        ),
    ]
}
