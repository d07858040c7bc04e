//! Rendering targets
//!
//! Render passes draw onto a [`RenderSurface`]. Coordinates handed to the
//! surface are already zoomed.

pub mod display_list;

pub use display_list::{DisplayItem, DisplayList};

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rectangle};
use crate::glyph::Shape;

/// Display zoom factor
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    ratio: f64,
}

impl Zoom {
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn scale(&self, value: i32) -> f32 {
        (value as f64 * self.ratio) as f32
    }

    pub fn point(&self, p: Point) -> (f32, f32) {
        (self.scale(p.x), self.scale(p.y))
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self { ratio: 1.0 }
    }
}

/// Target of a render pass
pub trait RenderSurface {
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32));

    /// Draw a music symbol centered on a point, with its staff pitch position if known
    fn draw_symbol(&mut self, shape: Shape, center: (f32, f32), pitch: Option<i32>);

    fn draw_text(&mut self, value: &str, x: f32, y: f32, w: f32, h: f32);
}

/// Zoomed bounds, as (x, y, w, h)
pub fn zoom_rect(zoom: &Zoom, rect: &Rectangle) -> (f32, f32, f32, f32) {
    (
        zoom.scale(rect.x),
        zoom.scale(rect.y),
        zoom.scale(rect.width),
        zoom.scale(rect.height),
    )
}
