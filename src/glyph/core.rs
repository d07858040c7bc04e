//! Physical glyphs (sticks, dots, digits, text fragments)
//!
//! A `Glyph` is produced upstream, measured once, and never modified
//! afterwards. Entities share glyphs through `Arc<Glyph>`; a change of shape
//! is expressed by registering a new glyph.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::shape::{Doubt, Shape};
use crate::geometry::{Line, Point, Rectangle};

/// Glyph identifier, unique within a sheet
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId(pub u32);

impl GlyphId {
    /// Id of a glyph not yet registered in a pool
    pub const TRANSIENT: GlyphId = GlyphId(0);

    pub fn is_transient(&self) -> bool {
        *self == Self::TRANSIENT
    }
}

impl fmt::Display for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Left or right side of a glyph
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalSide {
    Left,
    Right,
}

impl HorizontalSide {
    pub const ALL: [HorizontalSide; 2] = [HorizontalSide::Left, HorizontalSide::Right];

    fn index(self) -> usize {
        match self {
            HorizontalSide::Left => 0,
            HorizontalSide::Right => 1,
        }
    }
}

/// Moments computed when a glyph becomes permanent
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct GlyphFeatures {
    /// Number of foreground pixels (box area when pixels are unknown)
    pub weight: usize,
    /// Height / width of the bounding box
    pub aspect: f64,
    /// Mass center
    pub centroid_x: f64,
    pub centroid_y: f64,
}

/// Sort key of components inside composite entities: abscissa, then identity
pub type GlyphKey = (i32, GlyphId);

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Glyph {
    pub id: GlyphId,
    pub shape: Option<Shape>,
    pub doubt: Option<Doubt>,
    /// Contour box
    pub bounds: Rectangle,
    /// Approximating line, for sticks
    pub line: Option<Line>,
    /// Index of the system this glyph was extracted in
    pub system: usize,
    stems: [Option<GlyphId>; 2],
    #[serde(default)]
    pub pixels: Vec<Point>,
    pub features: Option<GlyphFeatures>,
}

impl Glyph {
    pub fn new(system: usize, bounds: Rectangle) -> Self {
        Self {
            id: GlyphId::TRANSIENT,
            shape: None,
            doubt: None,
            bounds,
            line: None,
            system,
            stems: [None, None],
            pixels: Vec::new(),
            features: None,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = GlyphId(id);
        self
    }

    pub fn with_shape(mut self, shape: Shape, doubt: Doubt) -> Self {
        self.shape = Some(shape);
        self.doubt = Some(doubt);
        self
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_stem(mut self, side: HorizontalSide, stem: GlyphId) -> Self {
        self.stems[side.index()] = Some(stem);
        self
    }

    pub fn with_pixels(mut self, pixels: Vec<Point>) -> Self {
        self.pixels = pixels;
        self
    }

    /// Build a vertical stick glyph spanning its bounds
    pub fn stick(system: usize, bounds: Rectangle, shape: Shape) -> Self {
        let x = bounds.x + bounds.width / 2;
        Glyph::new(system, bounds)
            .with_shape(shape, Doubt::Classifier)
            .with_line(Line::new(Point::new(x, bounds.y), Point::new(x, bounds.bottom())))
    }

    pub fn key(&self) -> GlyphKey {
        (self.bounds.x, self.id)
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    pub fn is_stem(&self) -> bool {
        self.shape == Some(Shape::Stem)
    }

    pub fn is_bar(&self) -> bool {
        self.shape.map_or(false, |s| s.is_bar())
    }

    pub fn is_manual(&self) -> bool {
        self.doubt == Some(Doubt::Manual)
    }

    /// Stem attached on the given side, if any
    pub fn stem(&self, side: HorizontalSide) -> Option<GlyphId> {
        self.stems[side.index()]
    }

    pub fn compute_features(&self) -> GlyphFeatures {
        let aspect = if self.bounds.width > 0 {
            self.bounds.height as f64 / self.bounds.width as f64
        } else {
            0.0
        };

        if self.pixels.is_empty() {
            let center = self.center();
            return GlyphFeatures {
                weight: (self.bounds.width.max(0) * self.bounds.height.max(0)) as usize,
                aspect,
                centroid_x: center.x as f64,
                centroid_y: center.y as f64,
            };
        }

        let n = self.pixels.len() as f64;
        let (sx, sy) = self
            .pixels
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));

        GlyphFeatures {
            weight: self.pixels.len(),
            aspect,
            centroid_x: sx / n,
            centroid_y: sy / n,
        }
    }

    /// Transient compound of several glyphs, with no shape yet
    pub fn compound(members: &[Arc<Glyph>]) -> Option<Glyph> {
        let first = members.first()?;
        let bounds = Rectangle::union_all(members.iter().map(|g| &g.bounds))?;
        let pixels = members.iter().flat_map(|g| g.pixels.iter().copied()).collect();
        Some(Glyph::new(first.system, bounds).with_pixels(pixels))
    }

    pub fn id_string(&self) -> String {
        format!("glyph#{}", self.id)
    }
}

/// Bounding center of a set of glyphs
pub fn glyphs_center<'a>(glyphs: impl IntoIterator<Item = &'a Arc<Glyph>>) -> Option<Point> {
    Rectangle::union_all(glyphs.into_iter().map(|g| &g.bounds)).map(|r| r.center())
}
