//! Score tree: Score → System → Part → Staff → Measure → items
//!
//! Nodes own their children directly, so the tree is acyclic and every node
//! has exactly one parent.

use std::collections::BTreeMap;
use std::sync::Arc;

use num_rational::Rational32;
use serde::{Deserialize, Serialize};

use super::barline::Barline;
use super::time_signature::TimeSignature;
use crate::classify::{ReferenceRow, StaffGeometry};
use crate::config::Scale;
use crate::geometry::{BrokenLine, Dimension, Line, Point};
use crate::glyph::{Glyph, GlyphId, GlyphPool, Shape};

/// Tag of every node variant of the tree
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Score,
    System,
    Part,
    Staff,
    Measure,
    Barline,
    TimeSignature,
    Clef,
    Chord,
    Text,
}

/// Root of the tree
#[derive(Clone, Debug, PartialEq)]
pub struct Score {
    pub systems: Vec<System>,
    /// Language tag handed to the text recognizer
    pub language: String,
    pub scale: Scale,
}

impl Score {
    pub fn new(scale: Scale, language: impl Into<String>) -> Self {
        Self {
            systems: Vec::new(),
            language: language.into(),
            scale,
        }
    }

    pub fn add_system(&mut self, system: System) {
        self.systems.push(system);
    }
}

/// Page geometry around a system, as measured upstream
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SystemBoundary {
    /// Left abscissa of the staves
    pub left: i32,
    /// Right abscissa of the staves
    pub right: i32,
    /// Width of the whole sheet
    pub sheet_width: i32,
    /// Limit with the system above
    pub top_limit: BrokenLine,
    /// Limit with the system below
    pub bottom_limit: BrokenLine,
    /// Top line of the first staff
    pub first_line: Line,
    /// Bottom line of the last staff
    pub last_line: Line,
}

#[derive(Clone, Debug, PartialEq)]
pub struct System {
    pub id: usize,
    /// Top-left corner on the page
    pub top_left: Point,
    /// Size in pixels, bounds included (an extent of 10 is a width of 11)
    pub dimension: Dimension,
    /// Display origin, set by the fix pass
    pub origin: Option<Point>,
    /// Id of the last measure before this system, set by the fix pass
    pub first_measure_id: Option<usize>,
    pub parts: Vec<Part>,
    pub glyphs: GlyphPool,
    /// Entities each glyph has been translated into
    pub translations: BTreeMap<GlyphId, Vec<NodeKind>>,
    pub boundary: Option<SystemBoundary>,
}

impl System {
    /// Create a system from its top-left corner and extents
    pub fn new(id: usize, top_left: Point, width: i32, height: i32) -> Self {
        Self {
            id,
            top_left,
            dimension: Dimension::new(width + 1, height + 1),
            origin: None,
            first_measure_id: None,
            parts: Vec::new(),
            glyphs: GlyphPool::new(),
            translations: BTreeMap::new(),
            boundary: None,
        }
    }

    pub fn with_boundary(mut self, boundary: SystemBoundary) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Horizontal extent (right - left)
    pub fn width(&self) -> i32 {
        self.dimension.width - 1
    }

    pub fn add_part(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Register a glyph extracted in this system
    pub fn register_glyph(&mut self, glyph: Glyph) -> Arc<Glyph> {
        self.glyphs.register(glyph)
    }

    /// Record that a glyph has been translated into an entity
    pub fn add_translation(&mut self, glyph: GlyphId, kind: NodeKind) {
        self.translations.entry(glyph).or_default().push(kind);
    }

    /// Id of the last measure of this system, falling back to the first id
    pub fn last_measure_id(&self) -> Option<usize> {
        self.parts
            .iter()
            .flat_map(|p| p.staves.iter())
            .filter_map(|s| s.last_measure_id)
            .max()
            .or(self.first_measure_id)
    }

    pub fn staves(&self) -> impl Iterator<Item = &Staff> {
        self.parts.iter().flat_map(|p| p.staves.iter())
    }
}

/// A part within a system
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Part {
    pub id: usize,
    pub staves: Vec<Staff>,
    /// Duration accumulated per measure, filled by rhythm checks
    pub durations: Vec<Rational32>,
}

impl Part {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn add_staff(&mut self, staff: Staff) {
        self.staves.push(staff);
    }

    pub fn first_staff(&self) -> Option<&Staff> {
        self.staves.first()
    }

    /// Reference row used to compute bar line signatures
    pub fn reference_row(&self) -> Option<ReferenceRow> {
        self.first_staff().map(Staff::reference_row)
    }

    pub fn add_duration(&mut self, duration: Rational32) {
        self.durations.push(duration);
    }

    pub fn reset_durations(&mut self) {
        self.durations.clear();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Staff {
    pub id: usize,
    /// Top-left corner on the page
    pub top_left: Point,
    /// Distance from top line to bottom line
    pub height: i32,
    /// Staff lines on the page, top to bottom
    pub lines: Vec<Line>,
    /// Display origin, set by the fix pass
    pub display_origin: Option<Point>,
    pub first_measure_id: Option<usize>,
    pub last_measure_id: Option<usize>,
    pub starting_barline: Option<Barline>,
    pub measures: Vec<Measure>,
}

impl Staff {
    pub fn new(id: usize, top_left: Point, height: i32) -> Self {
        Self {
            id,
            top_left,
            height,
            lines: Vec::new(),
            display_origin: None,
            first_measure_id: None,
            last_measure_id: None,
            starting_barline: None,
            measures: Vec::new(),
        }
    }

    /// Staff with five evenly spaced horizontal lines of the given width
    pub fn with_lines(mut self, width: i32) -> Self {
        let interline = self.height / 4;
        self.lines = (0..5)
            .map(|i| {
                let y = self.top_left.y + i * interline;
                Line::new(Point::new(self.top_left.x, y), Point::new(self.top_left.x + width, y))
            })
            .collect();
        self
    }

    pub fn add_measure(&mut self, measure: Measure) {
        self.measures.push(measure);
    }

    pub fn geometry(&self) -> StaffGeometry {
        StaffGeometry::new(self.top_left.y, self.height)
    }

    pub fn reference_row(&self) -> ReferenceRow {
        ReferenceRow::new(self.top_left.y, self.top_left.y + self.height)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measure {
    /// Set by the fix pass
    pub id: Option<usize>,
    pub items: Vec<MeasureItem>,
}

impl Measure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: MeasureItem) {
        self.items.push(item);
    }

    /// Ending bar line of the measure
    pub fn barline(&self) -> Option<&Barline> {
        self.items.iter().rev().find_map(|item| match item {
            MeasureItem::Barline(barline) => Some(barline),
            _ => None,
        })
    }

    /// Remove every item except bar lines
    pub fn cleanup(&mut self) {
        self.items.retain(|item| matches!(item, MeasureItem::Barline(_)));
    }
}

/// Leaf entities of a measure
#[derive(Clone, Debug, PartialEq)]
pub enum MeasureItem {
    Barline(Barline),
    TimeSignature(TimeSignature),
    Clef(Clef),
    Chord(Chord),
    Text(TextItem),
}

impl MeasureItem {
    pub fn kind(&self) -> NodeKind {
        match self {
            MeasureItem::Barline(_) => NodeKind::Barline,
            MeasureItem::TimeSignature(_) => NodeKind::TimeSignature,
            MeasureItem::Clef(_) => NodeKind::Clef,
            MeasureItem::Chord(_) => NodeKind::Chord,
            MeasureItem::Text(_) => NodeKind::Text,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Clef {
    pub shape: Shape,
    pub glyph: Arc<Glyph>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chord {
    pub glyphs: Vec<Arc<Glyph>>,
    pub duration: Option<Rational32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub value: String,
    pub glyph: Arc<Glyph>,
}
