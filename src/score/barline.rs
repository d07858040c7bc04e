//! Logical bar line, made of thin bars, thick bars and repeat dots

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::cache::{CacheState, Cached};
use crate::classify::{classify, Classification, ReferenceRow};
use crate::diagnostics::Diagnostic;
use crate::error::{EngineError, Result};
use crate::geometry::Point;
use crate::glyph::{glyphs_center, Glyph, GlyphKey, Shape};

/// Derived data, reset as a whole on any change of sticks
#[derive(Clone, Debug, Default)]
struct Derived {
    center: Cached<Option<Point>>,
    classification: Cached<Classification>,
    forced_shape: Option<Shape>,
}

/// A logical bar line
///
/// Sticks are kept sorted on abscissa. Center, signature and shape are
/// computed lazily and invalidated by `add_stick` and `merge_with`.
#[derive(Clone, Debug)]
pub struct Barline {
    sticks: BTreeMap<GlyphKey, Arc<Glyph>>,
    system: usize,
    reference: Option<ReferenceRow>,
    derived: Derived,
}

impl Barline {
    /// Create an empty bar line in the given system
    ///
    /// `reference` is the vertical band of the first staff of the part; when
    /// absent every stick takes part in the signature.
    pub fn new(system: usize, reference: Option<ReferenceRow>) -> Self {
        Self {
            sticks: BTreeMap::new(),
            system,
            reference,
            derived: Derived::default(),
        }
    }

    pub fn system(&self) -> usize {
        self.system
    }

    pub fn reference(&self) -> Option<ReferenceRow> {
        self.reference
    }

    /// Include a stick (bar or dot), invalidating derived data
    pub fn add_stick(&mut self, stick: Arc<Glyph>) -> Result<()> {
        self.check_system(&stick)?;
        self.sticks.insert(stick.key(), stick);
        self.reset();
        Ok(())
    }

    /// Merge the sticks of another bar line into this one
    ///
    /// Nothing is merged if any stick of `other` belongs to another system.
    pub fn merge_with(&mut self, other: &Barline) -> Result<()> {
        for stick in other.sticks() {
            self.check_system(stick)?;
        }
        for stick in other.sticks() {
            self.sticks.insert(stick.key(), Arc::clone(stick));
        }
        self.reset();
        Ok(())
    }

    /// Change the reference row, invalidating derived data
    pub fn set_reference(&mut self, reference: Option<ReferenceRow>) {
        self.reference = reference;
        self.reset();
    }

    /// Force the shape, for the rare cases where the signature is not enough
    ///
    /// The forced shape is dropped by the next change of sticks.
    pub fn force_shape(&mut self, shape: Shape) {
        self.derived.forced_shape = Some(shape);
    }

    /// Invalidate cached data, so that it gets lazily recomputed when needed
    pub fn reset(&mut self) {
        self.derived = Derived::default();
    }

    /// Sticks, in abscissa order
    pub fn sticks(&self) -> impl Iterator<Item = &Arc<Glyph>> {
        self.sticks.values()
    }

    pub fn stick_count(&self) -> usize {
        self.sticks.len()
    }

    pub fn classification(&self) -> &Classification {
        self.derived.classification.get_or_compute(|| {
            let sticks: Vec<_> = self.sticks.values().cloned().collect();
            classify(&sticks, self.reference)
        })
    }

    pub fn signature(&self) -> &str {
        &self.classification().signature
    }

    /// Shape of this bar line, `None` when the signature is unknown
    pub fn shape(&self) -> Option<Shape> {
        self.derived.forced_shape.or_else(|| self.classification().shape)
    }

    /// Shape if already known, without computing it
    pub fn cached_shape(&self) -> Option<Shape> {
        self.derived
            .forced_shape
            .or_else(|| self.derived.classification.peek().and_then(|c| c.shape))
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.classification().diagnostics
    }

    /// Bounding center of all sticks
    pub fn center(&self) -> Option<Point> {
        *self.derived.center.get_or_compute(|| glyphs_center(self.sticks.values()))
    }

    pub fn cache_state(&self) -> CacheState {
        self.derived.classification.state()
    }

    /// Abscissa of the left side, measured at ordinate `y`
    pub fn left_x(&self, y: i32) -> Option<i32> {
        let x = self.bar_abscissae(y).next();
        if x.is_none() {
            log::warn!("No usable stick to compute barline abscissa");
        }
        x
    }

    /// Abscissa of the right side, measured at ordinate `y`
    pub fn right_x(&self, y: i32) -> Option<i32> {
        self.bar_abscissae(y).max()
    }

    /// Whether every staff band is overlapped by at least one stick
    pub fn joins_all_staves(&self, staves: &[ReferenceRow]) -> bool {
        staves.iter().all(|staff| {
            self.sticks
                .values()
                .any(|stick| staff.top.max(stick.bounds.y) < staff.bottom.min(stick.bounds.bottom()))
        })
    }

    fn bar_abscissae(&self, y: i32) -> impl Iterator<Item = i32> + '_ {
        self.sticks
            .values()
            .filter(|s| s.is_bar())
            .filter_map(move |s| s.line.map(|line| line.x_at(y)))
    }

    fn check_system(&self, stick: &Glyph) -> Result<()> {
        if stick.system != self.system {
            return Err(EngineError::StructuralMismatch {
                entity: "barline",
                glyph: stick.id,
                expected: self.system,
                found: stick.system,
            });
        }
        Ok(())
    }
}

impl PartialEq for Barline {
    fn eq(&self, other: &Self) -> bool {
        self.system == other.system
            && self.reference == other.reference
            && self.derived.forced_shape == other.derived.forced_shape
            && self.sticks.keys().eq(other.sticks.keys())
    }
}

impl fmt::Display for Barline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Barline {:?} center={:?} sig={} sticks[", self.shape(), self.center(), self.signature())?;
        for stick in self.sticks() {
            write!(f, "#{}", stick.id)?;
        }
        write!(f, "]}}")
    }
}
