//! Time signature, made of one whole symbol or of several digits

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use num_rational::Rational32;

use super::cache::{CacheState, Cached};
use crate::classify::{decompose, Decomposition, StaffGeometry};
use crate::diagnostics::Diagnostic;
use crate::error::{EngineError, Result};
use crate::geometry::Point;
use crate::glyph::{glyphs_center, Glyph, GlyphKey, Shape};

#[derive(Clone, Debug, Default)]
struct Derived {
    center: Cached<Option<Point>>,
    rational: Cached<(Decomposition, Vec<Diagnostic>)>,
}

/// A time signature within a staff
///
/// The glyphs are kept sorted on abscissa. This can be just one glyph (e.g.
/// `TimeSixEight` for 6/8) or several (e.g. `TimeSix` above `TimeTwelve` for
/// 6/12).
#[derive(Clone, Debug)]
pub struct TimeSignature {
    glyphs: BTreeMap<GlyphKey, Arc<Glyph>>,
    system: usize,
    staff: StaffGeometry,
    derived: Derived,
}

impl TimeSignature {
    pub fn new(system: usize, staff: StaffGeometry) -> Self {
        Self {
            glyphs: BTreeMap::new(),
            system,
            staff,
            derived: Derived::default(),
        }
    }

    pub fn staff(&self) -> StaffGeometry {
        self.staff
    }

    /// Add a new glyph as part of this time signature
    pub fn add_glyph(&mut self, glyph: Arc<Glyph>) -> Result<()> {
        if glyph.system != self.system {
            return Err(EngineError::StructuralMismatch {
                entity: "time signature",
                glyph: glyph.id,
                expected: self.system,
                found: glyph.system,
            });
        }
        self.glyphs.insert(glyph.key(), glyph);
        self.reset();
        Ok(())
    }

    /// Invalidate cached data, so that it gets lazily recomputed when needed
    pub fn reset(&mut self) {
        self.derived = Derived::default();
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &Arc<Glyph>> {
        self.glyphs.values()
    }

    pub fn decomposition(&self) -> &Decomposition {
        &self.computed().0
    }

    /// Decomposition if already computed
    pub fn cached_decomposition(&self) -> Option<&Decomposition> {
        self.derived.rational.peek().map(|(d, _)| d)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.computed().1
    }

    /// Top part of the time signature
    pub fn numerator(&self) -> Option<u32> {
        self.decomposition().numerator()
    }

    /// Bottom part of the time signature
    pub fn denominator(&self) -> Option<u32> {
        self.decomposition().denominator()
    }

    /// Whole time signature shape, if any
    pub fn shape(&self) -> Option<Shape> {
        self.decomposition().shape()
    }

    /// Value as an unreduced ratio (6/8 stays 6/8)
    pub fn rational(&self) -> Option<Rational32> {
        match *self.decomposition() {
            Decomposition::Complete {
                numerator,
                denominator,
                ..
            } if denominator != 0 => {
                let numerator = i32::try_from(numerator).ok()?;
                let denominator = i32::try_from(denominator).ok()?;
                Some(Rational32::new_raw(numerator, denominator))
            }
            _ => None,
        }
    }

    /// Bounding center of the glyphs
    pub fn center(&self) -> Option<Point> {
        *self.derived.center.get_or_compute(|| glyphs_center(self.glyphs.values()))
    }

    /// Center if already computed
    pub fn cached_center(&self) -> Option<Point> {
        self.derived.center.peek().copied().flatten()
    }

    pub fn cache_state(&self) -> CacheState {
        self.derived.rational.state()
    }

    pub fn center_state(&self) -> CacheState {
        self.derived.center.state()
    }

    fn computed(&self) -> &(Decomposition, Vec<Diagnostic>) {
        self.derived.rational.get_or_compute(|| {
            let glyphs: Vec<_> = self.glyphs.values().cloned().collect();
            decompose(&glyphs, &self.staff)
        })
    }
}

impl PartialEq for TimeSignature {
    fn eq(&self, other: &Self) -> bool {
        self.system == other.system && self.staff == other.staff && self.glyphs.keys().eq(other.glyphs.keys())
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{TimeSignature")?;
        if let Some(numerator) = self.numerator() {
            write!(f, " {}/", numerator)?;
            match self.denominator() {
                Some(denominator) => write!(f, "{}", denominator)?,
                None => write!(f, "?")?,
            }
        }
        write!(f, " {:?} center={:?} glyphs[", self.shape(), self.center())?;
        for glyph in self.glyphs() {
            write!(f, "#{}", glyph.id)?;
        }
        write!(f, "]}}")
    }
}
