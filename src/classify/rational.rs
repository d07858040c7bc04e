//! Time signature decomposition into numerator and denominator
//!
//! A time signature is either one whole symbol (e.g. `TimeSixEight`), mapped
//! through a fixed table, or several digit glyphs stacked on the staff. In the
//! latter case each digit is routed by its band: above the middle line goes to
//! the numerator, below it to the denominator.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{kind, Diagnostic};
use crate::glyph::{Glyph, Shape};

/// Whole time signatures and their (numerator, denominator)
static WHOLE_SIGNATURES: Lazy<HashMap<Shape, (u32, u32)>> = Lazy::new(|| {
    HashMap::from([
        (Shape::TimeFourFour, (4, 4)),
        (Shape::TimeTwoTwo, (2, 2)),
        (Shape::TimeTwoFour, (2, 4)),
        (Shape::TimeThreeFour, (3, 4)),
        (Shape::TimeSixEight, (6, 8)),
        (Shape::CommonTime, (4, 4)),
        (Shape::CutTime, (2, 4)),
    ])
});

/// Numeric value of time signature digit shapes
static DIGITS: Lazy<HashMap<Shape, u32>> = Lazy::new(|| {
    HashMap::from([
        (Shape::TimeZero, 0),
        (Shape::TimeOne, 1),
        (Shape::TimeTwo, 2),
        (Shape::TimeThree, 3),
        (Shape::TimeFour, 4),
        (Shape::TimeFive, 5),
        (Shape::TimeSix, 6),
        (Shape::TimeSeven, 7),
        (Shape::TimeEight, 8),
        (Shape::TimeNine, 9),
        (Shape::TimeTwelve, 12),
        (Shape::TimeSixteen, 16),
    ])
});

/// Numeric value carried by a glyph shape, if any
pub fn numeric_value(shape: Shape) -> Option<u32> {
    DIGITS.get(&shape).copied()
}

/// Vertical position of a component relative to the staff middle line
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    /// Above the middle line (numerator)
    Upper,
    /// On the middle line
    Center,
    /// Below the middle line (denominator)
    Lower,
}

/// Vertical geometry of the staff a time signature belongs to
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaffGeometry {
    /// Ordinate of the top line
    pub top: i32,
    /// Distance between top and bottom lines
    pub height: i32,
}

impl StaffGeometry {
    pub fn new(top: i32, height: i32) -> Self {
        Self { top, height }
    }

    /// Pitch position of an ordinate: 0 on the middle line, one step per
    /// half interline, negative above
    pub fn pitch_position(&self, y: i32) -> i32 {
        let half_interline = self.height as f64 / 8.0;
        if half_interline <= 0.0 {
            return 0;
        }
        let middle = self.top as f64 + self.height as f64 / 2.0;
        ((y as f64 - middle) / half_interline).round() as i32
    }

    pub fn band(&self, y: i32) -> Band {
        match self.pitch_position(y) {
            p if p < 0 => Band::Upper,
            0 => Band::Center,
            _ => Band::Lower,
        }
    }
}

/// Outcome of a decomposition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Decomposition {
    /// Both parts known; `shape` is set for whole time signature symbols
    Complete {
        numerator: u32,
        denominator: u32,
        shape: Option<Shape>,
    },
    /// At least one part is missing
    Partial {
        numerator: Option<u32>,
        denominator: Option<u32>,
    },
}

impl Decomposition {
    pub fn numerator(&self) -> Option<u32> {
        match self {
            Decomposition::Complete { numerator, .. } => Some(*numerator),
            Decomposition::Partial { numerator, .. } => *numerator,
        }
    }

    pub fn denominator(&self) -> Option<u32> {
        match self {
            Decomposition::Complete { denominator, .. } => Some(*denominator),
            Decomposition::Partial { denominator, .. } => *denominator,
        }
    }

    pub fn shape(&self) -> Option<Shape> {
        match self {
            Decomposition::Complete { shape, .. } => *shape,
            Decomposition::Partial { .. } => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Decomposition::Complete { .. })
    }

    fn from_parts(numerator: Option<u32>, denominator: Option<u32>) -> Self {
        match (numerator, denominator) {
            (Some(numerator), Some(denominator)) => Decomposition::Complete {
                numerator,
                denominator,
                shape: None,
            },
            (numerator, denominator) => Decomposition::Partial {
                numerator,
                denominator,
            },
        }
    }
}

/// Append a digit to a decimal accumulator (no digit count limit)
fn accumulate(acc: Option<u32>, digit: u32) -> Option<u32> {
    Some(acc.unwrap_or(0).saturating_mul(10).saturating_add(digit))
}

fn report(diagnostics: &mut Vec<Diagnostic>, glyph: &Glyph, diagnostic: Diagnostic) {
    log::warn!("{} {}", glyph.id_string(), diagnostic.message);
    diagnostics.push(diagnostic.with_glyph(glyph.id));
}

/// Decompose an ordered set of time signature components
///
/// Components are expected in abscissa order. Problems are reported in the
/// returned diagnostics and never abort the decomposition.
pub fn decompose(components: &[Arc<Glyph>], staff: &StaffGeometry) -> (Decomposition, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    match components {
        [] => (Decomposition::from_parts(None, None), diagnostics),
        [single] => {
            if let Some(&(numerator, denominator)) = single.shape.and_then(|s| WHOLE_SIGNATURES.get(&s)) {
                let decomposition = Decomposition::Complete {
                    numerator,
                    denominator,
                    shape: single.shape,
                };
                return (decomposition, diagnostics);
            }

            report(
                &mut diagnostics,
                single,
                Diagnostic::warning(
                    kind::UNEXPECTED_SINGLE_COMPONENT,
                    format!("Weird single time component: {:?}", single.shape),
                ),
            );
            (Decomposition::from_parts(None, None), diagnostics)
        }
        _ => {
            let mut numerator = None;
            let mut denominator = None;

            for glyph in components {
                let center = glyph.center();
                let band = staff.band(center.y);
                let value = glyph.shape.and_then(numeric_value);
                log::debug!("band={:?} value={:?} {}", band, value, glyph.id_string());

                match (value, band) {
                    (Some(digit), Band::Upper) => numerator = accumulate(numerator, digit),
                    (Some(digit), Band::Lower) => denominator = accumulate(denominator, digit),
                    (Some(_), Band::Center) => report(
                        &mut diagnostics,
                        glyph,
                        Diagnostic::warning(
                            kind::CENTER_BAND_COMPONENT,
                            "Multi-symbol time signature with a component of pitch position 0",
                        ),
                    ),
                    (None, _) => report(
                        &mut diagnostics,
                        glyph,
                        Diagnostic::warning(kind::NO_NUMERIC_VALUE, "Time signature component with no numeric value"),
                    ),
                }
            }

            log::debug!("numerator={:?} denominator={:?}", numerator, denominator);
            (Decomposition::from_parts(numerator, denominator), diagnostics)
        }
    }
}
