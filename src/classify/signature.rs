//! Signature-based barline classification
//!
//! Each bar component is mapped to a letter code, codes are concatenated in
//! abscissa order, and the resulting signature is looked up in a fixed table:
//!
//! ```text
//! thin | thick | dot        signature      shape
//! N      K       O          "NK"           FinalBarline
//!                           "ONKNO"        BackToBackRepeatSign
//! ```
//!
//! Consecutive identical codes collapse into one, except the thin bar code
//! `N`, which may repeat so that `NN` (double barline) stays distinct from `N`.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{kind, Diagnostic};
use crate::glyph::{Glyph, Shape};

const THIN: &str = "N";
const DOT: &str = "O";

/// Letter codes of bar components
static LETTERS: Lazy<HashMap<Shape, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (Shape::ThickBarline, "K"),
        (Shape::ThinBarline, THIN),
        (Shape::DoubleBarline, "NN"),
        (Shape::FinalBarline, "NK"),
        (Shape::ReverseFinalBarline, "KN"),
        (Shape::LeftRepeatSign, "KNO"),
        (Shape::RightRepeatSign, "ONK"),
        (Shape::BackToBackRepeatSign, "ONKNO"),
        (Shape::Dot, DOT), // Capital o (not zero)
        (Shape::RepeatDots, DOT),
    ])
});

/// Barline shape of each known signature
static SIGNATURES: Lazy<HashMap<&'static str, Shape>> = Lazy::new(|| {
    HashMap::from([
        ("N", Shape::ThinBarline),
        ("NN", Shape::DoubleBarline),
        ("NK", Shape::FinalBarline),
        ("KN", Shape::ReverseFinalBarline),
        ("ONK", Shape::RightRepeatSign),
        ("KNO", Shape::LeftRepeatSign),
        ("ONKNO", Shape::BackToBackRepeatSign),
        // Partial back-to-back forms, when some dots are missing
        ("NKNO", Shape::BackToBackRepeatSign),
        ("ONKN", Shape::BackToBackRepeatSign),
        ("NKN", Shape::BackToBackRepeatSign),
    ])
});

/// Letter code of a component shape, if it can be part of a barline
pub fn letter_for(shape: Shape) -> Option<&'static str> {
    LETTERS.get(&shape).copied()
}

/// Barline shape of a signature, `None` for unmapped signatures
pub fn shape_for_signature(signature: &str) -> Option<Shape> {
    SIGNATURES.get(signature).copied()
}

/// Vertical band of the reference row (first staff of the containing part)
///
/// Only components within this band take part in the signature, so that the
/// sticks and dots of lower staves are not counted twice.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceRow {
    pub top: i32,
    pub bottom: i32,
}

impl ReferenceRow {
    pub fn new(top: i32, bottom: i32) -> Self {
        Self { top, bottom }
    }

    fn holds(&self, glyph: &Glyph) -> bool {
        if glyph.shape.map_or(false, |s| letter_for(s) == Some(DOT)) {
            let y = glyph.center().y;
            self.top <= y && y <= self.bottom
        } else {
            glyph.bounds.overlaps_vertically(self.top, self.bottom)
        }
    }
}

/// Outcome of a barline classification
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Classification {
    pub signature: String,
    /// `None` when the signature is unknown, meaning insufficient evidence
    pub shape: Option<Shape>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Classify an ordered sequence of bar components
///
/// Components are expected in abscissa order. Components without a letter
/// code are reported and ignored.
pub fn classify(components: &[Arc<Glyph>], reference: Option<ReferenceRow>) -> Classification {
    let mut signature = String::new();
    let mut diagnostics = Vec::new();
    let mut last: Option<&'static str> = None;

    for glyph in components {
        let letter = match glyph.shape.and_then(letter_for) {
            Some(letter) => letter,
            None => {
                let diag = Diagnostic::warning(
                    kind::UNKNOWN_BAR_COMPONENT,
                    format!("Unknown bar component: {:?}", glyph.shape),
                )
                .with_glyph(glyph.id);
                log::warn!("{} {}", glyph.id_string(), diag.message);
                diagnostics.push(diag);
                continue;
            }
        };

        if let Some(row) = reference {
            if !row.holds(glyph) {
                continue;
            }
        }

        if last != Some(letter) || letter == THIN {
            signature.push_str(letter);
        }
        last = Some(letter);
    }

    let shape = shape_for_signature(&signature);
    log::debug!("sig={} shape={:?}", signature, shape);

    Classification {
        signature,
        shape,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;
    use crate::glyph::Doubt;

    fn component(id: u32, x: i32, shape: Shape) -> Arc<Glyph> {
        let bounds = match shape {
            Shape::Dot | Shape::RepeatDots => Rectangle::new(x, 45, 4, 4),
            _ => Rectangle::new(x, 0, 3, 100),
        };
        Arc::new(Glyph::new(0, bounds).with_id(id).with_shape(shape, Doubt::Classifier))
    }

    fn sequence(shapes: &[Shape]) -> Vec<Arc<Glyph>> {
        shapes
            .iter()
            .enumerate()
            .map(|(i, s)| component(i as u32 + 1, i as i32 * 10, *s))
            .collect()
    }

    #[test]
    fn test_single_thin() {
        let result = classify(&sequence(&[Shape::ThinBarline]), None);
        assert_eq!(result.signature, "N");
        assert_eq!(result.shape, Some(Shape::ThinBarline));
    }

    #[test]
    fn test_thin_code_repeats() {
        let result = classify(&sequence(&[Shape::ThinBarline, Shape::ThinBarline]), None);
        assert_eq!(result.signature, "NN");
        assert_eq!(result.shape, Some(Shape::DoubleBarline));
    }

    #[test]
    fn test_other_codes_collapse() {
        let result = classify(
            &sequence(&[Shape::Dot, Shape::Dot, Shape::ThinBarline, Shape::ThickBarline, Shape::ThickBarline]),
            None,
        );
        assert_eq!(result.signature, "ONK");
        assert_eq!(result.shape, Some(Shape::RightRepeatSign));
    }

    #[test]
    fn test_empty_is_unknown() {
        let result = classify(&[], None);
        assert_eq!(result.signature, "");
        assert_eq!(result.shape, None);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_unmapped_signature_is_unknown() {
        let result = classify(&sequence(&[Shape::Dot]), None);
        assert_eq!(result.signature, "O");
        assert_eq!(result.shape, None);
    }

    #[test]
    fn test_unknown_component_is_ignored() {
        let result = classify(&sequence(&[Shape::ThinBarline, Shape::GClef, Shape::ThickBarline]), None);
        assert_eq!(result.signature, "NK");
        assert_eq!(result.shape, Some(Shape::FinalBarline));
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, kind::UNKNOWN_BAR_COMPONENT);
    }

    #[test]
    fn test_dot_outside_reference_row_is_skipped() {
        let row = ReferenceRow::new(0, 100);
        let mut components = sequence(&[Shape::ThinBarline, Shape::ThickBarline]);
        components.push(Arc::new(
            Glyph::new(0, Rectangle::new(30, 145, 4, 4))
                .with_id(9)
                .with_shape(Shape::Dot, Doubt::Classifier),
        ));

        assert_eq!(classify(&components, Some(row)).signature, "NK");
        assert_eq!(classify(&components, None).signature, "NKO");
    }

    #[test]
    fn test_bar_outside_reference_row_is_skipped() {
        let row = ReferenceRow::new(200, 300);
        let result = classify(&sequence(&[Shape::ThinBarline]), Some(row));
        assert_eq!(result.signature, "");
        assert_eq!(result.shape, None);
    }

    #[test]
    fn test_composite_letters() {
        assert_eq!(letter_for(Shape::BackToBackRepeatSign), Some("ONKNO"));
        assert_eq!(letter_for(Shape::RepeatDots), Some("O"));
        assert_eq!(letter_for(Shape::Stem), None);
    }

    fn component_for(letter: char) -> Shape {
        match letter {
            'N' => Shape::ThinBarline,
            'K' => Shape::ThickBarline,
            _ => Shape::Dot,
        }
    }

    fn spell(letters: &str) -> Vec<Arc<Glyph>> {
        letters
            .chars()
            .enumerate()
            .map(|(i, c)| component(i as u32 + 1, i as i32 * 10, component_for(c)))
            .collect()
    }

    #[test]
    fn test_every_signature_round_trips() {
        for (signature, shape) in SIGNATURES.iter() {
            let result = classify(&spell(signature), None);
            assert_eq!(result.signature, *signature);
            assert_eq!(result.shape, Some(*shape), "signature {}", signature);
            assert!(result.diagnostics.is_empty());

            // A repeated thick bar or dot collapses into one code
            if let Some(i) = signature.find(|c| c != 'N') {
                let mut doubled = signature.to_string();
                doubled.insert(i, signature.as_bytes()[i] as char);
                let result = classify(&spell(&doubled), None);
                assert_eq!(result.signature, *signature, "from {}", doubled);
                assert_eq!(result.shape, Some(*shape));
            }
        }
    }
}
