//! Border text detection
//!
//! Text found around a system (titles, tempo marks, lyrics lines, part
//! names) is retrieved by handing the glyph blobs of each border zone
//! directly to the text recognizer, bypassing the generic shape classifier:
//!
//! 1. build the north, south, west and east zones of the system;
//! 2. keep the glyphs of each zone that could be text, and cluster them into
//!    blobs (one blob per expected line);
//! 3. submit each blob to the recognizer and check the answer against size
//!    and aspect heuristics;
//! 4. register each accepted blob as a permanent `Text` glyph.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::blob::{cluster, Blob};
use super::recognizer::{BoundedRecognizer, CancellationToken, RecognizerError, TextLine, TextRecognizer};
use super::regions::{build_regions, Region, ZoneSide};
use crate::config::{Scale, TextConstants};
use crate::diagnostics::{kind, Diagnostic, Diagnostics};
use crate::glyph::{Doubt, Glyph, GlyphPool, HorizontalSide, Shape};
use crate::score::{NodeKind, System};

/// Why a blob was not accepted as text
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Rejection {
    #[error("no line found")]
    NoLine,
    #[error("more than 1 line found ({0})")]
    SeveralLines(usize),
    #[error("recognizer found nothing")]
    EmptyLine,
    #[error("blank text value")]
    BlankValue,
    #[error("font size {size} exceeds maximum {max}")]
    FontTooLarge { size: f64, max: f64 },
    #[error("char aspect {aspect} lower than minimum {min}")]
    AspectTooLow { aspect: f64, min: f64 },
    #[error("char aspect {aspect} exceeds maximum {max}")]
    AspectTooHigh { aspect: f64, max: f64 },
    #[error(transparent)]
    Recognizer(#[from] RecognizerError),
}

/// A blob accepted as a text line
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedText {
    /// Permanent glyph, shaped as `Text` by algorithm
    pub glyph: Arc<Glyph>,
    pub line: TextLine,
    pub side: ZoneSide,
}

/// Validation thresholds, in working units
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LineLimits {
    pub max_font_size: f64,
    pub min_aspect: f64,
    pub max_aspect: f64,
}

impl LineLimits {
    pub fn new(scale: &Scale, constants: &TextConstants) -> Self {
        Self {
            max_font_size: scale.to_pixels(constants.max_font_size) as f64,
            min_aspect: constants.min_aspect,
            max_aspect: constants.max_aspect,
        }
    }

    /// Accept the recognizer answer for one blob, or tell why not
    pub fn check(&self, mut lines: Vec<TextLine>) -> Result<TextLine, Rejection> {
        if lines.is_empty() {
            return Err(Rejection::NoLine);
        }
        if lines.len() > 1 {
            return Err(Rejection::SeveralLines(lines.len()));
        }

        let line = lines.remove(0);
        if line.bounds.height == 0 || line.bounds.width == 0 {
            return Err(Rejection::EmptyLine);
        }
        if line.value.trim().is_empty() {
            return Err(Rejection::BlankValue);
        }

        let size = line.font_size as f64;
        if size > self.max_font_size {
            return Err(Rejection::FontTooLarge {
                size,
                max: self.max_font_size,
            });
        }

        let aspect = line.aspect();
        if aspect < self.min_aspect {
            return Err(Rejection::AspectTooLow {
                aspect,
                min: self.min_aspect,
            });
        }
        if aspect > self.max_aspect {
            return Err(Rejection::AspectTooHigh {
                aspect,
                max: self.max_aspect,
            });
        }

        Ok(line)
    }
}

pub struct TextBorderPattern {
    scale: Scale,
    constants: TextConstants,
    limits: LineLimits,
    recognizer: BoundedRecognizer,
    language: String,
}

impl TextBorderPattern {
    pub fn new(
        scale: Scale,
        constants: TextConstants,
        recognizer: Arc<dyn TextRecognizer>,
        language: impl Into<String>,
    ) -> Self {
        let timeout = Duration::from_millis(constants.recognizer_timeout_ms);
        Self {
            limits: LineLimits::new(&scale, &constants),
            recognizer: BoundedRecognizer::new(recognizer, timeout),
            scale,
            constants,
            language: language.into(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.recognizer = self.recognizer.with_cancellation(cancel);
        self
    }

    pub fn limits(&self) -> &LineLimits {
        &self.limits
    }

    /// Whether a glyph may be part of a text blob in this region
    pub fn check_candidate(&self, region: &Region, pool: &GlyphPool, glyph: &Glyph) -> bool {
        if !region.polygon.contains_rect(&glyph.bounds) {
            return false;
        }

        // Members of a compound are represented by the compound
        if !pool.is_active(glyph.id) {
            return false;
        }

        // Leave human decisions and already recognized text alone
        if glyph.is_manual() || glyph.shape == Some(Shape::Text) {
            return false;
        }

        if glyph.is_stem() {
            return false;
        }

        // Glyphs stuck to a stem are not likely to be text items
        HorizontalSide::ALL.iter().all(|side| glyph.stem(*side).is_none())
    }

    /// Blobs of candidate glyphs within a region
    pub fn blobs(&self, region: &Region, pool: &GlyphPool) -> Vec<Blob> {
        let candidates: Vec<_> = pool
            .sorted_by_x()
            .into_iter()
            .filter(|g| self.check_candidate(region, pool, g))
            .collect();

        cluster(
            &candidates,
            self.scale.to_pixels(self.constants.blob_max_dx),
            self.scale.to_pixels(self.constants.blob_max_dy),
        )
    }

    /// Submit a blob to the recognizer, promoting it to text on success
    pub fn evaluate_blob(
        &self,
        side: ZoneSide,
        blob: &Blob,
        pool: &mut GlyphPool,
        diagnostics: &mut Diagnostics,
    ) -> Option<ValidatedText> {
        if !self.recognizer.is_available() {
            log::debug!("No text recognizer, {} left unvalidated", blob);
            return None;
        }

        let answer = self
            .recognizer
            .recognize(blob.region(), &self.language)
            .map_err(Rejection::from)
            .and_then(|lines| self.limits.check(lines));

        let line = match answer {
            Ok(line) => line,
            Err(rejection) => {
                log::debug!("{} {} rejected: {}", side, blob, rejection);
                let mut diag = Diagnostic::info(kind::TEXT_REJECTED, format!("{} blob: {}", side, rejection));
                diag.glyphs = blob.glyphs.iter().map(|g| g.id).collect();
                diagnostics.add(diag);
                return None;
            }
        };

        let mut compound = blob.compound()?.with_shape(Shape::Text, Doubt::Algorithm);
        compound.features = Some(compound.compute_features());
        let glyph = pool.register_compound(compound, &blob.glyphs);
        log::debug!("{} {} => \"{}\"", side, glyph.id_string(), line.value);

        Some(ValidatedText { glyph, line, side })
    }

    /// Evaluate every blob of a region
    pub fn evaluate_region(
        &self,
        region: &Region,
        pool: &mut GlyphPool,
        diagnostics: &mut Diagnostics,
    ) -> Vec<ValidatedText> {
        let blobs = self.blobs(region, pool);
        blobs
            .iter()
            .filter_map(|blob| self.evaluate_blob(region.side, blob, pool, diagnostics))
            .collect()
    }

    /// Run the detection on the four border zones of a system
    pub fn run(&self, system: &mut System, diagnostics: &mut Diagnostics) -> Vec<ValidatedText> {
        let regions = match &system.boundary {
            Some(boundary) => build_regions(boundary, &self.scale, &self.constants),
            None => {
                log::debug!("system#{} has no boundary, no border text", system.id);
                return Vec::new();
            }
        };

        let mut texts = Vec::new();
        for region in &regions {
            texts.extend(self.evaluate_region(region, &mut system.glyphs, diagnostics));
        }

        for text in &texts {
            system.add_translation(text.glyph.id, NodeKind::Text);
        }

        log::info!("system#{}: {} border text line(s)", system.id, texts.len());
        texts
    }
}
