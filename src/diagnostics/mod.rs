//! Diagnostics for recognition issues
//!
//! Generic diagnostic system that records why an entity could not be fully
//! recognized. Unclassifiable input, ignored components and rejected text
//! blobs all end up here rather than in an `Err`, so callers can still render
//! partial results or retry with more context.

use serde::{Deserialize, Serialize};

use crate::glyph::GlyphId;

/// Severity level for diagnostics
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// Stable identifiers of diagnostic kinds
pub mod kind {
    pub const UNKNOWN_BAR_COMPONENT: &str = "unknown_bar_component";
    pub const UNEXPECTED_SINGLE_COMPONENT: &str = "unexpected_single_component";
    pub const CENTER_BAND_COMPONENT: &str = "center_band_component";
    pub const NO_NUMERIC_VALUE: &str = "no_numeric_value";
    pub const TEXT_REJECTED: &str = "text_rejected";
}

/// A diagnostic attached to one or more glyphs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Kind identifier (see [`kind`])
    pub kind: String,
    /// Glyphs involved, possibly none
    pub glyphs: Vec<GlyphId>,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind: kind.into(),
            glyphs: Vec::new(),
            message: message.into(),
        }
    }

    pub fn warning(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, kind, message)
    }

    pub fn info(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, kind, message)
    }

    /// Attach a glyph
    pub fn with_glyph(mut self, glyph: GlyphId) -> Self {
        self.glyphs.push(glyph);
        self
    }
}

/// Collection of diagnostics
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create empty diagnostics
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a diagnostic, mirroring it to the log
    pub fn add(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            DiagnosticSeverity::Error | DiagnosticSeverity::Warning => {
                log::warn!("{}: {}", diagnostic.kind, diagnostic.message)
            }
            DiagnosticSeverity::Info => log::debug!("{}: {}", diagnostic.kind, diagnostic.message),
        }
        self.items.push(diagnostic);
    }

    /// Extend with multiple diagnostics
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Whether any diagnostic has the given kind
    pub fn has_kind(&self, kind: &str) -> bool {
        self.items.iter().any(|d| d.kind == kind)
    }

    /// Check if there are any diagnostics
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
