//! Optical music recognition core
//!
//! Classification of barlines and time signatures from their glyph
//! components, detection of text lines around systems, and the tree passes
//! (cleanup, fix, render) that keep a recognized score consistent.

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod renderers;
pub mod score;
pub mod text;

// Re-export commonly used types
pub use config::{Constants, LayoutConstants, Scale, TextConstants};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{EngineError, Result};
pub use glyph::{Doubt, Glyph, GlyphId, GlyphPool, Shape};
pub use score::{Barline, Score, System, TimeSignature};
