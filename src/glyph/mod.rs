//! Glyph model shared by the classifiers and the score entities

pub mod core;
pub mod pool;
pub mod shape;

pub use self::core::{glyphs_center, Glyph, GlyphFeatures, GlyphId, GlyphKey, HorizontalSide};
pub use pool::GlyphPool;
pub use shape::{Doubt, Shape};
