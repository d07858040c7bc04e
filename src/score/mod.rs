//! Score model and the passes that keep it consistent

pub mod barline;
pub mod cache;
pub mod core;
pub mod time_signature;
pub mod visitor;

pub use self::core::{
    Chord, Clef, Measure, MeasureItem, NodeKind, Part, Score, Staff, System, SystemBoundary, TextItem,
};
pub use barline::Barline;
pub use cache::{CacheState, Cached};
pub use time_signature::TimeSignature;
pub use visitor::{accept, inspect, ScoreCleaner, ScoreFixer, ScoreInspector, ScoreVisitor, SheetPainter, Visit};

use crate::config::LayoutConstants;
use crate::error::Result;
use crate::renderers::{RenderSurface, Zoom};

impl Score {
    /// Drop transitory recognition results
    pub fn cleanup(&mut self) -> Result<()> {
        accept(&mut ScoreCleaner::new(), self)
    }

    /// Recompute display origins, measure ids and entity caches
    pub fn fix(&mut self, layout: &LayoutConstants) -> Result<()> {
        accept(&mut ScoreFixer::new(layout.clone()), self)
    }

    /// Draw the score onto a surface
    pub fn render(&self, surface: &mut dyn RenderSurface, zoom: Zoom) {
        inspect(&mut SheetPainter::new(surface, zoom), self);
    }
}
