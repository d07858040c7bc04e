//! Cleanup pass: drop every transitory result of a previous recognition run
//!
//! Measures keep only their bar lines, parts lose their duration
//! accumulators, systems forget which entities their glyphs were translated
//! into. Running the pass twice gives the same tree as running it once.

use super::{ScoreVisitor, Visit};
use crate::score::core::{Measure, Part, Score, System};

#[derive(Debug, Default)]
pub struct ScoreCleaner;

impl ScoreCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl ScoreVisitor for ScoreCleaner {
    fn visit_score(&mut self, score: &mut Score) -> Visit {
        log::debug!("Cleaning up score with {} systems", score.systems.len());
        Ok(true)
    }

    fn visit_system(&mut self, system: &mut System, _previous: Option<&System>) -> Visit {
        system.translations.clear();
        Ok(true)
    }

    fn visit_part(&mut self, part: &mut Part) -> Visit {
        part.reset_durations();
        Ok(true)
    }

    fn visit_measure(&mut self, measure: &mut Measure) -> Visit {
        measure.cleanup();
        Ok(false)
    }
}
