//! Fix pass: compute display origins and measure ids
//!
//! Origins and ids depend on the preceding sibling, so systems, staves and
//! measures are processed strictly in order. Once computed, the derived data
//! of bar lines and time signatures is warmed up so that read-only consumers
//! find it ready.

use super::{ScoreVisitor, Visit};
use crate::config::LayoutConstants;
use crate::error::{EngineError, Result};
use crate::geometry::Point;
use crate::score::barline::Barline;
use crate::score::core::{Measure, Score, Staff, System};
use crate::score::time_signature::TimeSignature;

#[derive(Debug)]
pub struct ScoreFixer {
    layout: LayoutConstants,
    // Data of the system being visited
    system_origin: Point,
    system_top: i32,
    system_first_id: usize,
    measure_counter: usize,
}

impl ScoreFixer {
    pub fn new(layout: LayoutConstants) -> Self {
        Self {
            layout,
            system_origin: Point::default(),
            system_top: 0,
            system_first_id: 0,
            measure_counter: 0,
        }
    }
}

impl ScoreVisitor for ScoreFixer {
    fn visit_score(&mut self, score: &mut Score) -> Visit {
        log::info!("Computing score with {} systems", score.systems.len());
        Ok(true)
    }

    fn visit_system(&mut self, system: &mut System, previous: Option<&System>) -> Visit {
        let (origin, first_id) = match previous {
            // Very first system in the score
            None => (Point::new(self.layout.score_init_x, self.layout.score_init_y), 0),
            Some(prev) => {
                let prev_origin = prev.origin.ok_or(EngineError::MissingOrigin {
                    system: system.id,
                    previous: prev.id,
                })?;
                let origin = prev_origin.translated(prev.dimension.width - 1 + self.layout.inter_system, 0);
                (origin, prev.last_measure_id().unwrap_or(0))
            }
        };

        system.origin = Some(origin);
        system.first_measure_id = Some(first_id);

        self.system_origin = origin;
        self.system_top = system.top_left.y;
        self.system_first_id = first_id;

        log::debug!("system#{} origin={:?} first_measure_id={}", system.id, origin, first_id);
        Ok(true)
    }

    fn visit_staff(&mut self, staff: &mut Staff) -> Visit {
        staff.display_origin = Some(Point::new(
            self.system_origin.x,
            self.system_origin.y + (staff.top_left.y - self.system_top),
        ));
        staff.first_measure_id = Some(self.system_first_id);
        staff.last_measure_id = Some(self.system_first_id);
        self.measure_counter = self.system_first_id;
        Ok(true)
    }

    fn leave_staff(&mut self, staff: &mut Staff) -> Result<()> {
        staff.last_measure_id = Some(self.measure_counter);
        log::debug!(
            "staff#{} origin={:?} measures {:?}..{:?}",
            staff.id,
            staff.display_origin,
            staff.first_measure_id,
            staff.last_measure_id
        );
        Ok(())
    }

    fn visit_measure(&mut self, measure: &mut Measure) -> Visit {
        self.measure_counter += 1;
        measure.id = Some(self.measure_counter);
        Ok(true)
    }

    fn visit_barline(&mut self, barline: &mut Barline) -> Visit {
        barline.shape();
        barline.center();
        Ok(false)
    }

    fn visit_time_signature(&mut self, time_signature: &mut TimeSignature) -> Visit {
        time_signature.decomposition();
        time_signature.center();
        Ok(false)
    }
}
