//! Tree passes over the score
//!
//! A pass is a value with one handler per node variant. Each handler tells
//! whether the traversal should descend into the children of the node; the
//! default handlers do nothing and descend. Siblings are always visited in
//! order, and a system handler sees its preceding sibling, already visited.
//!
//! Mutating passes implement [`ScoreVisitor`] and run through [`accept`];
//! read-only passes implement [`ScoreInspector`] and run through [`inspect`].

pub mod cleaner;
pub mod fixer;
pub mod painter;

pub use cleaner::ScoreCleaner;
pub use fixer::ScoreFixer;
pub use painter::SheetPainter;

use super::barline::Barline;
use super::core::{Measure, MeasureItem, Part, Score, Staff, System};
use super::time_signature::TimeSignature;
use crate::error::Result;

/// Outcome of a handler: `Ok(true)` to descend into children
pub type Visit = Result<bool>;

/// Pass that may modify the tree
pub trait ScoreVisitor {
    fn visit_score(&mut self, _score: &mut Score) -> Visit {
        Ok(true)
    }

    fn visit_system(&mut self, _system: &mut System, _previous: Option<&System>) -> Visit {
        Ok(true)
    }

    fn visit_part(&mut self, _part: &mut Part) -> Visit {
        Ok(true)
    }

    fn visit_staff(&mut self, _staff: &mut Staff) -> Visit {
        Ok(true)
    }

    /// Called once all children of the staff have been visited
    fn leave_staff(&mut self, _staff: &mut Staff) -> Result<()> {
        Ok(())
    }

    fn visit_measure(&mut self, _measure: &mut Measure) -> Visit {
        Ok(true)
    }

    fn visit_barline(&mut self, _barline: &mut Barline) -> Visit {
        Ok(true)
    }

    fn visit_time_signature(&mut self, _time_signature: &mut TimeSignature) -> Visit {
        Ok(true)
    }

    /// Any other measure item
    fn visit_item(&mut self, _item: &mut MeasureItem) -> Visit {
        Ok(true)
    }
}

/// Pass that only reads the tree
pub trait ScoreInspector {
    fn visit_score(&mut self, _score: &Score) -> bool {
        true
    }

    fn visit_system(&mut self, _system: &System, _previous: Option<&System>) -> bool {
        true
    }

    fn visit_part(&mut self, _part: &Part) -> bool {
        true
    }

    fn visit_staff(&mut self, _staff: &Staff) -> bool {
        true
    }

    fn visit_measure(&mut self, _measure: &Measure) -> bool {
        true
    }

    fn visit_barline(&mut self, _barline: &Barline) -> bool {
        true
    }

    fn visit_time_signature(&mut self, _time_signature: &TimeSignature) -> bool {
        true
    }

    fn visit_item(&mut self, _item: &MeasureItem) -> bool {
        true
    }
}

/// Run a mutating pass over the whole score
///
/// The first handler error aborts the pass.
pub fn accept<V: ScoreVisitor + ?Sized>(visitor: &mut V, score: &mut Score) -> Result<()> {
    if !visitor.visit_score(score)? {
        return Ok(());
    }

    for i in 0..score.systems.len() {
        let (before, rest) = score.systems.split_at_mut(i);
        let previous = before.last();
        accept_system(visitor, &mut rest[0], previous)?;
    }

    Ok(())
}

fn accept_system<V: ScoreVisitor + ?Sized>(visitor: &mut V, system: &mut System, previous: Option<&System>) -> Result<()> {
    if !visitor.visit_system(system, previous)? {
        return Ok(());
    }

    for part in &mut system.parts {
        if !visitor.visit_part(part)? {
            continue;
        }
        for staff in &mut part.staves {
            accept_staff(visitor, staff)?;
        }
    }

    Ok(())
}

fn accept_staff<V: ScoreVisitor + ?Sized>(visitor: &mut V, staff: &mut Staff) -> Result<()> {
    if !visitor.visit_staff(staff)? {
        return Ok(());
    }

    if let Some(barline) = staff.starting_barline.as_mut() {
        visitor.visit_barline(barline)?;
    }

    for measure in &mut staff.measures {
        if !visitor.visit_measure(measure)? {
            continue;
        }
        for item in &mut measure.items {
            accept_item(visitor, item)?;
        }
    }

    visitor.leave_staff(staff)
}

fn accept_item<V: ScoreVisitor + ?Sized>(visitor: &mut V, item: &mut MeasureItem) -> Result<()> {
    match item {
        MeasureItem::Barline(barline) => visitor.visit_barline(barline)?,
        MeasureItem::TimeSignature(time_signature) => visitor.visit_time_signature(time_signature)?,
        other => visitor.visit_item(other)?,
    };
    Ok(())
}

/// Run a read-only pass over the whole score
pub fn inspect<I: ScoreInspector + ?Sized>(inspector: &mut I, score: &Score) {
    if !inspector.visit_score(score) {
        return;
    }

    let mut previous: Option<&System> = None;
    for system in &score.systems {
        inspect_system(inspector, system, previous);
        previous = Some(system);
    }
}

fn inspect_system<I: ScoreInspector + ?Sized>(inspector: &mut I, system: &System, previous: Option<&System>) {
    if !inspector.visit_system(system, previous) {
        return;
    }

    for part in &system.parts {
        if !inspector.visit_part(part) {
            continue;
        }
        for staff in &part.staves {
            if !inspector.visit_staff(staff) {
                continue;
            }
            if let Some(barline) = &staff.starting_barline {
                inspector.visit_barline(barline);
            }
            for measure in &staff.measures {
                if !inspector.visit_measure(measure) {
                    continue;
                }
                for item in &measure.items {
                    match item {
                        MeasureItem::Barline(barline) => inspector.visit_barline(barline),
                        MeasureItem::TimeSignature(time_signature) => inspector.visit_time_signature(time_signature),
                        other => inspector.visit_item(other),
                    };
                }
            }
        }
    }
}
