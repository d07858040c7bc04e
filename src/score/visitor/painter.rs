//! Render pass: draw the score onto a surface
//!
//! This pass never computes derived data. Entities whose cached values are
//! missing (no fix pass since their last change) are skipped with a warning.

use super::ScoreInspector;
use crate::renderers::{zoom_rect, RenderSurface, Zoom};
use crate::score::barline::Barline;
use crate::score::core::{MeasureItem, Score, Staff};
use crate::score::time_signature::TimeSignature;

pub struct SheetPainter<'a> {
    surface: &'a mut dyn RenderSurface,
    zoom: Zoom,
}

impl<'a> SheetPainter<'a> {
    pub fn new(surface: &'a mut dyn RenderSurface, zoom: Zoom) -> Self {
        Self { surface, zoom }
    }
}

impl ScoreInspector for SheetPainter<'_> {
    fn visit_score(&mut self, score: &Score) -> bool {
        log::debug!("Painting {} systems at zoom {}", score.systems.len(), self.zoom.ratio());
        true
    }

    fn visit_staff(&mut self, staff: &Staff) -> bool {
        if staff.lines.is_empty() {
            return false;
        }

        for line in &staff.lines {
            self.surface.draw_line(self.zoom.point(line.start), self.zoom.point(line.stop));
        }
        true
    }

    fn visit_barline(&mut self, barline: &Barline) -> bool {
        for stick in barline.sticks().filter(|s| s.is_bar()) {
            if let Some(line) = stick.line {
                self.surface.draw_line(self.zoom.point(line.start), self.zoom.point(line.stop));
            }
        }
        false
    }

    fn visit_time_signature(&mut self, time_signature: &TimeSignature) -> bool {
        let decomposition = match time_signature.cached_decomposition() {
            Some(decomposition) => decomposition,
            None => {
                log::warn!("Time signature painted before being fixed, skipped");
                return false;
            }
        };

        match decomposition.shape() {
            Some(shape) if shape.is_whole_time_signature() => {
                match time_signature.cached_center() {
                    Some(center) => self.surface.draw_symbol(shape, self.zoom.point(center), None),
                    None => log::warn!("Time signature center not computed, skipped"),
                }
            }
            Some(shape) => log::warn!("Weird time signature shape: {:?}", shape),
            None => {
                // Assume a multi-symbol signature
                let staff = time_signature.staff();
                for glyph in time_signature.glyphs() {
                    if let Some(shape) = glyph.shape {
                        let center = glyph.center();
                        let pitch = staff.pitch_position(center.y);
                        self.surface.draw_symbol(shape, self.zoom.point(center), Some(pitch));
                    }
                }
            }
        }
        false
    }

    fn visit_item(&mut self, item: &MeasureItem) -> bool {
        match item {
            MeasureItem::Clef(clef) => {
                self.surface
                    .draw_symbol(clef.shape, self.zoom.point(clef.glyph.center()), None);
            }
            MeasureItem::Chord(chord) => {
                for glyph in &chord.glyphs {
                    if let Some(shape) = glyph.shape {
                        self.surface.draw_symbol(shape, self.zoom.point(glyph.center()), None);
                    }
                }
            }
            MeasureItem::Text(text) => {
                let (x, y, w, h) = zoom_rect(&self.zoom, &text.glyph.bounds);
                self.surface.draw_text(&text.value, x, y, w, h);
            }
            MeasureItem::Barline(_) | MeasureItem::TimeSignature(_) => {}
        }
        false
    }
}
