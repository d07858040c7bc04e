//! Display List for score rendering
//!
//! This module defines a surface that records draw commands instead of
//! painting them. The DisplayList contains all pre-calculated positions, so a
//! front end can paint without any layout calculation.

use serde::{Deserialize, Serialize};

use super::RenderSurface;
use crate::glyph::Shape;

/// A single recorded draw command
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayItem {
    /// Straight line (staff line, bar stick)
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },

    /// Music symbol centered on (x, y)
    Symbol {
        shape: Shape,
        x: f32,
        y: f32,
        /// Staff pitch position, for symbols drawn relative to a staff
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pitch: Option<i32>,
    },

    /// Recognized text within its box
    Text {
        value: String,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
}

/// Top-level display list containing all rendering information
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of recorded symbols of the given shape
    pub fn count_symbols(&self, wanted: Shape) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, DisplayItem::Symbol { shape, .. } if *shape == wanted))
            .count()
    }

    /// Serialize for a front end
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl RenderSurface for DisplayList {
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.items.push(DisplayItem::Line {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
        });
    }

    fn draw_symbol(&mut self, shape: Shape, center: (f32, f32), pitch: Option<i32>) {
        self.items.push(DisplayItem::Symbol {
            shape,
            x: center.0,
            y: center.1,
            pitch,
        });
    }

    fn draw_text(&mut self, value: &str, x: f32, y: f32, w: f32, h: f32) {
        self.items.push(DisplayItem::Text {
            value: value.to_string(),
            x,
            y,
            w,
            h,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_commands() {
        let mut list = DisplayList::new();
        list.draw_line((0.0, 0.0), (10.0, 0.0));
        list.draw_symbol(Shape::GClef, (5.0, 5.0), Some(2));
        assert_eq!(list.len(), 2);
        assert_eq!(list.count_symbols(Shape::GClef), 1);
    }

    #[test]
    fn test_json_tags() {
        let mut list = DisplayList::new();
        list.draw_symbol(Shape::TimeSixEight, (1.0, 2.0), None);
        let json = list.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"items":[{"type":"symbol","shape":"TIME_SIX_EIGHT","x":1.0,"y":2.0}]}"#
        );
    }
}
