//! Sheet scale
//!
//! Every margin and threshold of the engine is expressed as a fraction of the
//! staff interline, so that the same constants work for any scan resolution.

use serde::{Deserialize, Serialize};

/// Number of working units per interline, measured once per sheet
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    interline: f64,
}

impl Scale {
    /// Create a scale from the measured interline (must be positive)
    pub fn new(interline: f64) -> Option<Self> {
        if interline.is_finite() && interline > 0.0 {
            Some(Self { interline })
        } else {
            None
        }
    }

    pub fn interline(&self) -> f64 {
        self.interline
    }

    /// Convert an interline fraction to working units, rounded
    pub fn to_pixels(&self, fraction: f64) -> i32 {
        (fraction * self.interline).round() as i32
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self { interline: 20.0 }
    }
}
