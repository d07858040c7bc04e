//! Engine configuration
//!
//! Constants are grouped by concern and can be loaded from YAML. Missing
//! keys fall back to their defaults, so a configuration file only needs to
//! mention the values it overrides.

pub mod scale;

pub use scale::Scale;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// All tunable constants of the engine
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Constants {
    pub text: TextConstants,
    pub layout: LayoutConstants,
}

/// Constants of the border text detection
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TextConstants {
    /// Maximum font size, in interline fraction
    pub max_font_size: f64,
    /// Minimum aspect of chars (height / width)
    pub min_aspect: f64,
    /// Maximum aspect of chars (height / width)
    pub max_aspect: f64,
    /// Margin above the first staff, in interline fraction
    pub staff_margin_above: f64,
    /// Margin below the last staff, in interline fraction
    pub staff_margin_below: f64,
    /// Maximum horizontal gap between glyphs of the same blob, in interline fraction
    pub blob_max_dx: f64,
    /// Maximum vertical gap between glyphs of the same blob, in interline fraction
    pub blob_max_dy: f64,
    /// Recognizer call budget, in milliseconds
    pub recognizer_timeout_ms: u64,
}

impl Default for TextConstants {
    fn default() -> Self {
        Self {
            max_font_size: 3.0,
            min_aspect: 0.5,
            max_aspect: 3.0,
            staff_margin_above: 1.0,
            staff_margin_below: 3.0,
            blob_max_dx: 1.5,
            blob_max_dy: 0.5,
            recognizer_timeout_ms: 5_000,
        }
    }
}

/// Constants of the score display layout
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LayoutConstants {
    /// Abscissa of the first system display origin
    pub score_init_x: i32,
    /// Ordinate of the first system display origin
    pub score_init_y: i32,
    /// Horizontal gap between two consecutive systems
    pub inter_system: i32,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            score_init_x: 0,
            score_init_y: 0,
            inter_system: 100,
        }
    }
}

impl Constants {
    /// Parse constants from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let constants: Constants = serde_yaml::from_str(yaml)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Load constants from a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Check value consistency
    pub fn validate(&self) -> Result<()> {
        let t = &self.text;
        if t.min_aspect > t.max_aspect {
            return Err(EngineError::Config(format!(
                "min_aspect {} exceeds max_aspect {}",
                t.min_aspect, t.max_aspect
            )));
        }
        if t.max_font_size <= 0.0 {
            return Err(EngineError::Config("max_font_size must be positive".to_string()));
        }
        if t.blob_max_dx < 0.0 || t.blob_max_dy < 0.0 {
            return Err(EngineError::Config("blob gaps cannot be negative".to_string()));
        }
        if self.layout.inter_system < 0 {
            return Err(EngineError::Config("inter_system cannot be negative".to_string()));
        }
        Ok(())
    }
}
