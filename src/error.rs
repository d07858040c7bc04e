//! Error types for the recognition core
//!
//! Unclassifiable input is not an error: classification and decomposition
//! report `None`/`Partial` results together with diagnostics. Only structural
//! inconsistencies, broken pass dependencies and configuration failures are
//! surfaced through `EngineError`.

use thiserror::Error;

use crate::glyph::GlyphId;

/// Top-level error type of the crate
#[derive(Debug, Error)]
pub enum EngineError {
    /// Components coming from different structural groups were combined
    #[error("structural mismatch in {entity}: glyph #{glyph} belongs to system {found}, expected system {expected}")]
    StructuralMismatch {
        entity: &'static str,
        glyph: GlyphId,
        expected: usize,
        found: usize,
    },

    /// A system could not be positioned because its predecessor has no origin
    #[error("system {system} cannot be fixed: previous system {previous} has no origin")]
    MissingOrigin { system: usize, previous: usize },

    /// Invalid configuration values
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration could not be parsed
    #[error("configuration parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
