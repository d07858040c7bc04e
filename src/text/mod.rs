//! Detection of text around systems

pub mod blob;
pub mod pattern;
pub mod recognizer;
pub mod regions;

pub use blob::{cluster, Blob};
pub use pattern::{LineLimits, Rejection, TextBorderPattern, ValidatedText};
pub use recognizer::{BoundedRecognizer, CancellationToken, PixelRegion, RecognizerError, TextLine, TextRecognizer};
pub use regions::{build_regions, Region, ZoneSide};
