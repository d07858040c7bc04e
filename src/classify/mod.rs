//! Classification of composite entities from their physical components
//!
//! Both classifiers are pure functions over an ordered snapshot of glyphs.
//! Entities call them lazily and cache the outcome.

pub mod rational;
pub mod signature;

pub use rational::{decompose, numeric_value, Band, Decomposition, StaffGeometry};
pub use signature::{classify, letter_for, shape_for_signature, Classification, ReferenceRow};
