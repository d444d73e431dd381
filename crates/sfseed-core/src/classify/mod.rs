//! # Field Classification
//!
//! Decides, from a field descriptor alone, whether a field is generated,
//! resolved as a reference, or left out.

pub mod rules;

pub use rules::{classify_field, FieldClass};
