//! Engine core — types, strategy selection and synthesis, result
//! normalization.

pub mod normalizer;
pub mod synthesizer;
pub mod types;
