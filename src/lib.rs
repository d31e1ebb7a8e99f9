//! Exact fractions for frame rates and aspect ratios, with parsing from text, JSON and maps.

pub mod fraction;
pub mod parsing;

pub use fraction::{BaseInt, Fraction, FractionError};
