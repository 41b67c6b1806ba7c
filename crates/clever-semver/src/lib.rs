//! Semantic versioning library for npm/bower style module versions
//!
//! This crate provides version parsing, precedence ordering and the simple
//! comparisons (greater than, less than, equal) used when deciding whether an
//! installed module satisfies, conflicts with or duplicates a requested version.

mod comparator;
mod operator;
mod version;

pub use comparator::{is_wildcard, Comparator};
pub use operator::Operator;
pub use version::{Identifier, Version, VersionError};
