//! Version comparison utilities

use crate::{Operator, Version, VersionError};

/// Returns true for versions meaning "any version" (`*`, `x`, empty)
pub fn is_wildcard(version: &str) -> bool {
    matches!(version.trim(), "" | "*" | "x" | "X")
}

/// Comparator for comparing version strings
pub struct Comparator;

impl Comparator {
    /// Check if version1 > version2
    pub fn greater_than(version1: &str, version2: &str) -> Result<bool, VersionError> {
        Self::compare(version1, Operator::GreaterThan, version2)
    }

    /// Check if version1 >= version2
    pub fn greater_than_or_equal_to(version1: &str, version2: &str) -> Result<bool, VersionError> {
        Self::compare(version1, Operator::GreaterThanOrEqual, version2)
    }

    /// Check if version1 < version2
    pub fn less_than(version1: &str, version2: &str) -> Result<bool, VersionError> {
        Self::compare(version1, Operator::LessThan, version2)
    }

    /// Check if version1 <= version2
    pub fn less_than_or_equal_to(version1: &str, version2: &str) -> Result<bool, VersionError> {
        Self::compare(version1, Operator::LessThanOrEqual, version2)
    }

    /// Check if version1 == version2
    pub fn equal_to(version1: &str, version2: &str) -> Result<bool, VersionError> {
        Self::compare(version1, Operator::Equal, version2)
    }

    /// Check if version1 != version2
    pub fn not_equal_to(version1: &str, version2: &str) -> Result<bool, VersionError> {
        Self::compare(version1, Operator::NotEqual, version2)
    }

    /// Compare version1 to version2 using the given operator
    pub fn compare(version1: &str, operator: Operator, version2: &str) -> Result<bool, VersionError> {
        let left = Version::parse(version1)?;
        let right = Version::parse(version2)?;

        Ok(match operator {
            Operator::Equal => left == right,
            Operator::NotEqual => left != right,
            Operator::LessThan => left < right,
            Operator::LessThanOrEqual => left <= right,
            Operator::GreaterThan => left > right,
            Operator::GreaterThanOrEqual => left >= right,
        })
    }

    /// Compare using an operator given as a string (`>`, `<=`, `==`, ...)
    pub fn compare_str(version1: &str, operator: &str, version2: &str) -> Result<bool, VersionError> {
        Self::compare(version1, operator.parse()?, version2)
    }
}
