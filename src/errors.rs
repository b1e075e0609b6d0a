//! # Matcher Error Types Module
//!
//! This module defines the error type used when building matcher configuration
//! and inventory values. Matching and scoring themselves never fail for
//! well-typed input; only construction and validation report errors.

/// Custom error types for matcher construction and validation
#[derive(Debug, Clone, PartialEq)]
pub enum MatcherError {
    /// Threshold not finite or outside 0..=100
    InvalidThreshold(f64),
    /// Priority weights that are negative or sum above 1
    InvalidWeights(String),
    /// Inventory record without a usable name
    InvalidRecord(String),
    /// Similarity algorithm name that does not parse
    UnknownAlgorithm(String),
    /// Configuration value that does not parse
    InvalidConfig(String),
}

impl std::fmt::Display for MatcherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatcherError::InvalidThreshold(value) => {
                write!(f, "Invalid threshold: {value} (expected 0..=100)")
            }
            MatcherError::InvalidWeights(msg) => write!(f, "Invalid weights: {msg}"),
            MatcherError::InvalidRecord(msg) => write!(f, "Invalid inventory record: {msg}"),
            MatcherError::UnknownAlgorithm(name) => {
                write!(f, "Unknown similarity algorithm: {name}")
            }
            MatcherError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for MatcherError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            MatcherError::InvalidThreshold(120.0).to_string(),
            "Invalid threshold: 120 (expected 0..=100)"
        );
        assert_eq!(
            MatcherError::UnknownAlgorithm("soundex".to_string()).to_string(),
            "Unknown similarity algorithm: soundex"
        );
    }

    #[test]
    fn test_error_converts_into_anyhow() {
        let err: anyhow::Error = MatcherError::InvalidRecord("missing name".to_string()).into();
        assert!(err.to_string().contains("missing name"));
    }
}
