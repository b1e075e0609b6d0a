//! # Similarity Module
//!
//! String similarity strategies used by the fuzzy matcher. Every strategy is
//! symmetric, returns a score on the 0..=100 scale, gives 100 for identical
//! strings and degrades smoothly with edit distance.
//!
//! ## Strategies
//!
//! - **ratio**: normalized Levenshtein similarity of the whole strings
//! - **partial_ratio**: best ratio of the shorter string against every
//!   same-length window of the longer one
//! - **token_sort_ratio**: ratio after sorting whitespace tokens, so
//!   `"pepper bell"` and `"bell pepper"` are identical
//! - **token_set_ratio**: compares the shared token set against each side's
//!   remainder; a string whose tokens are a subset of the other scores 100
//! - **weighted**: the best of the above, with the token and partial variants
//!   scaled down so they only win when clearly better
//!
//! The matcher takes any [`SimilarityScorer`], so callers can plug in their
//! own strategy and validate it against a labeled set (see [`crate::accuracy`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use strsim::normalized_levenshtein;

use crate::errors::MatcherError;

/// A symmetric string similarity on the 0..=100 scale
pub trait SimilarityScorer: Send + Sync {
    /// Similarity between two already-normalized strings
    fn score(&self, left: &str, right: &str) -> f64;

    /// Short identifier used in logs and reports
    fn name(&self) -> &str;
}

/// Built-in similarity strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityAlgorithm {
    /// Plain normalized Levenshtein ratio
    Ratio,
    /// Best window of the longer string
    PartialRatio,
    /// Ratio of the token-sorted strings
    #[default]
    TokenSort,
    /// Shared-token-set comparison
    TokenSet,
    /// Best of all strategies with penalties for the lenient ones
    Weighted,
}

impl SimilarityAlgorithm {
    /// Every built-in strategy, in report order
    pub const ALL: [SimilarityAlgorithm; 5] = [
        SimilarityAlgorithm::Ratio,
        SimilarityAlgorithm::PartialRatio,
        SimilarityAlgorithm::TokenSort,
        SimilarityAlgorithm::TokenSet,
        SimilarityAlgorithm::Weighted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SimilarityAlgorithm::Ratio => "ratio",
            SimilarityAlgorithm::PartialRatio => "partial_ratio",
            SimilarityAlgorithm::TokenSort => "token_sort_ratio",
            SimilarityAlgorithm::TokenSet => "token_set_ratio",
            SimilarityAlgorithm::Weighted => "weighted",
        }
    }
}

impl SimilarityScorer for SimilarityAlgorithm {
    fn score(&self, left: &str, right: &str) -> f64 {
        match self {
            SimilarityAlgorithm::Ratio => ratio(left, right),
            SimilarityAlgorithm::PartialRatio => partial_ratio(left, right),
            SimilarityAlgorithm::TokenSort => token_sort_ratio(left, right),
            SimilarityAlgorithm::TokenSet => token_set_ratio(left, right),
            SimilarityAlgorithm::Weighted => weighted_ratio(left, right),
        }
    }

    fn name(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for SimilarityAlgorithm {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ratio" | "levenshtein" => Ok(SimilarityAlgorithm::Ratio),
            "partial" | "partial_ratio" => Ok(SimilarityAlgorithm::PartialRatio),
            "token_sort" | "token_sort_ratio" => Ok(SimilarityAlgorithm::TokenSort),
            "token_set" | "token_set_ratio" => Ok(SimilarityAlgorithm::TokenSet),
            "weighted" | "wratio" => Ok(SimilarityAlgorithm::Weighted),
            _ => Err(MatcherError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl std::fmt::Display for SimilarityAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized Levenshtein similarity scaled to 0..=100
///
/// # Examples
///
/// ```rust
/// use pantry_matcher::similarity::ratio;
///
/// assert_eq!(ratio("garlic", "garlic"), 100.0);
/// assert!(ratio("carrot", "carrots") > 80.0);
/// ```
pub fn ratio(left: &str, right: &str) -> f64 {
    normalized_levenshtein(left, right) * 100.0
}

/// Best ratio of the shorter string against windows of the longer one
pub fn partial_ratio(left: &str, right: &str) -> f64 {
    let (shorter, longer) = if left.chars().count() <= right.chars().count() {
        (left, right)
    } else {
        (right, left)
    };

    let short_len = shorter.chars().count();
    let long_chars: Vec<char> = longer.chars().collect();

    if short_len == 0 {
        return if long_chars.is_empty() { 100.0 } else { 0.0 };
    }
    if short_len == long_chars.len() {
        return ratio(shorter, longer);
    }

    let mut best = 0.0_f64;
    for window in long_chars.windows(short_len) {
        let candidate: String = window.iter().collect();
        best = best.max(ratio(shorter, &candidate));
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// Ratio after sorting the whitespace-separated tokens of both strings
pub fn token_sort_ratio(left: &str, right: &str) -> f64 {
    ratio(&sorted_tokens(left), &sorted_tokens(right))
}

/// Shared-token-set similarity
///
/// Scores 100 whenever the strings share at least one token and the tokens
/// of one side are a subset of the other.
pub fn token_set_ratio(left: &str, right: &str) -> f64 {
    let left_tokens: BTreeSet<&str> = left.split_whitespace().collect();
    let right_tokens: BTreeSet<&str> = right.split_whitespace().collect();

    if left_tokens.is_empty() || right_tokens.is_empty() {
        return if left_tokens.is_empty() && right_tokens.is_empty() {
            100.0
        } else {
            0.0
        };
    }

    let shared: Vec<&str> = left_tokens.intersection(&right_tokens).copied().collect();
    let only_left: Vec<&str> = left_tokens.difference(&right_tokens).copied().collect();
    let only_right: Vec<&str> = right_tokens.difference(&left_tokens).copied().collect();

    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100.0;
    }

    let shared = shared.join(" ");
    let combined_left = join_non_empty(&shared, &only_left.join(" "));
    let combined_right = join_non_empty(&shared, &only_right.join(" "));

    ratio(&shared, &combined_left)
        .max(ratio(&shared, &combined_right))
        .max(ratio(&combined_left, &combined_right))
}

/// Best-of strategy with penalties for the lenient variants
pub fn weighted_ratio(left: &str, right: &str) -> f64 {
    let base = ratio(left, right);

    let left_len = left.chars().count();
    let right_len = right.chars().count();
    if left_len == 0 || right_len == 0 {
        return base;
    }

    let length_ratio = left_len.max(right_len) as f64 / left_len.min(right_len) as f64;
    if length_ratio < 1.5 {
        return base
            .max(token_sort_ratio(left, right) * 0.95)
            .max(token_set_ratio(left, right) * 0.95);
    }

    let partial_scale = if length_ratio < 8.0 { 0.9 } else { 0.6 };
    base.max(partial_ratio(left, right) * partial_scale)
        .max(token_set_ratio(left, right) * 0.95 * partial_scale)
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_non_empty(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second.to_string(),
        (false, true) => first.to_string(),
        (false, false) => format!("{first} {second}"),
    }
}
