//! # Matcher Configuration Module
//!
//! This module defines the configuration surface of the matching engine:
//! the similarity threshold, the similarity algorithm, the priority weights
//! and the threshold fallback policy used when a search comes back empty.
//!
//! The engine never reads configuration on its own. Callers build a
//! [`MatcherConfig`] once (usually through [`MatcherConfig::from_env`]) and
//! pass the values explicitly into every matching and scoring call.

use serde::{Deserialize, Serialize};

use crate::errors::MatcherError;
use crate::similarity::SimilarityAlgorithm;

// Constants for matcher configuration
pub const DEFAULT_THRESHOLD: f64 = 80.0;
pub const MIN_THRESHOLD: f64 = 0.0;
pub const MAX_THRESHOLD: f64 = 100.0;
pub const DEFAULT_PANTRY_WEIGHT: f64 = 0.5;
pub const DEFAULT_COMMISSARY_WEIGHT: f64 = 0.3;
pub const DEFAULT_AVAILABILITY_WEIGHT: f64 = 0.2;
pub const DEFAULT_FALLBACK_STEP: f64 = 5.0;
pub const DEFAULT_FALLBACK_FLOOR: f64 = 60.0;
pub const MIN_FALLBACK_STEP: f64 = 0.1;

// Environment variable names
pub const ENV_THRESHOLD: &str = "FUZZY_MATCH_THRESHOLD";
pub const ENV_ALGORITHM: &str = "FUZZY_MATCH_ALGORITHM";
pub const ENV_FALLBACK_STEP: &str = "FALLBACK_THRESHOLD_STEP";
pub const ENV_FALLBACK_FLOOR: &str = "FALLBACK_THRESHOLD_FLOOR";

/// Similarity threshold on the 0..=100 scale
///
/// A score matches when it is greater than or equal to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// Validate and wrap a raw threshold value
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pantry_matcher::config::Threshold;
    ///
    /// let threshold = Threshold::new(85.0)?;
    /// assert!(threshold.is_met(85.0));
    /// assert!(!threshold.is_met(84.9));
    /// assert!(Threshold::new(101.0).is_err());
    /// # Ok::<(), pantry_matcher::errors::MatcherError>(())
    /// ```
    pub fn new(value: f64) -> Result<Self, MatcherError> {
        if !value.is_finite() || !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&value) {
            return Err(MatcherError::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether a similarity score clears this threshold
    pub fn is_met(self, score: f64) -> bool {
        score >= self.0
    }

    /// Lower the threshold by `step`, never going below `floor`
    pub fn lowered_by(self, step: f64, floor: Threshold) -> Threshold {
        Threshold((self.0 - step).max(floor.0).max(MIN_THRESHOLD))
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = MatcherError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Threshold::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Weights of the recipe priority score
///
/// `priority = pantry × pantry_share + commissary × commissary_share
///           + availability × (pantry_share + commissary_share)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the pantry share
    pub pantry: f64,
    /// Weight of the commissary share
    pub commissary: f64,
    /// Weight of the overall availability share
    pub availability: f64,
}

impl ScoreWeights {
    /// Build validated weights
    ///
    /// Weights must be non-negative (so the score never decreases when more
    /// ingredients are available) and sum to at most 1 (so the score stays
    /// within 0..=1).
    pub fn new(pantry: f64, commissary: f64, availability: f64) -> Result<Self, MatcherError> {
        let weights = [pantry, commissary, availability];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(MatcherError::InvalidWeights(format!(
                "weights must be non-negative, got {pantry}/{commissary}/{availability}"
            )));
        }
        let sum: f64 = weights.iter().sum();
        if sum > 1.0 + 1e-9 {
            return Err(MatcherError::InvalidWeights(format!(
                "weights must sum to at most 1, got {sum}"
            )));
        }
        Ok(Self {
            pantry,
            commissary,
            availability,
        })
    }

    /// Weighted priority for the given counts; 0 for an empty recipe
    pub fn priority(&self, pantry_count: usize, commissary_count: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        let pantry_share = pantry_count as f64 / total;
        let commissary_share = commissary_count as f64 / total;
        self.pantry * pantry_share
            + self.commissary * commissary_share
            + self.availability * (pantry_share + commissary_share)
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            pantry: DEFAULT_PANTRY_WEIGHT,
            commissary: DEFAULT_COMMISSARY_WEIGHT,
            availability: DEFAULT_AVAILABILITY_WEIGHT,
        }
    }
}

/// Retry policy for searches that find nothing in the inventories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackPolicy {
    /// Points removed from the threshold on each retry
    pub step: f64,
    /// Lowest threshold ever tried
    pub floor: Threshold,
}

impl FallbackPolicy {
    pub fn new(step: f64, floor: Threshold) -> Result<Self, MatcherError> {
        if !step.is_finite() || step < MIN_FALLBACK_STEP {
            return Err(MatcherError::InvalidConfig(format!(
                "fallback step must be at least {MIN_FALLBACK_STEP}, got {step}"
            )));
        }
        Ok(Self { step, floor })
    }
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            step: DEFAULT_FALLBACK_STEP,
            floor: Threshold(DEFAULT_FALLBACK_FLOOR),
        }
    }
}

/// Configuration structure for ingredient matching and recipe scoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum similarity for an inventory match
    pub fuzzy_threshold: Threshold,
    /// Similarity strategy used by the matcher
    pub algorithm: SimilarityAlgorithm,
    /// Priority score weights
    pub weights: ScoreWeights,
    /// Threshold retry policy for empty searches
    pub fallback: FallbackPolicy,
}

impl MatcherConfig {
    /// Read configuration from the process environment
    ///
    /// Unset variables keep their defaults; set but unparsable variables are
    /// reported as errors.
    pub fn from_env() -> Result<Self, MatcherError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MatcherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_THRESHOLD) {
            config.fuzzy_threshold = Threshold::new(parse_number(ENV_THRESHOLD, &raw)?)?;
        }
        if let Some(raw) = lookup(ENV_ALGORITHM) {
            config.algorithm = raw.parse()?;
        }

        let step = match lookup(ENV_FALLBACK_STEP) {
            Some(raw) => parse_number(ENV_FALLBACK_STEP, &raw)?,
            None => config.fallback.step,
        };
        let floor = match lookup(ENV_FALLBACK_FLOOR) {
            Some(raw) => Threshold::new(parse_number(ENV_FALLBACK_FLOOR, &raw)?)?,
            None => config.fallback.floor,
        };
        config.fallback = FallbackPolicy::new(step, floor)?;

        Ok(config)
    }
}

fn parse_number(key: &str, raw: &str) -> Result<f64, MatcherError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| MatcherError::InvalidConfig(format!("{key}={raw} is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(100.0).is_ok());
        assert_eq!(
            Threshold::new(-1.0),
            Err(MatcherError::InvalidThreshold(-1.0))
        );
        assert!(Threshold::new(f64::NAN).is_err());
        assert!(Threshold::new(100.5).is_err());
    }

    #[test]
    fn test_threshold_lowering_respects_floor() {
        let floor = Threshold::new(60.0).unwrap();
        let threshold = Threshold::new(68.0).unwrap();
        assert_eq!(threshold.lowered_by(5.0, floor).value(), 63.0);
        assert_eq!(threshold.lowered_by(10.0, floor).value(), 60.0);
    }

    #[test]
    fn test_default_priority_weights() {
        let weights = ScoreWeights::default();
        // 10 ingredients: 5 pantry, 2 commissary, 3 store
        let score = weights.priority(5, 2, 10);
        assert!((score - 0.45).abs() < 1e-9);
        assert_eq!(weights.priority(0, 0, 0), 0.0);
        assert!((weights.priority(4, 0, 4) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_weights_validation() {
        assert!(ScoreWeights::new(0.6, 0.3, 0.1).is_ok());
        assert!(ScoreWeights::new(0.6, 0.3, 0.2).is_err());
        assert!(ScoreWeights::new(-0.1, 0.3, 0.2).is_err());
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = MatcherConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, MatcherConfig::default());
        assert_eq!(config.fuzzy_threshold.value(), 80.0);
        assert_eq!(config.algorithm, SimilarityAlgorithm::TokenSort);
    }

    #[test]
    fn test_config_from_lookup_overrides() {
        let config = MatcherConfig::from_lookup(lookup_from(&[
            (ENV_THRESHOLD, "92"),
            (ENV_ALGORITHM, "token_set_ratio"),
            (ENV_FALLBACK_STEP, "10"),
            (ENV_FALLBACK_FLOOR, "50"),
        ]))
        .unwrap();

        assert_eq!(config.fuzzy_threshold.value(), 92.0);
        assert_eq!(config.algorithm, SimilarityAlgorithm::TokenSet);
        assert_eq!(config.fallback.step, 10.0);
        assert_eq!(config.fallback.floor.value(), 50.0);
    }

    #[test]
    fn test_config_from_lookup_rejects_garbage() {
        assert!(MatcherConfig::from_lookup(lookup_from(&[(ENV_THRESHOLD, "high")])).is_err());
        assert!(MatcherConfig::from_lookup(lookup_from(&[(ENV_THRESHOLD, "150")])).is_err());
        assert!(MatcherConfig::from_lookup(lookup_from(&[(ENV_ALGORITHM, "soundex")])).is_err());
        assert!(MatcherConfig::from_lookup(lookup_from(&[(ENV_FALLBACK_STEP, "0")])).is_err());
        assert!(MatcherConfig::from_lookup(lookup_from(&[(ENV_FALLBACK_STEP, "1e-20")])).is_err());
    }
}
