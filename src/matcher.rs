//! # Fuzzy Matcher Module
//!
//! Finds the best inventory item for a normalized ingredient, tier by tier.
//!
//! Inventories are first *prepared*: every canonical name and synonym is
//! normalized once, so a scoring pass over many recipes never re-normalizes
//! inventory text. Lookup then walks the prepared tiers in order (pantry
//! before commissary) and stops at the first tier whose best item clears the
//! threshold.
//!
//! ```rust
//! use pantry_matcher::config::Threshold;
//! use pantry_matcher::inventory::{Inventory, InventoryItem, Tier};
//! use pantry_matcher::matcher::FuzzyMatcher;
//! use pantry_matcher::normalizer::IngredientNormalizer;
//! use pantry_matcher::similarity::SimilarityAlgorithm;
//!
//! let pantry = Inventory::new(
//!     Tier::Pantry,
//!     vec![InventoryItem::new("Green Onions", Tier::Pantry).with_synonyms(["scallions"])],
//! );
//! let matcher = FuzzyMatcher::new(IngredientNormalizer::new(), SimilarityAlgorithm::TokenSort);
//! let tiers = [matcher.prepare(&pantry)];
//!
//! let result = matcher.match_ingredient("3 scallions", &tiers, Threshold::default());
//! assert!(result.matched);
//! assert_eq!(result.score, 100.0);
//! assert_eq!(result.matched_item.unwrap().canonical_name, "Green Onions");
//! ```

use log::{debug, trace};
use serde::Serialize;
use std::sync::Arc;

use crate::config::Threshold;
use crate::inventory::{Inventory, InventoryItem, Tier};
use crate::normalizer::IngredientNormalizer;
use crate::similarity::{SimilarityAlgorithm, SimilarityScorer};

/// Outcome of matching one ingredient against a list of tiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    /// Matched item; present only when `matched` is true
    pub matched_item: Option<&'a InventoryItem>,
    /// Best similarity seen, 0..=100
    pub score: f64,
    /// Whether `score` cleared the threshold
    pub matched: bool,
    /// Tier the match came from
    pub tier: Option<Tier>,
    /// Normalized name or synonym that produced the score
    pub matched_key: Option<String>,
}

impl<'a> MatchResult<'a> {
    /// An unmatched result carrying the best score seen
    pub fn unmatched(score: f64) -> Self {
        Self {
            matched_item: None,
            score,
            matched: false,
            tier: None,
            matched_key: None,
        }
    }

    pub fn matched_name(&self) -> Option<&'a str> {
        self.matched_item.map(|item| item.canonical_name.as_str())
    }
}

/// An inventory item with its comparison keys normalized
#[derive(Debug, Clone)]
pub struct PreparedItem<'a> {
    pub item: &'a InventoryItem,
    /// Normalized canonical name followed by normalized synonyms, no blanks
    pub keys: Vec<String>,
}

/// A tier ready for repeated lookups
#[derive(Debug, Clone)]
pub struct PreparedInventory<'a> {
    pub tier: Tier,
    pub items: Vec<PreparedItem<'a>>,
}

impl<'a> PreparedInventory<'a> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Tiered fuzzy lookup over prepared inventories
#[derive(Clone)]
pub struct FuzzyMatcher {
    normalizer: IngredientNormalizer,
    scorer: Arc<dyn SimilarityScorer>,
}

impl std::fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyMatcher")
            .field("normalizer", &self.normalizer)
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl FuzzyMatcher {
    /// Create a matcher using one of the built-in similarity strategies
    pub fn new(normalizer: IngredientNormalizer, algorithm: SimilarityAlgorithm) -> Self {
        Self::with_scorer(normalizer, Arc::new(algorithm))
    }

    /// Create a matcher with a custom similarity strategy
    pub fn with_scorer(normalizer: IngredientNormalizer, scorer: Arc<dyn SimilarityScorer>) -> Self {
        debug!("Creating FuzzyMatcher with scorer '{}'", scorer.name());
        Self { normalizer, scorer }
    }

    pub fn normalizer(&self) -> &IngredientNormalizer {
        &self.normalizer
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Similarity of two normalized strings under this matcher's strategy
    pub fn similarity(&self, left: &str, right: &str) -> f64 {
        self.scorer.score(left, right)
    }

    /// Normalize every name and synonym of an inventory once
    ///
    /// Items whose names all normalize to nothing get no keys and can never
    /// match.
    pub fn prepare<'a>(&self, inventory: &'a Inventory) -> PreparedInventory<'a> {
        let items = inventory
            .items
            .iter()
            .map(|item| {
                let mut keys: Vec<String> = Vec::with_capacity(1 + item.synonyms.len());
                let names = std::iter::once(&item.canonical_name).chain(item.synonyms.iter());
                for name in names {
                    let key = self.normalizer.normalize(name);
                    if !key.is_empty() && !keys.contains(&key) {
                        keys.push(key);
                    }
                }
                if keys.is_empty() {
                    debug!(
                        "Inventory item '{}' normalizes to nothing and cannot match",
                        item.canonical_name
                    );
                }
                PreparedItem { item, keys }
            })
            .collect();

        PreparedInventory {
            tier: inventory.tier,
            items,
        }
    }

    /// Best item of a single tier as `(item, score, key)`
    ///
    /// The first item reaching the maximum score wins ties. Returns `None`
    /// for a tier with no comparable items.
    pub fn best_in_tier<'a>(
        &self,
        normalized: &str,
        tier: &PreparedInventory<'a>,
    ) -> Option<(&'a InventoryItem, f64, String)> {
        let mut best: Option<(&'a InventoryItem, f64, &str)> = None;

        for prepared in &tier.items {
            for key in &prepared.keys {
                let score = self.scorer.score(normalized, key);
                trace!("'{}' vs '{}' = {:.2}", normalized, key, score);
                let improves = match best {
                    Some((_, best_score, _)) => score > best_score,
                    None => true,
                };
                if improves {
                    best = Some((prepared.item, score, key.as_str()));
                }
            }
        }

        best.map(|(item, score, key)| (item, score, key.to_string()))
    }

    /// Match an already-normalized ingredient against tiers in order
    ///
    /// Stops at the first tier whose best score meets the threshold. When no
    /// tier matches, the result carries the highest score seen anywhere.
    /// An empty ingredient is never compared and scores 0.
    pub fn find_best_match<'a>(
        &self,
        normalized: &str,
        tiers: &[PreparedInventory<'a>],
        threshold: Threshold,
    ) -> MatchResult<'a> {
        if normalized.is_empty() {
            return MatchResult::unmatched(0.0);
        }

        let mut best_seen = 0.0_f64;
        for tier in tiers {
            let Some((item, score, key)) = self.best_in_tier(normalized, tier) else {
                continue;
            };

            if threshold.is_met(score) {
                debug!(
                    "Matched '{}' to '{}' in {} ({:.2} >= {})",
                    normalized, item.canonical_name, tier.tier, score, threshold
                );
                return MatchResult {
                    matched_item: Some(item),
                    score,
                    matched: true,
                    tier: Some(tier.tier),
                    matched_key: Some(key),
                };
            }
            best_seen = best_seen.max(score);
        }

        debug!(
            "No match for '{}' (best {:.2} < {})",
            normalized, best_seen, threshold
        );
        MatchResult::unmatched(best_seen)
    }

    /// Normalize a raw ingredient line, then match it
    pub fn match_ingredient<'a>(
        &self,
        raw: &str,
        tiers: &[PreparedInventory<'a>],
        threshold: Threshold,
    ) -> MatchResult<'a> {
        let normalized = self.normalizer.normalize(raw);
        self.find_best_match(&normalized, tiers, threshold)
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(IngredientNormalizer::new(), SimilarityAlgorithm::default())
    }
}
