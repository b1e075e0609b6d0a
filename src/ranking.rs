//! # Recipe Ranking Module
//!
//! Scores many recipes against one inventory snapshot and orders them for
//! display.
//!
//! - Recipes are independent, so with the `parallel` feature they are scored
//!   on the rayon thread pool; output order never depends on scheduling.
//! - Ordering is priority score descending, then match percentage descending,
//!   then original order (stable sort).
//! - [`rank_with_fallback`] retries at lower thresholds when nothing in the
//!   inventories matched at the configured one.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{FallbackPolicy, Threshold};
use crate::inventory::Inventory;
use crate::matcher::PreparedInventory;
use crate::recipe::Recipe;
use crate::scorer::{RecipeAnalysis, RecipeScorer};

/// A recipe paired with its analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecipe<'a> {
    pub recipe: &'a Recipe,
    pub analysis: RecipeAnalysis,
}

/// Result of a ranking pass with threshold fallback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome<'a> {
    /// Threshold that produced `results`
    pub threshold_used: f64,
    /// Every threshold tried, in order
    pub attempted_thresholds: Vec<f64>,
    /// Whether the threshold had to be lowered
    pub degraded: bool,
    pub results: Vec<RankedRecipe<'a>>,
}

/// Score every recipe against prepared tiers, keeping input order
pub fn score_recipes<'a>(
    scorer: &RecipeScorer,
    recipes: &'a [Recipe],
    tiers: &[PreparedInventory<'_>],
    threshold: Threshold,
) -> Vec<RankedRecipe<'a>> {
    let score_one = |recipe: &'a Recipe| RankedRecipe {
        recipe,
        analysis: scorer.analyze_prepared(&recipe.ingredients, tiers, threshold),
    };

    #[cfg(feature = "parallel")]
    let ranked = recipes.par_iter().map(score_one).collect();
    #[cfg(not(feature = "parallel"))]
    let ranked = recipes.iter().map(score_one).collect();

    ranked
}

/// Order by priority, then match percentage, keeping input order on ties
pub fn sort_by_priority(ranked: &mut [RankedRecipe<'_>]) {
    ranked.sort_by(|a, b| {
        b.analysis
            .priority_score
            .total_cmp(&a.analysis.priority_score)
            .then_with(|| {
                b.analysis
                    .match_percentage
                    .total_cmp(&a.analysis.match_percentage)
            })
    });
}

/// Score and order recipes at a single threshold
pub fn rank_recipes<'a>(
    scorer: &RecipeScorer,
    recipes: &'a [Recipe],
    pantry: &Inventory,
    commissary: &Inventory,
    threshold: Threshold,
) -> Vec<RankedRecipe<'a>> {
    let tiers = scorer.prepare(pantry, commissary);
    let mut ranked = score_recipes(scorer, recipes, &tiers, threshold);
    sort_by_priority(&mut ranked);

    info!(
        recipes = ranked.len(),
        threshold = threshold.value(),
        "Ranked recipes"
    );
    ranked
}

/// Rank recipes, lowering the threshold until something is available
///
/// Starts at `threshold` and steps down by `policy.step` while no recipe has
/// a pantry or commissary ingredient, stopping at `policy.floor`. A start
/// below the floor is used as is and never raised.
pub fn rank_with_fallback<'a>(
    scorer: &RecipeScorer,
    recipes: &'a [Recipe],
    pantry: &Inventory,
    commissary: &Inventory,
    threshold: Threshold,
    policy: &FallbackPolicy,
) -> SearchOutcome<'a> {
    let tiers = scorer.prepare(pantry, commissary);
    let mut current = threshold;
    let mut attempted = Vec::new();

    loop {
        attempted.push(current.value());
        let mut ranked = score_recipes(scorer, recipes, &tiers, current);
        sort_by_priority(&mut ranked);

        let found = ranked.iter().any(|r| r.analysis.has_available());
        let at_floor = current.value() <= policy.floor.value();
        if found || at_floor || recipes.is_empty() {
            debug!(
                threshold = current.value(),
                attempts = attempted.len(),
                found,
                "Fallback search finished"
            );
            return SearchOutcome {
                threshold_used: current.value(),
                degraded: attempted.len() > 1,
                attempted_thresholds: attempted,
                results: ranked,
            };
        }

        let next = current.lowered_by(policy.step, policy.floor);
        if next.value() >= current.value() {
            // Step too small to move the threshold
            warn!(
                threshold = current.value(),
                step = policy.step,
                "Fallback step does not lower the threshold, stopping"
            );
            return SearchOutcome {
                threshold_used: current.value(),
                degraded: attempted.len() > 1,
                attempted_thresholds: attempted,
                results: ranked,
            };
        }
        info!(
            from = current.value(),
            to = next.value(),
            "No available ingredients, lowering threshold"
        );
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{InventoryItem, Tier};

    fn threshold(value: f64) -> Threshold {
        Threshold::new(value).unwrap()
    }

    fn inventory(tier: Tier, names: &[&str]) -> Inventory {
        Inventory::new(
            tier,
            names.iter().map(|n| InventoryItem::new(n, tier)).collect(),
        )
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let recipes = vec![
            Recipe::new(1, "First", ["quinoa"]),
            Recipe::new(2, "Second", ["garlic"]),
            Recipe::new(3, "Third", ["farro"]),
        ];
        let pantry = inventory(Tier::Pantry, &["Garlic"]);
        let commissary = Inventory::empty(Tier::Commissary);

        let ranked = rank_recipes(
            &RecipeScorer::default(),
            &recipes,
            &pantry,
            &commissary,
            threshold(80.0),
        );
        let ids: Vec<u64> = ranked.iter().map(|r| r.recipe.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_fallback_stops_at_floor() {
        let recipes = vec![Recipe::new(1, "Grain Bowl", ["quinoa"])];
        let pantry = inventory(Tier::Pantry, &["Garlic"]);
        let commissary = Inventory::empty(Tier::Commissary);
        let policy = FallbackPolicy::new(10.0, threshold(60.0)).unwrap();

        let outcome = rank_with_fallback(
            &RecipeScorer::default(),
            &recipes,
            &pantry,
            &commissary,
            threshold(80.0),
            &policy,
        );
        assert_eq!(outcome.attempted_thresholds, vec![80.0, 70.0, 60.0]);
        assert_eq!(outcome.threshold_used, 60.0);
        assert!(outcome.degraded);
        assert_eq!(outcome.results[0].analysis.store_count, 1);
    }

    #[test]
    fn test_fallback_step_too_small_to_move_stops() {
        let recipes = vec![Recipe::new(1, "Grain Bowl", ["quinoa"])];
        let pantry = inventory(Tier::Pantry, &["Garlic"]);
        let commissary = Inventory::empty(Tier::Commissary);
        // 80.0 - 1e-20 rounds back to 80.0
        let policy = FallbackPolicy {
            step: 1e-20,
            floor: threshold(60.0),
        };

        let outcome = rank_with_fallback(
            &RecipeScorer::default(),
            &recipes,
            &pantry,
            &commissary,
            threshold(80.0),
            &policy,
        );
        assert_eq!(outcome.attempted_thresholds, vec![80.0]);
        assert_eq!(outcome.threshold_used, 80.0);
        assert!(!outcome.degraded);
        assert_eq!(outcome.results[0].analysis.store_count, 1);
    }

    #[test]
    fn test_fallback_not_needed() {
        let recipes = vec![Recipe::new(1, "Garlic Bread", ["garlic", "bread"])];
        let pantry = inventory(Tier::Pantry, &["Garlic"]);
        let commissary = Inventory::empty(Tier::Commissary);

        let outcome = rank_with_fallback(
            &RecipeScorer::default(),
            &recipes,
            &pantry,
            &commissary,
            threshold(80.0),
            &FallbackPolicy::default(),
        );
        assert_eq!(outcome.attempted_thresholds, vec![80.0]);
        assert!(!outcome.degraded);
    }

    #[test]
    fn test_start_below_floor_is_not_raised() {
        let recipes = vec![Recipe::new(1, "Grain Bowl", ["quinoa"])];
        let pantry = Inventory::empty(Tier::Pantry);
        let commissary = Inventory::empty(Tier::Commissary);

        let outcome = rank_with_fallback(
            &RecipeScorer::default(),
            &recipes,
            &pantry,
            &commissary,
            threshold(50.0),
            &FallbackPolicy::default(),
        );
        assert_eq!(outcome.attempted_thresholds, vec![50.0]);
    }
}
