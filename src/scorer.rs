//! # Recipe Scorer Module
//!
//! Classifies every ingredient of a recipe as pantry, commissary or store and
//! aggregates the classification into a [`RecipeAnalysis`] with a weighted
//! priority score used for ranking.
//!
//! Scoring is a pure function of its inputs: the scorer holds no inventory and
//! no threshold, so the same scorer can be reused across requests, threads and
//! threshold retries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{MatcherConfig, ScoreWeights, Threshold};
use crate::inventory::{Inventory, Tier};
use crate::matcher::{FuzzyMatcher, PreparedInventory};
use crate::normalizer::IngredientNormalizer;

/// Where a recipe ingredient will come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientSource {
    Pantry,
    Commissary,
    Store,
}

impl IngredientSource {
    /// Relative cost used by `RecipeAnalysis::cost_score`
    pub fn cost(self) -> f64 {
        match self {
            IngredientSource::Pantry => 0.0,
            IngredientSource::Commissary => 1.0,
            IngredientSource::Store => 2.0,
        }
    }
}

impl From<Tier> for IngredientSource {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Pantry => IngredientSource::Pantry,
            Tier::Commissary => IngredientSource::Commissary,
        }
    }
}

/// Final source tag of one recipe ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientClassification {
    /// Ingredient text exactly as it appears in the recipe
    pub raw_text: String,
    pub normalized: String,
    pub source: IngredientSource,
    /// Canonical inventory name; `None` for store ingredients
    pub matched_name: Option<String>,
    pub category: Option<String>,
    /// Best similarity seen, kept for diagnostics even when unmatched
    pub score: f64,
}

/// Aggregate classification of one recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeAnalysis {
    pub total_ingredients: usize,
    pub pantry_count: usize,
    pub commissary_count: usize,
    pub store_count: usize,
    pub pantry_ingredients: Vec<String>,
    pub commissary_ingredients: Vec<String>,
    pub store_ingredients: Vec<String>,
    /// Share of ingredients available from either tier, 0..=100
    pub match_percentage: f64,
    pub pantry_percentage: f64,
    pub commissary_percentage: f64,
    /// Weighted availability, 0..=1, higher is better
    pub priority_score: f64,
    /// Average relative cost (pantry 0, commissary 1, store 2), lower is better
    pub cost_score: f64,
    pub classifications: Vec<IngredientClassification>,
}

impl RecipeAnalysis {
    /// Aggregate per-ingredient classifications
    ///
    /// An empty list yields all-zero counts and percentages, a priority of 0
    /// and the maximum cost score of 2.
    pub fn from_classifications(
        classifications: Vec<IngredientClassification>,
        weights: &ScoreWeights,
    ) -> Self {
        let mut pantry_ingredients = Vec::new();
        let mut commissary_ingredients = Vec::new();
        let mut store_ingredients = Vec::new();

        for classification in &classifications {
            let bucket = match classification.source {
                IngredientSource::Pantry => &mut pantry_ingredients,
                IngredientSource::Commissary => &mut commissary_ingredients,
                IngredientSource::Store => &mut store_ingredients,
            };
            bucket.push(classification.raw_text.clone());
        }

        let total = classifications.len();
        let pantry_count = pantry_ingredients.len();
        let commissary_count = commissary_ingredients.len();
        let store_count = store_ingredients.len();

        let percent = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };
        let cost_score = if total == 0 {
            IngredientSource::Store.cost()
        } else {
            classifications.iter().map(|c| c.source.cost()).sum::<f64>() / total as f64
        };

        Self {
            total_ingredients: total,
            pantry_count,
            commissary_count,
            store_count,
            match_percentage: percent(pantry_count + commissary_count),
            pantry_percentage: percent(pantry_count),
            commissary_percentage: percent(commissary_count),
            priority_score: weights.priority(pantry_count, commissary_count, total),
            cost_score,
            pantry_ingredients,
            commissary_ingredients,
            store_ingredients,
            classifications,
        }
    }

    /// Whether any ingredient is available from the pantry or commissary
    pub fn has_available(&self) -> bool {
        self.pantry_count + self.commissary_count > 0
    }
}

/// Classifies recipe ingredients and computes priority scores
#[derive(Debug, Clone, Default)]
pub struct RecipeScorer {
    matcher: FuzzyMatcher,
    weights: ScoreWeights,
}

impl RecipeScorer {
    pub fn new(matcher: FuzzyMatcher, weights: ScoreWeights) -> Self {
        Self { matcher, weights }
    }

    /// Scorer with the default normalizer and the configured algorithm and weights
    pub fn from_config(config: &MatcherConfig) -> Self {
        Self::new(
            FuzzyMatcher::new(IngredientNormalizer::new(), config.algorithm),
            config.weights,
        )
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Prepare pantry and commissary for lookup, in that order
    pub fn prepare<'a>(
        &self,
        pantry: &'a Inventory,
        commissary: &'a Inventory,
    ) -> [PreparedInventory<'a>; 2] {
        [self.matcher.prepare(pantry), self.matcher.prepare(commissary)]
    }

    /// Classify a single raw ingredient against prepared tiers
    pub fn classify(
        &self,
        raw: &str,
        tiers: &[PreparedInventory<'_>],
        threshold: Threshold,
    ) -> IngredientClassification {
        let normalized = self.matcher.normalizer().normalize(raw);
        let result = self.matcher.find_best_match(&normalized, tiers, threshold);

        let (source, matched_name, category) = match (result.matched_item, result.tier) {
            (Some(item), Some(tier)) if result.matched => (
                IngredientSource::from(tier),
                Some(item.canonical_name.clone()),
                item.category.clone(),
            ),
            _ => (IngredientSource::Store, None, None),
        };

        IngredientClassification {
            raw_text: raw.to_string(),
            normalized,
            source,
            matched_name,
            category,
            score: result.score,
        }
    }

    /// Score a recipe against pantry and commissary
    ///
    /// Prepares both inventories for this call only; when scoring many
    /// recipes, prepare once and use [`RecipeScorer::analyze_prepared`].
    pub fn analyze<S: AsRef<str>>(
        &self,
        ingredients: &[S],
        pantry: &Inventory,
        commissary: &Inventory,
        threshold: Threshold,
    ) -> RecipeAnalysis {
        let tiers = self.prepare(pantry, commissary);
        self.analyze_prepared(ingredients, &tiers, threshold)
    }

    /// Score a recipe against already prepared tiers
    pub fn analyze_prepared<S: AsRef<str>>(
        &self,
        ingredients: &[S],
        tiers: &[PreparedInventory<'_>],
        threshold: Threshold,
    ) -> RecipeAnalysis {
        let classifications = ingredients
            .iter()
            .map(|raw| self.classify(raw.as_ref(), tiers, threshold))
            .collect();
        let analysis = RecipeAnalysis::from_classifications(classifications, &self.weights);

        debug!(
            pantry = analysis.pantry_count,
            commissary = analysis.commissary_count,
            store = analysis.store_count,
            priority = analysis.priority_score,
            threshold = threshold.value(),
            "Scored recipe ingredients"
        );
        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::InventoryItem;

    fn inventory(tier: Tier, names: &[&str]) -> Inventory {
        Inventory::new(
            tier,
            names.iter().map(|n| InventoryItem::new(n, tier)).collect(),
        )
    }

    fn classification(source: IngredientSource) -> IngredientClassification {
        IngredientClassification {
            raw_text: format!("{source:?}"),
            normalized: String::new(),
            source,
            matched_name: None,
            category: None,
            score: 0.0,
        }
    }

    #[test]
    fn test_empty_recipe_is_all_zero() {
        let analysis = RecipeAnalysis::from_classifications(Vec::new(), &ScoreWeights::default());
        assert_eq!(analysis.total_ingredients, 0);
        assert_eq!(analysis.match_percentage, 0.0);
        assert_eq!(analysis.priority_score, 0.0);
        assert_eq!(analysis.cost_score, 2.0);
        assert!(!analysis.has_available());
    }

    #[test]
    fn test_aggregation_of_ten_ingredients() {
        let mut sources = vec![IngredientSource::Pantry; 5];
        sources.extend([IngredientSource::Commissary; 2]);
        sources.extend([IngredientSource::Store; 3]);
        let classifications = sources.into_iter().map(classification).collect();

        let analysis = RecipeAnalysis::from_classifications(classifications, &ScoreWeights::default());
        assert_eq!(analysis.total_ingredients, 10);
        assert!((analysis.match_percentage - 70.0).abs() < 1e-9);
        assert!((analysis.pantry_percentage - 50.0).abs() < 1e-9);
        assert!((analysis.commissary_percentage - 20.0).abs() < 1e-9);
        assert!((analysis.priority_score - 0.45).abs() < 1e-9);
        assert!((analysis.cost_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_pantry_wins_over_commissary() {
        let scorer = RecipeScorer::default();
        let pantry = inventory(Tier::Pantry, &["Garlic"]);
        let commissary = inventory(Tier::Commissary, &["Garlic"]);

        let analysis = scorer.analyze(
            &["3 cloves garlic"],
            &pantry,
            &commissary,
            Threshold::default(),
        );
        assert_eq!(analysis.pantry_count, 1);
        assert_eq!(analysis.commissary_count, 0);
        assert_eq!(analysis.classifications[0].matched_name.as_deref(), Some("Garlic"));
    }

    #[test]
    fn test_store_classification_keeps_raw_text() {
        let scorer = RecipeScorer::default();
        let pantry = inventory(Tier::Pantry, &["Olive Oil"]);
        let commissary = Inventory::empty(Tier::Commissary);

        let analysis = scorer.analyze(&["1 cup Quinoa"], &pantry, &commissary, Threshold::default());
        assert_eq!(analysis.store_ingredients, vec!["1 cup Quinoa".to_string()]);
        let classification = &analysis.classifications[0];
        assert_eq!(classification.source, IngredientSource::Store);
        assert_eq!(classification.normalized, "quinoa");
        assert!(classification.matched_name.is_none());
    }
}
