#[cfg(test)]
mod tests {
    use pantry_matcher::config::Threshold;
    use pantry_matcher::inventory::{sample_commissary, sample_pantry, Inventory, SynonymTable};
    use pantry_matcher::matcher::FuzzyMatcher;
    use pantry_matcher::normalizer::IngredientNormalizer;
    use pantry_matcher::scorer::RecipeScorer;
    use pantry_matcher::similarity::{SimilarityAlgorithm, SimilarityScorer};
    use proptest::prelude::*;

    const WORDS: &[&str] = &[
        "2", "1/2", "cup", "tbsp", "lb", "fresh", "chopped", "ground", "beef", "garlic",
        "onions", "green", "olive", "oil", "coconut", "milk", "quinoa", "chicken", "thighs",
        "breast", "carrots", "bell", "peppers", "salt", "spinach", "(optional)", ",",
    ];

    const CONTENT_WORDS: &[&str] = &[
        "garlic", "onion", "tomato", "basil", "olive", "oil", "rice", "lentil", "carrot",
        "ginger", "miso", "kale",
    ];

    fn ingredient_line() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(WORDS), 0..6).prop_map(|words| words.join(" "))
    }

    fn algorithm() -> impl Strategy<Value = SimilarityAlgorithm> {
        prop::sample::select(SimilarityAlgorithm::ALL.to_vec())
    }

    fn sample_inventories(normalizer: &IngredientNormalizer) -> (Inventory, Inventory) {
        let synonyms = SynonymTable::builtin(normalizer);
        (sample_pantry(&synonyms), sample_commissary(&synonyms))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: similarity stays on the 0..=100 scale and is symmetric
        #[test]
        fn similarity_is_bounded_and_symmetric(
            left in ingredient_line(),
            right in ingredient_line(),
            algorithm in algorithm()
        ) {
            let forward = algorithm.score(&left, &right);
            let backward = algorithm.score(&right, &left);
            prop_assert!((0.0..=100.0).contains(&forward));
            prop_assert!((forward - backward).abs() < 1e-9);
        }

        /// Property: scoring is deterministic, complete and bounded
        #[test]
        fn analysis_is_consistent(
            ingredients in prop::collection::vec(ingredient_line(), 0..8),
            threshold in 0.0f64..=100.0,
            algorithm in algorithm()
        ) {
            let scorer = RecipeScorer::new(
                FuzzyMatcher::new(IngredientNormalizer::new(), algorithm),
                Default::default(),
            );
            let (pantry, commissary) = sample_inventories(scorer.matcher().normalizer());
            let threshold = Threshold::new(threshold).unwrap();

            let first = scorer.analyze(&ingredients, &pantry, &commissary, threshold);
            let second = scorer.analyze(&ingredients, &pantry, &commissary, threshold);
            prop_assert_eq!(&first, &second);

            prop_assert_eq!(first.total_ingredients, ingredients.len());
            prop_assert_eq!(
                first.pantry_count + first.commissary_count + first.store_count,
                first.total_ingredients
            );
            prop_assert!((0.0..=100.0).contains(&first.match_percentage));
            prop_assert!((0.0..=1.0).contains(&first.priority_score));
            prop_assert!((0.0..=2.0).contains(&first.cost_score));
        }

        /// Property: lowering the threshold never lowers availability or priority
        #[test]
        fn lower_threshold_is_monotone(
            ingredients in prop::collection::vec(ingredient_line(), 1..8),
            a in 0.0f64..=100.0,
            b in 0.0f64..=100.0,
            algorithm in algorithm()
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let scorer = RecipeScorer::new(
                FuzzyMatcher::new(IngredientNormalizer::new(), algorithm),
                Default::default(),
            );
            let (pantry, commissary) = sample_inventories(scorer.matcher().normalizer());

            let loose = scorer.analyze(&ingredients, &pantry, &commissary, Threshold::new(low).unwrap());
            let strict = scorer.analyze(&ingredients, &pantry, &commissary, Threshold::new(high).unwrap());

            prop_assert!(loose.match_percentage >= strict.match_percentage);
            prop_assert!(loose.priority_score + 1e-12 >= strict.priority_score);
        }

        /// Property: an ingredient equal to an inventory name matches with 100
        #[test]
        fn identity_always_matches(
            words in prop::collection::vec(prop::sample::select(CONTENT_WORDS), 1..4),
            uppercase in any::<bool>(),
            threshold in 0.0f64..=100.0,
            algorithm in algorithm()
        ) {
            let name = if uppercase { words.join(" ").to_uppercase() } else { words.join(" ") };
            let matcher = FuzzyMatcher::new(IngredientNormalizer::new(), algorithm);
            let (mut pantry, commissary) = sample_inventories(matcher.normalizer());
            pantry.items.push(pantry_matcher::inventory::InventoryItem::new(
                &name,
                pantry_matcher::inventory::Tier::Pantry,
            ));
            let tiers = [matcher.prepare(&pantry), matcher.prepare(&commissary)];

            let result = matcher.match_ingredient(&name, &tiers, Threshold::new(threshold).unwrap());
            prop_assert!(result.matched);
            prop_assert_eq!(result.score, 100.0);
        }

        /// Property: blank input never matches, whatever the inventory holds
        #[test]
        fn blank_input_never_matches(
            blank in "[ \t\n]{0,8}",
            algorithm in algorithm()
        ) {
            let matcher = FuzzyMatcher::new(IngredientNormalizer::new(), algorithm);
            prop_assert_eq!(matcher.normalizer().normalize(&blank), "");

            let (pantry, commissary) = sample_inventories(matcher.normalizer());
            let tiers = [matcher.prepare(&pantry), matcher.prepare(&commissary)];
            let result = matcher.match_ingredient(&blank, &tiers, Threshold::new(0.0).unwrap());
            prop_assert!(!result.matched);
            prop_assert_eq!(result.score, 0.0);
        }
    }
}
