//! # Recipe Ranking Example
//!
//! Ranks a handful of recipes against the built-in sample pantry and
//! commissary, then shows how a single ingredient is matched.

use pantry_matcher::config::{FallbackPolicy, Threshold};
use pantry_matcher::inventory::{sample_commissary, sample_pantry, SynonymTable};
use pantry_matcher::ranking::rank_with_fallback;
use pantry_matcher::recipe::Recipe;
use pantry_matcher::scorer::RecipeScorer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🥕 Pantry Recipe Ranking Example");
    println!("================================\n");

    let scorer = RecipeScorer::default();
    let synonyms = SynonymTable::builtin(scorer.matcher().normalizer());
    let pantry = sample_pantry(&synonyms);
    let commissary = sample_commissary(&synonyms);

    let recipes = vec![
        Recipe::new(
            1,
            "Quinoa Salad",
            ["1 cup quinoa", "1 cucumber, diced", "2 tbsp olive oil", "juice of 1 lemon"],
        ),
        Recipe::new(
            2,
            "Turkey Stir Fry",
            [
                "1 lb lean ground turkey",
                "2 bell peppers, sliced",
                "1 head broccoli",
                "3 cloves garlic, minced",
                "3 scallions",
            ],
        ),
        Recipe::new(
            3,
            "Beef Tacos",
            ["2 lbs ground beef", "8 corn tortillas", "1 avocado", "salt to taste"],
        ),
    ];

    let outcome = rank_with_fallback(
        &scorer,
        &recipes,
        &pantry,
        &commissary,
        Threshold::new(80.0)?,
        &FallbackPolicy::default(),
    );

    println!("Threshold used: {}%\n", outcome.threshold_used);
    for (rank, ranked) in outcome.results.iter().enumerate() {
        let analysis = &ranked.analysis;
        println!(
            "{}. {} (priority {:.3}, {:.1}% available)",
            rank + 1,
            ranked.recipe.title,
            analysis.priority_score,
            analysis.match_percentage
        );
        for classification in &analysis.classifications {
            println!(
                "   [{:?}] {} -> {}",
                classification.source,
                classification.raw_text,
                classification.matched_name.as_deref().unwrap_or("buy at store")
            );
        }
        println!();
    }

    Ok(())
}
