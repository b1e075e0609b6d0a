use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use pantry_matcher::accuracy::{default_labeled_cases, TuningSummary};
use pantry_matcher::config::{MatcherConfig, Threshold};
use pantry_matcher::inventory::{sample_commissary, sample_pantry, Inventory, SynonymTable, Tier};
use pantry_matcher::loader::{load_inventory, load_recipes};
use pantry_matcher::matcher::FuzzyMatcher;
use pantry_matcher::normalizer::IngredientNormalizer;
use pantry_matcher::ranking::{rank_recipes, rank_with_fallback, RankedRecipe};
use pantry_matcher::scorer::RecipeScorer;

#[derive(Parser)]
#[command(name = "pantry-matcher")]
#[command(version, about = "Rank recipes by pantry and commissary availability")]
struct Cli {
    /// Similarity threshold (0-100), overrides FUZZY_MATCH_THRESHOLD
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Similarity algorithm, overrides FUZZY_MATCH_ALGORITHM
    #[arg(long, global = true)]
    algorithm: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank recipes from a JSON file
    Rank {
        /// Recipes JSON (array, or object with a "results" array)
        recipes: PathBuf,
        #[command(flatten)]
        inventories: InventoryArgs,
        /// Use only the configured threshold, never lower it
        #[arg(long)]
        no_fallback: bool,
    },

    /// Show how a single ingredient line is matched
    Match {
        ingredient: String,
        #[command(flatten)]
        inventories: InventoryArgs,
    },

    /// Print the normalized form of ingredient lines
    Normalize {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// Evaluate matching accuracy on the built-in labeled set
    Tune {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct InventoryArgs {
    /// Pantry inventory JSON; the sample pantry when omitted
    #[arg(long)]
    pantry: Option<PathBuf>,
    /// Commissary inventory JSON; the sample commissary when omitted
    #[arg(long)]
    commissary: Option<PathBuf>,
}

#[derive(Serialize)]
struct RankOutput<'a> {
    generated_at: DateTime<Utc>,
    algorithm: String,
    threshold_used: f64,
    attempted_thresholds: Vec<f64>,
    degraded: bool,
    results: Vec<RankedRecipe<'a>>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    info!(
        threshold = config.fuzzy_threshold.value(),
        algorithm = config.algorithm.as_str(),
        "Starting pantry-matcher"
    );

    match cli.command {
        Commands::Rank {
            recipes,
            inventories,
            no_fallback,
        } => run_rank(&config, &recipes, &inventories, no_fallback),
        Commands::Match {
            ingredient,
            inventories,
        } => run_match(&config, &ingredient, &inventories),
        Commands::Normalize { ingredients } => {
            let normalizer = IngredientNormalizer::new();
            for ingredient in ingredients {
                println!("{} -> {}", ingredient, normalizer.normalize(&ingredient));
            }
            Ok(())
        }
        Commands::Tune { json } => run_tune(&config, json),
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn resolve_config(cli: &Cli) -> Result<MatcherConfig> {
    let mut config = MatcherConfig::from_env().context("Invalid matcher configuration")?;
    if let Some(threshold) = cli.threshold {
        config.fuzzy_threshold = Threshold::new(threshold)?;
    }
    if let Some(algorithm) = &cli.algorithm {
        config.algorithm = algorithm.parse()?;
    }
    Ok(config)
}

fn load_inventories(
    args: &InventoryArgs,
    synonyms: &SynonymTable,
) -> Result<(Inventory, Inventory)> {
    let pantry = match &args.pantry {
        Some(path) => load_inventory(path, Tier::Pantry, synonyms)?,
        None => sample_pantry(synonyms),
    };
    let commissary = match &args.commissary {
        Some(path) => load_inventory(path, Tier::Commissary, synonyms)?,
        None => sample_commissary(synonyms),
    };
    Ok((pantry, commissary))
}

fn run_rank(
    config: &MatcherConfig,
    recipes_path: &Path,
    inventories: &InventoryArgs,
    no_fallback: bool,
) -> Result<()> {
    let scorer = RecipeScorer::from_config(config);
    let synonyms = SynonymTable::builtin(scorer.matcher().normalizer());
    let (pantry, commissary) = load_inventories(inventories, &synonyms)?;
    let recipes = load_recipes(recipes_path)?;

    let output = if no_fallback {
        RankOutput {
            generated_at: Utc::now(),
            algorithm: config.algorithm.to_string(),
            threshold_used: config.fuzzy_threshold.value(),
            attempted_thresholds: vec![config.fuzzy_threshold.value()],
            degraded: false,
            results: rank_recipes(&scorer, &recipes, &pantry, &commissary, config.fuzzy_threshold),
        }
    } else {
        let outcome = rank_with_fallback(
            &scorer,
            &recipes,
            &pantry,
            &commissary,
            config.fuzzy_threshold,
            &config.fallback,
        );
        RankOutput {
            generated_at: Utc::now(),
            algorithm: config.algorithm.to_string(),
            threshold_used: outcome.threshold_used,
            attempted_thresholds: outcome.attempted_thresholds,
            degraded: outcome.degraded,
            results: outcome.results,
        }
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize ranking")?;
    println!("{json}");
    Ok(())
}

fn run_match(config: &MatcherConfig, ingredient: &str, inventories: &InventoryArgs) -> Result<()> {
    let matcher = FuzzyMatcher::new(IngredientNormalizer::new(), config.algorithm);
    let synonyms = SynonymTable::builtin(matcher.normalizer());
    let (pantry, commissary) = load_inventories(inventories, &synonyms)?;
    let tiers = [matcher.prepare(&pantry), matcher.prepare(&commissary)];

    let normalized = matcher.normalizer().normalize(ingredient);
    let result = matcher.find_best_match(&normalized, &tiers, config.fuzzy_threshold);

    println!("Ingredient: {ingredient}");
    println!("Normalized: {normalized}");
    match (result.matched_item, result.tier) {
        (Some(item), Some(tier)) => {
            println!("Source:     {tier}");
            println!("Matched:    {}", item.canonical_name);
            if let Some(key) = &result.matched_key {
                println!("Via:        {key}");
            }
        }
        _ => println!("Source:     store"),
    }
    println!(
        "Score:      {:.2} (threshold {})",
        result.score, config.fuzzy_threshold
    );
    Ok(())
}

fn run_tune(config: &MatcherConfig, json: bool) -> Result<()> {
    let matcher = FuzzyMatcher::new(IngredientNormalizer::new(), config.algorithm);
    let synonyms = SynonymTable::builtin(matcher.normalizer());
    let pantry = sample_pantry(&synonyms);
    let commissary = sample_commissary(&synonyms);

    let summary = TuningSummary::run(
        &matcher,
        &default_labeled_cases(),
        &pantry,
        &commissary,
        config.fuzzy_threshold,
    )?;

    if json {
        let output = serde_json::to_string_pretty(&summary).context("Failed to serialize report")?;
        println!("{output}");
    } else {
        println!("{}", summary.render());
    }
    Ok(())
}
