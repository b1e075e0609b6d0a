//! # Matching Accuracy Module
//!
//! Tools for validating a matcher configuration against a labeled set of
//! ingredients before choosing a threshold or similarity algorithm.
//!
//! ## Features
//!
//! - **Evaluation**: classify every labeled case as correct, correct
//!   no-match, false positive or false negative, and compute accuracy,
//!   precision, recall and F1
//! - **Threshold sweep**: evaluate a range of thresholds and recommend the
//!   one with the best F1 (lowest threshold wins ties)
//! - **Algorithm comparison**: evaluate every built-in similarity strategy
//!   on the same cases
//! - **Score distribution**: spread of scores for correct and incorrect
//!   matches, to see how much margin a threshold has
//! - **Report**: everything above as plain text
//!
//! ## Usage
//!
//! ```rust
//! use pantry_matcher::accuracy::{default_labeled_cases, evaluate};
//! use pantry_matcher::config::Threshold;
//! use pantry_matcher::inventory::{sample_commissary, sample_pantry, SynonymTable};
//! use pantry_matcher::matcher::FuzzyMatcher;
//!
//! let matcher = FuzzyMatcher::default();
//! let synonyms = SynonymTable::builtin(matcher.normalizer());
//! let pantry = sample_pantry(&synonyms);
//! let commissary = sample_commissary(&synonyms);
//! let tiers = [matcher.prepare(&pantry), matcher.prepare(&commissary)];
//!
//! let report = evaluate(&matcher, &default_labeled_cases(), &tiers, Threshold::default());
//! assert_eq!(report.total, 21);
//! assert!(report.accuracy > 90.0);
//! ```

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::Threshold;
use crate::errors::MatcherError;
use crate::inventory::Inventory;
use crate::matcher::{FuzzyMatcher, PreparedInventory};
use crate::normalizer::IngredientNormalizer;
use crate::similarity::SimilarityAlgorithm;

/// Upper bound on the number of thresholds one sweep evaluates
pub const MAX_SWEEP_STEPS: usize = 1000;

/// An ingredient with the inventory item it should (or should not) match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCase {
    pub ingredient: String,
    /// Expected canonical name; `None` when the ingredient should not match
    pub expected: Option<String>,
}

impl LabeledCase {
    pub fn expect(ingredient: &str, expected: &str) -> Self {
        Self {
            ingredient: ingredient.to_string(),
            expected: Some(expected.to_string()),
        }
    }

    pub fn no_match(ingredient: &str) -> Self {
        Self {
            ingredient: ingredient.to_string(),
            expected: None,
        }
    }
}

/// Labeled cases against the sample pantry and commissary
pub fn default_labeled_cases() -> Vec<LabeledCase> {
    vec![
        // Exact names
        LabeledCase::expect("chicken breast", "Chicken Breast"),
        LabeledCase::expect("olive oil", "Olive Oil"),
        // Synonyms
        LabeledCase::expect("scallions", "Green Onions"),
        LabeledCase::expect("spring onions", "Green Onions"),
        LabeledCase::expect("sweet pepper", "Bell Peppers"),
        LabeledCase::expect("courgette", "Zucchini"),
        // Singular and plural
        LabeledCase::expect("bell pepper", "Bell Peppers"),
        LabeledCase::expect("sweet potato", "Sweet Potatoes"),
        LabeledCase::expect("avocado", "Avocados"),
        LabeledCase::expect("carrot", "Carrots"),
        // Quantities and descriptors
        LabeledCase::expect("2 lbs ground beef", "Ground Beef"),
        LabeledCase::expect("1 cup diced tomatoes", "Tomatoes"),
        LabeledCase::expect("3 cloves fresh garlic", "Garlic"),
        LabeledCase::expect("2 tbsp extra virgin olive oil", "Olive Oil"),
        LabeledCase::expect("1 tsp kosher salt", "Sea Salt"),
        LabeledCase::expect("1/2 tsp ground black pepper", "Black Pepper"),
        // Near misses
        LabeledCase::no_match("chicken thighs"),
        LabeledCase::expect("ground turkey", "Turkey Mince"),
        // Store items
        LabeledCase::no_match("quinoa"),
        LabeledCase::no_match("almond flour"),
        LabeledCase::no_match("coconut milk"),
    ]
}

/// Raw ingredient lines with their expected normalized form
pub fn default_normalization_cases() -> Vec<(String, String)> {
    [
        ("2 lbs fresh chicken breast", "chicken breast"),
        ("1 cup diced yellow onions", "yellow onion"),
        ("3 tbsp extra virgin olive oil", "olive oil"),
        ("1/2 tsp ground black pepper", "black pepper"),
        ("2 medium bell peppers, chopped", "bell pepper"),
        ("1 bunch green onions (scallions)", "green onion"),
        ("4 oz baby spinach leaves", "spinach leave"),
    ]
    .into_iter()
    .map(|(raw, expected)| (raw.to_string(), expected.to_string()))
    .collect()
}

/// Percentage of lines that normalize exactly as expected
pub fn normalization_accuracy(
    normalizer: &IngredientNormalizer,
    cases: &[(String, String)],
) -> f64 {
    if cases.is_empty() {
        return 0.0;
    }
    let correct = cases
        .iter()
        .filter(|(raw, expected)| normalizer.normalize(raw) == *expected)
        .count();
    correct as f64 / cases.len() as f64 * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseOutcome {
    /// Matched the expected item
    Correct,
    /// Correctly left unmatched
    CorrectNoMatch,
    /// Matched an item it should not have
    FalsePositive,
    /// Expected a match, found none
    FalseNegative,
}

impl CaseOutcome {
    pub fn classify(expected: Option<&str>, actual: Option<&str>) -> Self {
        match (expected, actual) {
            (Some(expected), Some(actual)) if expected == actual => CaseOutcome::Correct,
            (None, None) => CaseOutcome::CorrectNoMatch,
            (Some(_), None) => CaseOutcome::FalseNegative,
            _ => CaseOutcome::FalsePositive,
        }
    }

    pub fn is_correct(self) -> bool {
        matches!(self, CaseOutcome::Correct | CaseOutcome::CorrectNoMatch)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDetail {
    pub ingredient: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub score: f64,
    pub outcome: CaseOutcome,
}

/// Metrics of one matcher configuration over a labeled set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub algorithm: String,
    pub threshold: f64,
    pub total: usize,
    /// Correct matches plus correct no-matches
    pub correct: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// Share of correct cases, 0..=100
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub details: Vec<CaseDetail>,
}

impl AccuracyReport {
    fn from_details(algorithm: &str, threshold: Threshold, details: Vec<CaseDetail>) -> Self {
        let total = details.len();
        let count = |wanted: fn(CaseOutcome) -> bool| {
            details.iter().filter(|d| wanted(d.outcome)).count()
        };
        let correct = count(CaseOutcome::is_correct);
        let false_positives = count(|o| o == CaseOutcome::FalsePositive);
        let false_negatives = count(|o| o == CaseOutcome::FalseNegative);

        let ratio = |num: usize, den: usize| {
            if den == 0 {
                0.0
            } else {
                num as f64 / den as f64
            }
        };
        let precision = ratio(correct, correct + false_positives);
        let recall = ratio(correct, correct + false_negatives);
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            algorithm: algorithm.to_string(),
            threshold: threshold.value(),
            total,
            correct,
            false_positives,
            false_negatives,
            accuracy: ratio(correct, total) * 100.0,
            precision,
            recall,
            f1_score,
            details,
        }
    }
}

/// Evaluate a matcher over labeled cases at one threshold
pub fn evaluate(
    matcher: &FuzzyMatcher,
    cases: &[LabeledCase],
    tiers: &[PreparedInventory<'_>],
    threshold: Threshold,
) -> AccuracyReport {
    let details = cases
        .iter()
        .map(|case| {
            let result = matcher.match_ingredient(&case.ingredient, tiers, threshold);
            let actual = result.matched_name();
            CaseDetail {
                ingredient: case.ingredient.clone(),
                expected: case.expected.clone(),
                actual: actual.map(str::to_string),
                score: if result.matched { result.score } else { 0.0 },
                outcome: CaseOutcome::classify(case.expected.as_deref(), actual),
            }
        })
        .collect();

    let report = AccuracyReport::from_details(matcher.scorer_name(), threshold, details);
    debug!(
        "Evaluated {} at {}: accuracy={:.1}%, f1={:.3}",
        report.algorithm, threshold, report.accuracy, report.f1_score
    );
    report
}

/// Reports of a threshold sweep and the recommended threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSweep {
    pub optimal_threshold: f64,
    pub best_f1_score: f64,
    pub reports: Vec<AccuracyReport>,
}

/// Evaluate every threshold from `min` to `max` (inclusive) in `step` increments
///
/// The first threshold reaching the best F1 score is recommended.
pub fn optimize_threshold(
    matcher: &FuzzyMatcher,
    cases: &[LabeledCase],
    tiers: &[PreparedInventory<'_>],
    min: Threshold,
    max: Threshold,
    step: f64,
) -> Result<ThresholdSweep, MatcherError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(MatcherError::InvalidConfig(format!(
            "threshold sweep step must be positive, got {step}"
        )));
    }
    if min > max {
        return Err(MatcherError::InvalidConfig(format!(
            "threshold sweep range is empty: {min} > {max}"
        )));
    }

    let span = ((max.value() - min.value()) / step + 1e-9).floor();
    if span >= MAX_SWEEP_STEPS as f64 {
        return Err(MatcherError::InvalidConfig(format!(
            "threshold sweep step {step} needs more than {MAX_SWEEP_STEPS} evaluations"
        )));
    }
    let steps = span as usize;
    let mut reports = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let threshold = Threshold::new(min.value() + i as f64 * step)?;
        reports.push(evaluate(matcher, cases, tiers, threshold));
    }

    let mut best = &reports[0];
    for report in &reports[1..] {
        if report.f1_score > best.f1_score {
            best = report;
        }
    }

    info!(
        "Optimal threshold for {}: {}% (F1 {:.3})",
        best.algorithm, best.threshold, best.f1_score
    );
    Ok(ThresholdSweep {
        optimal_threshold: best.threshold,
        best_f1_score: best.f1_score,
        reports,
    })
}

/// Evaluate every built-in similarity strategy at one threshold
pub fn compare_algorithms(
    normalizer: &IngredientNormalizer,
    cases: &[LabeledCase],
    pantry: &Inventory,
    commissary: &Inventory,
    threshold: Threshold,
) -> Vec<AccuracyReport> {
    SimilarityAlgorithm::ALL
        .iter()
        .map(|algorithm| {
            let matcher = FuzzyMatcher::new(normalizer.clone(), *algorithm);
            let tiers = [matcher.prepare(pantry), matcher.prepare(commissary)];
            evaluate(&matcher, cases, &tiers, threshold)
        })
        .collect()
}

/// Best report of a comparison by F1, first on ties
pub fn best_algorithm(reports: &[AccuracyReport]) -> Option<&AccuracyReport> {
    let mut best: Option<&AccuracyReport> = None;
    for report in reports {
        if best.map_or(true, |b| report.f1_score > b.f1_score) {
            best = Some(report);
        }
    }
    best
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl ScoreSummary {
    pub fn from_scores(mut scores: Vec<f64>) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        scores.sort_by(f64::total_cmp);

        let count = scores.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (scores[mid - 1] + scores[mid]) / 2.0
        } else {
            scores[mid]
        };

        Self {
            count,
            min: scores[0],
            max: scores[count - 1],
            mean: scores.iter().sum::<f64>() / count as f64,
            median,
        }
    }
}

/// Scores of correct and incorrect matches in a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub correct: ScoreSummary,
    pub incorrect: ScoreSummary,
}

impl ScoreDistribution {
    /// Only cases that produced a match contribute
    pub fn from_report(report: &AccuracyReport) -> Self {
        let matched = report.details.iter().filter(|d| d.actual.is_some());
        let (correct, incorrect): (Vec<&CaseDetail>, Vec<&CaseDetail>) =
            matched.partition(|d| d.outcome == CaseOutcome::Correct);

        Self {
            correct: ScoreSummary::from_scores(correct.iter().map(|d| d.score).collect()),
            incorrect: ScoreSummary::from_scores(incorrect.iter().map(|d| d.score).collect()),
        }
    }
}

/// Full tuning run over one inventory snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningSummary {
    pub generated_at: DateTime<Utc>,
    pub normalization_accuracy: f64,
    pub current: AccuracyReport,
    pub sweep: ThresholdSweep,
    pub algorithms: Vec<AccuracyReport>,
    pub distribution: ScoreDistribution,
}

impl TuningSummary {
    /// Evaluate at `threshold`, sweep 60..=95 in steps of 5 and compare algorithms
    pub fn run(
        matcher: &FuzzyMatcher,
        cases: &[LabeledCase],
        pantry: &Inventory,
        commissary: &Inventory,
        threshold: Threshold,
    ) -> Result<Self, MatcherError> {
        let tiers = [matcher.prepare(pantry), matcher.prepare(commissary)];
        let current = evaluate(matcher, cases, &tiers, threshold);
        let sweep = optimize_threshold(
            matcher,
            cases,
            &tiers,
            Threshold::new(60.0)?,
            Threshold::new(95.0)?,
            5.0,
        )?;
        let algorithms =
            compare_algorithms(matcher.normalizer(), cases, pantry, commissary, threshold);
        let distribution = ScoreDistribution::from_report(&current);

        Ok(Self {
            generated_at: Utc::now(),
            normalization_accuracy: normalization_accuracy(
                matcher.normalizer(),
                &default_normalization_cases(),
            ),
            current,
            sweep,
            algorithms,
            distribution,
        })
    }

    /// Plain-text report
    pub fn render(&self) -> String {
        let current = &self.current;
        let mut lines = vec![
            "INGREDIENT MATCHER ACCURACY REPORT".to_string(),
            "=".repeat(50),
            format!("Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
            format!("Algorithm: {}", current.algorithm),
            format!("Current threshold: {}%", current.threshold),
            format!("Normalization accuracy: {:.1}%", self.normalization_accuracy),
            String::new(),
            format!("ACCURACY METRICS (Threshold: {}%)", current.threshold),
            "-".repeat(30),
            format!("Total test cases: {}", current.total),
            format!("Accuracy: {:.1}%", current.accuracy),
            format!("Precision: {:.3}", current.precision),
            format!("Recall: {:.3}", current.recall),
            format!("F1 Score: {:.3}", current.f1_score),
            format!("Correct matches: {}", current.correct),
            format!("False positives: {}", current.false_positives),
            format!("False negatives: {}", current.false_negatives),
            String::new(),
            "DETAILED RESULTS".to_string(),
            "-".repeat(30),
        ];

        for detail in &current.details {
            let symbol = if detail.outcome.is_correct() { "✓" } else { "✗" };
            lines.push(format!(
                "{} {} -> {} (score: {:.1}, expected: {})",
                symbol,
                detail.ingredient,
                detail.actual.as_deref().unwrap_or("NO_MATCH"),
                detail.score,
                detail.expected.as_deref().unwrap_or("NO_MATCH"),
            ));
        }

        lines.push(String::new());
        lines.push("OPTIMAL THRESHOLD RECOMMENDATION".to_string());
        lines.push("-".repeat(30));
        for report in &self.sweep.reports {
            lines.push(format!(
                "Threshold {}%: Accuracy={:.1}%, F1={:.3}, Precision={:.3}, Recall={:.3}",
                report.threshold, report.accuracy, report.f1_score, report.precision, report.recall
            ));
        }
        lines.push(format!("Recommended threshold: {}%", self.sweep.optimal_threshold));
        lines.push(format!("Expected F1 score: {:.3}", self.sweep.best_f1_score));

        lines.push(String::new());
        lines.push("ALGORITHM COMPARISON".to_string());
        lines.push("-".repeat(30));
        for report in &self.algorithms {
            lines.push(format!(
                "{:<18} F1: {:.3} Accuracy: {:.1}%",
                report.algorithm, report.f1_score, report.accuracy
            ));
        }
        if let Some(best) = best_algorithm(&self.algorithms) {
            lines.push(format!("Best algorithm: {} (F1: {:.3})", best.algorithm, best.f1_score));
        }

        lines.push(String::new());
        lines.push("MATCH SCORE ANALYSIS".to_string());
        lines.push("-".repeat(30));
        for (label, summary) in [
            ("Correct matches", &self.distribution.correct),
            ("Incorrect matches", &self.distribution.incorrect),
        ] {
            lines.push(format!("{}: {} samples", label, summary.count));
            lines.push(format!("  Score range: {:.1} - {:.1}", summary.min, summary.max));
            lines.push(format!("  Mean: {:.1}", summary.mean));
            lines.push(format!("  Median: {:.1}", summary.median));
        }

        lines.join("\n")
    }
}
