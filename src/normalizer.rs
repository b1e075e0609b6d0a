//! # Ingredient Normalizer Module
//!
//! This module canonicalizes free-text ingredient lines into a minimal
//! lowercase form suitable for similarity comparison.
//!
//! ## Features
//!
//! - Quantity stripping: integers, decimals, fractions (`1/2`, `2 1/4`),
//!   ranges (`2-3`, `1 to 2`) and unicode fractions (`½`)
//! - Unit stripping, both after a quantity (`2 tbsp`, `500g`) and as
//!   standalone words (`garlic cloves`)
//! - Stop-word removal for preparation descriptors and filler words
//!   (`fresh`, `chopped`, `extra virgin`, `of`, `to taste`, ...)
//! - Preserved phrases that keep a descriptor when it is part of the name
//!   (`ground beef`)
//! - Plural folding on the final word (`tomatoes` -> `tomato`)
//!
//! Normalization is deterministic and never fails: empty or whitespace-only
//! input produces an empty string, which the matcher treats as "no match
//! possible".
//!
//! ## Usage
//!
//! ```rust
//! use pantry_matcher::normalizer::IngredientNormalizer;
//!
//! let normalizer = IngredientNormalizer::new();
//! assert_eq!(normalizer.normalize("2 tbsp extra virgin olive oil"), "olive oil");
//! assert_eq!(normalizer.normalize("2 lbs ground beef"), "ground beef");
//! assert_eq!(normalizer.normalize("   "), "");
//! ```

use lazy_static::lazy_static;
use log::{debug, trace, warn};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// Numeric quantities: mixed numbers and fractions, decimals and ranges
const QUANTITY_PATTERN: &str = r"\b(?:(?:\d+\s+)?\d+\s*[/⁄]\s*\d+|\d+(?:[.,]\d+)?(?:(?:\s*[-–]\s*|\s+to\s+)\d+(?:[.,]\d+)?)?)";

const FRACTION_PATTERN: &str = r"[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞]";

// Units that may directly follow a quantity ("2 tbsp", "500g", "1 lb.")
const UNIT_PATTERN: &str = r"cups?|tablespoons?|tbsps?|tbs|teaspoons?|tsps?|fl\.?\s*oz|fluid\s+ounces?|ounces?|oz|pounds?|lbs?|grams?|g|kilograms?|kg|mg|milliliters?|millilitres?|ml|liters?|litres?|l|pints?|quarts?|gallons?|inch(?:es)?|pieces?|pcs|slices?|cloves?|cans?|jars?|bottles?|packages?|pkgs?|sticks?|bunch(?:es)?|heads?|pinch(?:es)?|dash(?:es)?|handfuls?|sprigs?|stalks?|dozen";

pub const DEFAULT_MAX_NORMALIZED_LENGTH: usize = 100;

pub const DEFAULT_PRESERVED_PHRASES: &[&str] = &[
    "ground beef",
    "ground turkey",
    "ground pork",
    "ground lamb",
    "ground chicken",
    "ground bison",
];

lazy_static! {
    static ref QUANTITY_UNIT_REGEX: Regex = Regex::new(&format!(
        r"(?i)(?:{QUANTITY_PATTERN})(?:\s*(?:{UNIT_PATTERN})\b\.?|\b)|(?:{FRACTION_PATTERN})(?:\s*(?:{UNIT_PATTERN})\b\.?)?"
    ))
    .expect("Quantity pattern should be valid");
    static ref PARENTHETICAL_REGEX: Regex =
        Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("Parenthetical pattern should be valid");
}

/// Unit words removed wherever they appear, unless nothing else is left
static UNIT_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Volume
        "cup", "cups", "tablespoon", "tablespoons", "tbsp", "tbsps", "tbs", "teaspoon",
        "teaspoons", "tsp", "tsps", "fl", "pint", "pints", "quart", "quarts", "gallon",
        "gallons", "ml", "milliliter", "milliliters", "millilitre", "millilitres", "l", "liter",
        "liters", "litre", "litres",
        // Weight
        "oz", "ounce", "ounces", "lb", "lbs", "pound", "pounds", "g", "gram", "grams", "kg",
        "kilogram", "kilograms", "mg",
        // Count and container
        "piece", "pieces", "pcs", "slice", "slices", "clove", "cloves", "can", "cans", "jar",
        "jars", "bottle", "bottles", "package", "packages", "pkg", "pkgs", "stick", "sticks",
        "bunch", "bunches", "head", "heads", "pinch", "pinches", "dash", "dashes", "handful",
        "handfuls", "sprig", "sprigs", "stalk", "stalks", "dozen", "inch", "inches",
    ]
    .into_iter()
    .collect()
});

/// Preparation descriptors and filler words
static DEFAULT_STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // Preparation and state
        "fresh", "freshly", "frozen", "dried", "organic", "raw", "cooked", "chopped", "diced",
        "sliced", "minced", "grated", "shredded", "crushed", "whole", "ground", "powdered",
        "peeled", "seeded", "halved", "quartered", "trimmed", "rinsed", "drained", "softened",
        "melted", "divided", "packed", "finely", "roughly", "coarsely", "thinly", "boneless",
        "skinless",
        // Quality and packaging
        "extra", "virgin", "pure", "unsalted", "salted", "unsweetened", "sweetened", "low",
        "fat", "reduced", "sodium", "free", "range", "grade", "canned", "jarred", "bottled",
        "packaged", "refrigerated",
        // Size and age
        "large", "medium", "small", "baby", "young", "mature", "ripe", "unripe",
        // Filler
        "of", "the", "a", "an", "and", "or", "to", "taste", "for", "about", "approximately",
        "optional", "plus", "more", "heaping", "level", "x",
    ]
    .into_iter()
    .collect()
});

/// Configuration options for ingredient normalization
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Stop words removed in addition to the built-in list
    pub extra_stop_words: Vec<String>,
    /// Phrases kept intact even when they contain stop words
    pub preserved_phrases: Vec<String>,
    /// Whether to fold the plural of the final word
    pub fold_plurals: bool,
    /// Maximum length of the normalized text (cut at a word boundary)
    pub max_normalized_length: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            extra_stop_words: Vec::new(),
            preserved_phrases: DEFAULT_PRESERVED_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            fold_plurals: true,
            max_normalized_length: DEFAULT_MAX_NORMALIZED_LENGTH,
        }
    }
}

/// Canonicalizes raw ingredient text for fuzzy comparison
#[derive(Debug, Clone)]
pub struct IngredientNormalizer {
    config: NormalizerConfig,
    extra_stop_words: HashSet<String>,
    preserved: Vec<Vec<String>>,
}

impl IngredientNormalizer {
    /// Create a normalizer with the built-in vocabulary
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    /// Create a normalizer with custom configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pantry_matcher::normalizer::{IngredientNormalizer, NormalizerConfig};
    ///
    /// let config = NormalizerConfig {
    ///     extra_stop_words: vec!["smoked".to_string()],
    ///     ..Default::default()
    /// };
    /// let normalizer = IngredientNormalizer::with_config(config);
    /// assert_eq!(normalizer.normalize("1 tsp smoked paprika"), "paprika");
    /// ```
    pub fn with_config(config: NormalizerConfig) -> Self {
        let extra_stop_words = config
            .extra_stop_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let preserved = config
            .preserved_phrases
            .iter()
            .map(|p| p.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>())
            .filter(|p: &Vec<String>| !p.is_empty())
            .collect();

        debug!(
            "Creating IngredientNormalizer: extra_stop_words={}, preserved_phrases={}, fold_plurals={}",
            config.extra_stop_words.len(),
            config.preserved_phrases.len(),
            config.fold_plurals
        );

        Self {
            config,
            extra_stop_words,
            preserved,
        }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a raw ingredient line
    ///
    /// Returns an empty string when nothing comparable is left.
    pub fn normalize(&self, raw: &str) -> String {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return String::new();
        }

        let without_notes = PARENTHETICAL_REGEX.replace_all(&lowered, " ");
        let without_quantities = QUANTITY_UNIT_REGEX.replace_all(&without_notes, " ");
        let cleaned: String = without_quantities
            .chars()
            .filter(|c| *c != '\'' && *c != '’')
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();

        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());
        let mut units: Vec<&str> = Vec::new();

        let mut index = 0;
        while index < tokens.len() {
            if let Some(len) = self.preserved_phrase_at(&tokens[index..]) {
                kept.extend_from_slice(&tokens[index..index + len]);
                index += len;
                continue;
            }

            let token = tokens[index];
            if self.is_stop_word(token) || token.chars().all(char::is_numeric) {
                trace!("Dropping filler token '{}'", token);
            } else if UNIT_WORDS.contains(token) {
                units.push(token);
            } else {
                kept.push(token);
            }
            index += 1;
        }

        // A name made only of unit words ("whole cloves") keeps them
        if kept.is_empty() {
            kept = units;
        }

        let mut words: Vec<String> = kept.into_iter().map(str::to_string).collect();
        if self.config.fold_plurals {
            if let Some(last) = words.last_mut() {
                let folded = singularize(last);
                *last = folded;
            }
        }

        let normalized = self.limit_length(words.join(" "));
        trace!("Normalized ingredient: '{}' -> '{}'", raw, normalized);
        normalized
    }

    fn is_stop_word(&self, token: &str) -> bool {
        DEFAULT_STOP_WORDS.contains(token) || self.extra_stop_words.contains(token)
    }

    /// Length of the preserved phrase starting at the head of `tokens`, if any
    fn preserved_phrase_at(&self, tokens: &[&str]) -> Option<usize> {
        self.preserved
            .iter()
            .filter(|phrase| phrase.len() <= tokens.len())
            .find(|phrase| phrase.iter().zip(tokens).all(|(p, t)| p.as_str() == *t))
            .map(Vec::len)
    }

    fn limit_length(&self, name: String) -> String {
        let max = self.config.max_normalized_length;
        if name.chars().count() <= max {
            return name;
        }

        let truncated: String = name.chars().take(max).collect();
        // Try to cut at word boundary
        let result = match truncated.rfind(' ') {
            Some(last_space) => truncated[..last_space].to_string(),
            None => truncated,
        };
        warn!(
            "Normalized ingredient truncated due to length limit ({} > {}): '{}'",
            name.chars().count(),
            max,
            result
        );
        result
    }
}

impl Default for IngredientNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold the plural of a single lowercase word
///
/// # Examples
///
/// ```rust
/// use pantry_matcher::normalizer::singularize;
///
/// assert_eq!(singularize("tomatoes"), "tomato");
/// assert_eq!(singularize("berries"), "berry");
/// assert_eq!(singularize("peaches"), "peach");
/// assert_eq!(singularize("onions"), "onion");
/// assert_eq!(singularize("asparagus"), "asparagus");
/// ```
pub fn singularize(word: &str) -> String {
    let len = word.chars().count();
    if len <= 3 || !word.ends_with('s') {
        return word.to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if len > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    const ES_ENDINGS: [&str; 6] = ["oes", "ches", "shes", "xes", "zes", "sses"];
    if ES_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
        return word[..word.len() - 2].to_string();
    }
    word[..word.len() - 1].to_string()
}
