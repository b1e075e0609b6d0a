//! # Inventory Module
//!
//! Inventory value types consumed by the matcher and the validating adapter
//! that builds them from loosely shaped records (spreadsheet rows, JSON).
//!
//! ## Core Concepts
//!
//! - **InventoryRecord**: boundary shape, every field optional; accepts both
//!   `name` and the spreadsheet-style `Item` key
//! - **InventoryItem**: a well-typed item with a canonical name, synonyms and
//!   the tier it belongs to
//! - **Inventory**: an ordered list of items from one tier
//! - **SynonymTable**: equivalence groups of ingredient names, keyed by their
//!   normalized form
//!
//! ## Usage
//!
//! ```rust
//! use pantry_matcher::inventory::{sample_pantry, SynonymTable, Tier};
//! use pantry_matcher::normalizer::IngredientNormalizer;
//!
//! let normalizer = IngredientNormalizer::new();
//! let synonyms = SynonymTable::builtin(&normalizer);
//! let pantry = sample_pantry(&synonyms);
//!
//! assert_eq!(pantry.tier, Tier::Pantry);
//! let onions = pantry.items.iter().find(|i| i.canonical_name == "Green Onions").unwrap();
//! assert!(onions.synonyms.contains(&"scallion".to_string()));
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::MatcherError;
use crate::normalizer::IngredientNormalizer;

/// Inventory tier, in lookup priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Already on hand; checked first
    Pantry,
    /// Available from the commissary; checked second
    Commissary,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Pantry => "pantry",
            Tier::Commissary => "commissary",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loosely shaped inventory row as it arrives from an upload or a sample file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(default, alias = "Item", alias = "item", alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "Category")]
    pub category: Option<String>,
    #[serde(default, alias = "Vendor")]
    pub vendor: Option<String>,
    #[serde(default, alias = "Unit")]
    pub unit: Option<String>,
}

impl InventoryRecord {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_vendor(mut self, vendor: &str) -> Self {
        self.vendor = Some(vendor.to_string());
        self
    }
}

/// One ingredient available from a tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Display and reference name (e.g. "Green Onions")
    pub canonical_name: String,
    /// Alternate names matched with the same priority as the canonical name
    #[serde(default)]
    pub synonyms: Vec<String>,
    pub tier: Tier,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl InventoryItem {
    pub fn new(canonical_name: &str, tier: Tier) -> Self {
        Self {
            canonical_name: canonical_name.to_string(),
            synonyms: Vec::new(),
            tier,
            category: None,
            vendor: None,
            unit: None,
        }
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Validate a boundary record into an item
    ///
    /// Fails with [`MatcherError::InvalidRecord`] when the record has no
    /// non-blank name. Optional fields that are blank become `None`.
    pub fn try_from_record(record: InventoryRecord, tier: Tier) -> Result<Self, MatcherError> {
        let name = non_blank(record.name).ok_or_else(|| {
            MatcherError::InvalidRecord(format!("{tier} record has no name"))
        })?;

        Ok(Self {
            canonical_name: name,
            synonyms: Vec::new(),
            tier,
            category: non_blank(record.category),
            vendor: non_blank(record.vendor),
            unit: non_blank(record.unit),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Immutable snapshot of one tier's items, in iteration (tie-break) order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub tier: Tier,
    pub items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new(tier: Tier, items: Vec<InventoryItem>) -> Self {
        Self { tier, items }
    }

    pub fn empty(tier: Tier) -> Self {
        Self::new(tier, Vec::new())
    }

    /// Build an inventory from boundary records
    ///
    /// Records without a name are skipped with a warning; the rest keep their
    /// original order and receive synonyms from `synonyms`.
    pub fn from_records<I>(tier: Tier, records: I, synonyms: &SynonymTable) -> Self
    where
        I: IntoIterator<Item = InventoryRecord>,
    {
        let mut items = Vec::new();
        let mut skipped = 0usize;

        for (index, record) in records.into_iter().enumerate() {
            match InventoryItem::try_from_record(record, tier) {
                Ok(mut item) => {
                    item.synonyms = synonyms.synonyms_for(&item.canonical_name);
                    items.push(item);
                }
                Err(e) => {
                    warn!("Skipping {} record #{}: {}", tier, index, e);
                    skipped += 1;
                }
            }
        }

        debug!(
            "Built {} inventory: {} items, {} skipped",
            tier,
            items.len(),
            skipped
        );
        Self { tier, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Equivalence groups used to populate `InventoryItem::synonyms`
const BUILTIN_SYNONYM_GROUPS: &[&[&str]] = &[
    &["scallion", "green onion", "spring onion"],
    &["cilantro", "coriander", "chinese parsley"],
    &["bell pepper", "sweet pepper", "capsicum"],
    &["zucchini", "courgette"],
    &["eggplant", "aubergine"],
    &["romaine", "romaine lettuce", "cos lettuce"],
    &["ground beef", "beef mince"],
    &["ground turkey", "turkey mince"],
    &["chicken breast", "chicken breast meat"],
    &["olive oil", "evoo"],
    &["coconut oil", "unrefined coconut oil"],
    &["sea salt", "kosher salt", "salt"],
    &["black pepper", "pepper"],
];

/// Lookup from a normalized ingredient name to its equivalent names
///
/// Every name is stored in normalized form, so lookups work for any spelling
/// that normalizes the same way ("Green Onions", "green onion").
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    normalizer: IngredientNormalizer,
    entries: HashMap<String, Vec<String>>,
}

impl SynonymTable {
    /// An empty table; items built with it have no synonyms
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table of common ingredient equivalences
    pub fn builtin(normalizer: &IngredientNormalizer) -> Self {
        let mut table = Self {
            normalizer: normalizer.clone(),
            entries: HashMap::new(),
        };
        for group in BUILTIN_SYNONYM_GROUPS {
            table.add_group(group.iter().copied());
        }
        table
    }

    /// Register a group of mutually equivalent names
    pub fn add_group<'s, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'s str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for name in names {
            let key = self.normalizer.normalize(name);
            if !key.is_empty() && !normalized.contains(&key) {
                normalized.push(key);
            }
        }

        for key in &normalized {
            let entry = self.entries.entry(key.clone()).or_default();
            for other in normalized.iter().filter(|other| *other != key) {
                if !entry.contains(other) {
                    entry.push(other.clone());
                }
            }
        }
    }

    /// Equivalent names of `name`, in normalized form; empty when unknown
    pub fn synonyms_for(&self, name: &str) -> Vec<String> {
        let key = self.normalizer.normalize(name);
        self.entries.get(&key).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Built-in pantry used when no inventory is uploaded
pub fn sample_pantry(synonyms: &SynonymTable) -> Inventory {
    let records = [
        ("Chicken Breast", "Protein"),
        ("Green Onions", "Vegetables"),
        ("Bell Peppers", "Vegetables"),
        ("Olive Oil", "Oils"),
        ("Sea Salt", "Seasonings"),
        ("Black Pepper", "Seasonings"),
        ("Ground Beef", "Protein"),
        ("Sweet Potatoes", "Vegetables"),
        ("Avocados", "Vegetables"),
        ("Coconut Oil", "Oils"),
    ]
    .into_iter()
    .map(|(name, category)| {
        InventoryRecord::named(name)
            .with_category(category)
            .with_vendor("Pantry")
    });

    Inventory::from_records(Tier::Pantry, records, synonyms)
}

/// Built-in commissary used when no inventory is uploaded
pub fn sample_commissary(synonyms: &SynonymTable) -> Inventory {
    let records = [
        ("Turkey Mince", "Protein"),
        ("Zucchini", "Vegetables"),
        ("Carrots", "Vegetables"),
        ("Broccoli", "Vegetables"),
        ("Spinach", "Vegetables"),
        ("Cauliflower", "Vegetables"),
        ("Garlic", "Seasonings"),
        ("Onions", "Vegetables"),
        ("Tomatoes", "Vegetables"),
        ("Cucumbers", "Vegetables"),
    ]
    .into_iter()
    .map(|(name, category)| {
        InventoryRecord::named(name)
            .with_category(category)
            .with_vendor("Commissary")
    });

    Inventory::from_records(Tier::Commissary, records, synonyms)
}
