//! Recipe value type and the tolerant adapter for recipe records.
//!
//! Recipe search results arrive with ingredient entries of mixed shape: plain
//! strings, or objects carrying a `name` and/or the `original` recipe line.
//! [`RecipeRecord::into_recipe`] keeps every usable entry in order and drops
//! the rest with a warning.

use log::warn;
use serde::{Deserialize, Serialize};

/// A recipe as seen by the scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    pub ingredients: Vec<String>,
}

impl Recipe {
    pub fn new<I, S>(id: u64, title: &str, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            title: title.to_string(),
            ingredients: ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

/// One ingredient entry as delivered by a recipe source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientEntry {
    Text(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        original: Option<String>,
    },
    Other(serde_json::Value),
}

impl IngredientEntry {
    /// Usable ingredient text: the string itself, else `name`, else `original`
    pub fn text(&self) -> Option<&str> {
        let candidate = match self {
            IngredientEntry::Text(text) => Some(text.as_str()),
            IngredientEntry::Detailed { name, original } => name
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .or(original.as_deref()),
            IngredientEntry::Other(_) => None,
        };
        candidate.filter(|text| !text.trim().is_empty())
    }
}

/// Loosely shaped recipe from an external search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientEntry>,
}

impl RecipeRecord {
    /// Convert into a [`Recipe`], skipping entries with no usable text
    pub fn into_recipe(self) -> Recipe {
        let mut ingredients = Vec::with_capacity(self.ingredients.len());
        for (index, entry) in self.ingredients.iter().enumerate() {
            match entry.text() {
                Some(text) => ingredients.push(text.to_string()),
                None => warn!(
                    "Skipping ingredient #{} of recipe '{}': no usable text in {:?}",
                    index, self.title, entry
                ),
            }
        }

        let title = if self.title.trim().is_empty() {
            "Unknown".to_string()
        } else {
            self.title
        };

        Recipe {
            id: self.id,
            title,
            ingredients,
        }
    }
}

impl From<RecipeRecord> for Recipe {
    fn from(record: RecipeRecord) -> Self {
        record.into_recipe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_ingredient_entries() {
        let record: RecipeRecord = serde_json::from_str(
            r#"{
                "id": 42,
                "title": "Stir Fry",
                "ingredients": [
                    "2 cups broccoli",
                    {"name": "garlic", "original": "3 cloves garlic, minced"},
                    {"original": "1 tbsp olive oil"},
                    {"name": "", "original": "salt"},
                    17,
                    null,
                    {"amount": 2},
                    "   "
                ]
            }"#,
        )
        .unwrap();

        let recipe = record.into_recipe();
        assert_eq!(recipe.id, 42);
        assert_eq!(
            recipe.ingredients,
            vec!["2 cups broccoli", "garlic", "1 tbsp olive oil", "salt"]
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let record: RecipeRecord = serde_json::from_str("{}").unwrap();
        let recipe = Recipe::from(record);
        assert_eq!(recipe.id, 0);
        assert_eq!(recipe.title, "Unknown");
        assert!(recipe.ingredients.is_empty());
    }
}
