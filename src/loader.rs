//! JSON loaders for inventories and recipe lists.
//!
//! Inventory files are arrays of records (`{"Item": "Garlic", "Category": ...}`
//! or `{"name": "Garlic"}`). Recipe files are either an array of recipes or a
//! search response object with a `results` array. Rows are decoded one at a
//! time so a malformed row is skipped instead of failing the whole file.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::inventory::{Inventory, InventoryRecord, SynonymTable, Tier};
use crate::recipe::{Recipe, RecipeRecord};

fn read_json(path: &Path, kind: &str) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {}", kind, path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} file {}", kind, path.display()))
}

/// Decode each row on its own, warning about and dropping rows of the wrong shape
fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, kind: &str, path: &Path) -> Vec<T> {
    let mut decoded = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value(row) {
            Ok(record) => decoded.push(record),
            Err(e) => warn!(
                "Skipping {} row #{} in {}: {}",
                kind,
                index,
                path.display(),
                e
            ),
        }
    }
    decoded
}

/// Read raw inventory records from a JSON file
pub fn load_inventory_records(path: &Path) -> Result<Vec<InventoryRecord>> {
    let rows = match read_json(path, "inventory")? {
        Value::Array(rows) => rows,
        other => bail!(
            "Failed to parse inventory file {}: expected an array of records, found {}",
            path.display(),
            json_kind(&other)
        ),
    };
    Ok(decode_rows(rows, "inventory", path))
}

/// Read an inventory file and build a validated tier from it
pub fn load_inventory(path: &Path, tier: Tier, synonyms: &SynonymTable) -> Result<Inventory> {
    let records = load_inventory_records(path)?;
    let total = records.len();
    let inventory = Inventory::from_records(tier, records, synonyms);
    info!(
        "Loaded {} inventory from {}: {} of {} records usable",
        tier,
        path.display(),
        inventory.len(),
        total
    );
    Ok(inventory)
}

/// Read recipes from a JSON file, dropping unusable recipes and ingredient entries
pub fn load_recipes(path: &Path) -> Result<Vec<Recipe>> {
    let rows = match read_json(path, "recipe")? {
        Value::Array(rows) => rows,
        Value::Object(mut object) => match object.remove("results") {
            Some(Value::Array(rows)) => rows,
            _ => bail!(
                "Failed to parse recipe file {}: expected a `results` array",
                path.display()
            ),
        },
        other => bail!(
            "Failed to parse recipe file {}: expected an array or a search response, found {}",
            path.display(),
            json_kind(&other)
        ),
    };

    let recipes: Vec<Recipe> = decode_rows::<RecipeRecord>(rows, "recipe", path)
        .into_iter()
        .map(RecipeRecord::into_recipe)
        .collect();
    info!("Loaded {} recipes from {}", recipes.len(), path.display());
    Ok(recipes)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
