#[cfg(test)]
mod tests {
    use pantry_matcher::inventory::{SynonymTable, Tier};
    use pantry_matcher::loader::{load_inventory, load_inventory_records, load_recipes};
    use pantry_matcher::normalizer::IngredientNormalizer;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_spreadsheet_style_inventory() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "pantry.json",
            r#"[
                {"Item": "Green Onions", "Category": "Vegetables", "Vendor": "Pantry"},
                {"Category": "Oils"},
                {"name": "Olive Oil", "unit": "bottle"},
                {"Item": "   "}
            ]"#,
        );

        let records = load_inventory_records(&path).unwrap();
        assert_eq!(records.len(), 4);

        let synonyms = SynonymTable::builtin(&IngredientNormalizer::new());
        let inventory = load_inventory(&path, Tier::Pantry, &synonyms).unwrap();
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.items[0].canonical_name, "Green Onions");
        assert!(inventory.items[0].synonyms.contains(&"scallion".to_string()));
        assert_eq!(inventory.items[1].unit.as_deref(), Some("bottle"));
    }

    #[test]
    fn test_load_recipe_list_and_search_response() {
        let dir = TempDir::new().unwrap();
        let list = write_file(
            &dir,
            "list.json",
            r#"[{"id": 1, "title": "Soup", "ingredients": ["2 carrots", {"original": "1 onion"}]}]"#,
        );
        let search = write_file(
            &dir,
            "search.json",
            r#"{"results": [{"id": 7, "title": "Salad", "ingredients": [{"name": "spinach"}, 3]}]}"#,
        );

        let recipes = load_recipes(&list).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].ingredients, vec!["2 carrots", "1 onion"]);

        let recipes = load_recipes(&search).unwrap();
        assert_eq!(recipes[0].id, 7);
        assert_eq!(recipes[0].ingredients, vec!["spinach"]);
    }

    #[test]
    fn test_malformed_inventory_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "pantry.json",
            r#"[
                {"Item": "Garlic"},
                {"Item": "Olive Oil", "Unit": 12},
                {"Item": 42},
                "Butter",
                {"Item": "Butter", "Category": "Dairy"}
            ]"#,
        );

        let records = load_inventory_records(&path).unwrap();
        assert_eq!(records.len(), 2);

        let synonyms = SynonymTable::builtin(&IngredientNormalizer::new());
        let inventory = load_inventory(&path, Tier::Pantry, &synonyms).unwrap();
        let names: Vec<&str> = inventory
            .items
            .iter()
            .map(|item| item.canonical_name.as_str())
            .collect();
        assert_eq!(names, vec!["Garlic", "Butter"]);
        assert_eq!(inventory.items[1].category.as_deref(), Some("Dairy"));
    }

    #[test]
    fn test_malformed_recipes_are_skipped() {
        let dir = TempDir::new().unwrap();
        let list = write_file(
            &dir,
            "list.json",
            r#"[
                {"id": 1, "title": "Soup", "ingredients": ["2 carrots"]},
                {"id": "abc", "title": null, "ingredients": ["salt"]},
                {"id": 3, "title": "Salad", "ingredients": "spinach"},
                {"id": 4, "title": "Toast", "ingredients": ["bread"]}
            ]"#,
        );
        let search = write_file(
            &dir,
            "search.json",
            r#"{"results": [{"id": "x"}, {"id": 9, "title": "Stew", "ingredients": ["beef"]}]}"#,
        );

        let recipes = load_recipes(&list).unwrap();
        let ids: Vec<u64> = recipes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);

        let recipes = load_recipes(&search).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Stew");
    }

    #[test]
    fn test_wrong_top_level_shape_is_an_error() {
        let dir = TempDir::new().unwrap();
        let inventory = write_file(&dir, "pantry.json", r#"{"Item": "Garlic"}"#);
        let err = load_inventory_records(&inventory).unwrap_err();
        assert!(err.to_string().contains("expected an array of records"));

        let recipes = write_file(&dir, "recipes.json", r#"{"data": []}"#);
        let err = load_recipes(&recipes).unwrap_err();
        assert!(err.to_string().contains("expected a `results` array"));
    }

    #[test]
    fn test_load_errors_carry_context() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_recipes(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read recipe file"));

        let broken = write_file(&dir, "broken.json", "{not json");
        let err = load_inventory_records(&broken).unwrap_err();
        assert!(err.to_string().contains("Failed to parse inventory file"));
    }
}
