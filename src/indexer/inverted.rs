use crate::error::{Error, Result};
use crate::indexer::normalize::normalize_token;
use crate::store::models::RecipeRecord;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Inverted index mapping normalized ingredient keys to recipe ids.
///
/// Built once (at ingestion, or in-process from a loaded corpus) and
/// read-only at query time. Ids are deduped per key at build time, so a
/// recipe listing an ingredient twice is indexed once under that key.
pub struct IngredientIndex {
    buckets: HashMap<String, Vec<i64>>,
}

impl IngredientIndex {
    /// Build the index from recipe records, normalizing each ingredient with
    /// the same function used at query time.
    pub fn build<'a, I>(recipes: I) -> Self
    where
        I: IntoIterator<Item = &'a RecipeRecord>,
    {
        let mut buckets: HashMap<String, Vec<i64>> = HashMap::new();
        let mut seen: HashSet<(String, i64)> = HashSet::new();

        for recipe in recipes {
            for raw in &recipe.ingredients {
                let key = normalize_token(raw);
                if key.is_empty() {
                    continue;
                }
                if seen.insert((key.clone(), recipe.id)) {
                    buckets.entry(key).or_default().push(recipe.id);
                }
            }
        }

        Self { buckets }
    }

    /// Load the persisted index: a single JSON object mapping ingredient key
    /// to an array of recipe ids. A malformed file is a construction-time
    /// error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::IndexFormat(format!("Cannot open {}: {e}", path.display())))?;

        let buckets: HashMap<String, Vec<i64>> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                Error::IndexFormat(format!("{}: invalid ingredient index: {e}", path.display()))
            })?;

        info!(
            "Loaded ingredient index with {} unique ingredients from {}",
            buckets.len(),
            path.display()
        );

        Ok(Self { buckets })
    }

    /// Recipe ids containing the given normalized key; empty when absent.
    pub fn lookup(&self, key: &str) -> &[i64] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of unique ingredient keys.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, ingredients: &[&str]) -> RecipeRecord {
        RecipeRecord {
            id,
            title: format!("Recipe {id}"),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            directions: Vec::new(),
            source: String::new(),
            link: String::new(),
        }
    }

    #[test]
    fn test_build_normalizes_and_buckets() {
        let recipes = vec![
            record(1, &["Flour", "Eggs"]),
            record(2, &["flour", "sugar"]),
        ];
        let index = IngredientIndex::build(&recipes);

        assert_eq!(index.lookup("flour"), &[1, 2]);
        assert_eq!(index.lookup("egg"), &[1]);
        assert_eq!(index.lookup("sugar"), &[2]);
        assert!(index.lookup("butter").is_empty());
    }

    #[test]
    fn test_build_dedupes_repeated_ingredients() {
        // Source data may repeat an ingredient within one recipe.
        let recipes = vec![record(1, &["egg", "eggs", "Egg"])];
        let index = IngredientIndex::build(&recipes);

        assert_eq!(index.lookup("egg"), &[1]);
    }

    #[test]
    fn test_build_skips_degenerate_keys() {
        let recipes = vec![record(1, &["", "2 cups", "salt"])];
        let index = IngredientIndex::build(&recipes);

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("salt"), &[1]);
    }
}
