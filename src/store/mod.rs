pub mod models;

use crate::error::{Error, Result};
use models::RecipeRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// In-memory recipe metadata store, keyed by recipe id.
///
/// Loaded wholesale at service start from the newline-delimited JSON file
/// produced by the ingestion pipeline, and read-only afterwards. Query paths
/// share it behind an `Arc`.
#[derive(Debug)]
pub struct MetadataStore {
    recipes: HashMap<i64, RecipeRecord>,
}

impl MetadataStore {
    /// Load the metadata file (one JSON recipe per line, blank lines skipped).
    ///
    /// A malformed line is a construction-time error: a partially loaded
    /// corpus would silently mis-rank, so refuse to start instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::MetadataFormat(format!("Cannot open {}: {e}", path.display()))
        })?;

        let mut recipes = HashMap::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RecipeRecord = serde_json::from_str(&line).map_err(|e| {
                Error::MetadataFormat(format!(
                    "{}:{}: invalid recipe record: {e}",
                    path.display(),
                    line_no + 1
                ))
            })?;
            recipes.insert(record.id, record);
        }

        info!("Loaded {} recipes from {}", recipes.len(), path.display());

        Ok(Self { recipes })
    }

    /// Build a store from already-materialized records (tests, embedding).
    pub fn from_records(records: Vec<RecipeRecord>) -> Self {
        let recipes = records.into_iter().map(|r| (r.id, r)).collect();
        Self { recipes }
    }

    pub fn get(&self, id: i64) -> Option<&RecipeRecord> {
        self.recipes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Iterate all records (ingestion-time index building).
    pub fn records(&self) -> impl Iterator<Item = &RecipeRecord> {
        self.recipes.values()
    }
}
