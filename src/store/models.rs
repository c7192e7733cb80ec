use serde::{Deserialize, Serialize};

/// A recipe as persisted by the ingestion pipeline.
///
/// The ingredient list is serialized under the legacy `ner` field name and
/// holds normalized ingredient keys. Duplicates are possible in source data;
/// ranking dedups them per recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: i64,
    pub title: String,
    #[serde(rename = "ner", default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub link: String,
}

/// Feasibility of a single recipe against the live pantry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feasibility {
    pub feasible: bool,
    pub available: Vec<String>,
    pub missing: Vec<String>,
}
