pub mod exact;
mod hybrid;
pub mod semantic;

pub use semantic::SemanticSearch;

use crate::config::{SearchConfig, Settings};
use crate::error::Result;
use crate::indexer::{normalize_ingredients, IngredientIndex};
use crate::pantry::PantryProvider;
use crate::store::models::{Feasibility, RecipeRecord};
use crate::store::MetadataStore;
use futures::future::OptionFuture;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// A scored candidate before metadata resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: i64,
    pub score: f64,
    pub pantry_used: usize,
    pub missing: Vec<String>,
}

/// A fully resolved hybrid result row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRecipe {
    pub record: RecipeRecord,
    pub score: f64,
    pub pantry_used: usize,
    pub missing: Vec<String>,
}

/// The retrieval service: read-only indices plus the optional semantic
/// capability, explicitly constructed and passed to callers rather than held
/// in process-wide globals. All query methods take `&self` and are safe to
/// call concurrently.
pub struct RecipeSearch {
    store: Arc<MetadataStore>,
    index: Arc<IngredientIndex>,
    semantic: Option<SemanticSearch>,
    pantry_provider: Option<Arc<dyn PantryProvider>>,
    config: SearchConfig,
    /// Deadline for the whole semantic stage inside hybrid ranking, covering
    /// the request timeout across retries.
    semantic_stage_timeout: Duration,
}

impl RecipeSearch {
    /// Load the persisted indices and connect the optional vector backend.
    ///
    /// A missing or malformed index file fails construction; an unreachable
    /// vector backend only disables semantic ranking.
    pub async fn open(settings: &Settings) -> Result<Self> {
        let store = Arc::new(MetadataStore::load(settings.data.metadata_path())?);
        let index = Arc::new(IngredientIndex::load(settings.data.index_path())?);

        let semantic = match SemanticSearch::connect(&settings.vector).await {
            Ok(semantic) => semantic,
            Err(e) => {
                warn!("Vector backend unavailable; semantic search disabled: {e}");
                None
            }
        };

        Ok(Self::new(store, index, semantic, settings))
    }

    /// Assemble a service from preloaded parts (tests, embedding callers).
    pub fn new(
        store: Arc<MetadataStore>,
        index: Arc<IngredientIndex>,
        semantic: Option<SemanticSearch>,
        settings: &Settings,
    ) -> Self {
        let stage_timeout = Duration::from_secs(
            settings.vector.timeout_seconds * (u64::from(settings.vector.max_retries) + 1),
        );

        Self {
            store,
            index,
            semantic,
            pantry_provider: None,
            config: settings.search.clone(),
            semantic_stage_timeout: stage_timeout,
        }
    }

    /// Attach the external pantry inventory provider used to auto-fill
    /// omitted pantry arguments.
    pub fn with_pantry_provider(mut self, provider: Arc<dyn PantryProvider>) -> Self {
        self.pantry_provider = Some(provider);
        self
    }

    pub fn recipe_count(&self) -> usize {
        self.store.len()
    }

    pub fn ingredient_count(&self) -> usize {
        self.index.len()
    }

    pub fn semantic_enabled(&self) -> bool {
        self.semantic.is_some()
    }

    /// Resolve a recipe id to its record.
    pub fn recipe(&self, id: i64) -> Option<&RecipeRecord> {
        self.store.get(id)
    }

    /// Exact ingredient-overlap ranking (the LEFTOVR score).
    ///
    /// An empty pantry yields an empty list. `top_k` is capped by the
    /// configured maximum.
    pub fn exact_match_rank(
        &self,
        pantry_items: &[String],
        allow_missing: usize,
        top_k: usize,
    ) -> Vec<RankedCandidate> {
        exact::rank(
            &self.store,
            &self.index,
            pantry_items,
            allow_missing,
            top_k.min(self.config.max_top_k),
        )
    }

    /// Semantic similarity ranking. Degrades to an empty list when the
    /// backend is unconfigured or failing; the distinction is logged here
    /// but deliberately not surfaced to callers.
    pub async fn semantic_rank(
        &self,
        query_text: Option<&str>,
        pantry_items: Option<&[String]>,
        k: usize,
    ) -> Vec<(i64, f32)> {
        let Some(semantic) = &self.semantic else {
            debug!("Semantic rank requested but backend is not configured");
            return Vec::new();
        };

        match semantic
            .search(query_text, pantry_items, k.min(self.config.max_top_k))
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Semantic search failed, returning no semantic candidates: {e}");
                Vec::new()
            }
        }
    }

    /// Hybrid waste-aware ranking: exact-match candidates refined by
    /// semantic similarity, resolved to full recipe records.
    ///
    /// When `pantry_items` is `None` the attached pantry provider supplies
    /// the current inventory. Both ranking stages run concurrently over the
    /// configured candidate pool; semantic failure or timeout silently
    /// falls back to pure exact-match ordering.
    pub async fn hybrid_rank(
        &self,
        pantry_items: Option<&[String]>,
        query_text: Option<&str>,
        top_k: usize,
        allow_missing: usize,
        use_semantic: bool,
    ) -> Vec<RankedRecipe> {
        let pantry: Vec<String> = match pantry_items {
            Some(items) => items.to_vec(),
            None => match &self.pantry_provider {
                Some(provider) => {
                    let inventory = provider.get_inventory();
                    debug!("Auto-filled {} pantry items from provider", inventory.len());
                    inventory
                        .into_iter()
                        .map(|item| item.ingredient_name)
                        .collect()
                }
                None => {
                    warn!("No pantry items provided and no pantry provider attached");
                    Vec::new()
                }
            },
        };

        if pantry.is_empty() {
            return Vec::new();
        }

        let pool = self.config.candidate_pool;

        // Kick the network-bound semantic stage off first so it overlaps
        // with the in-memory exact-match scan.
        let semantic_task = if use_semantic {
            self.semantic.clone().map(|semantic| {
                let query = query_text.map(str::to_string);
                let items = pantry.clone();
                let stage_timeout = self.semantic_stage_timeout;
                tokio::spawn(async move {
                    timeout(stage_timeout, async {
                        semantic.search(query.as_deref(), Some(&items), pool).await
                    })
                    .await
                })
            })
        } else {
            None
        };

        let exact = exact::rank(&self.store, &self.index, &pantry, allow_missing, pool);

        let semantic_hits: Vec<(i64, f32)> = match OptionFuture::from(semantic_task).await {
            None => Vec::new(),
            Some(Ok(Ok(Ok(hits)))) => hits,
            Some(Ok(Ok(Err(e)))) => {
                warn!("Semantic stage failed; falling back to exact-match ranking: {e}");
                Vec::new()
            }
            Some(Ok(Err(_))) => {
                warn!(
                    "Semantic stage timed out after {:?}; falling back to exact-match ranking",
                    self.semantic_stage_timeout
                );
                Vec::new()
            }
            Some(Err(e)) => {
                warn!("Semantic stage task failed: {e}");
                Vec::new()
            }
        };

        let pantry_keys: HashSet<String> = if self.config.include_semantic_only {
            normalize_ingredients(&pantry).into_iter().collect()
        } else {
            HashSet::new()
        };
        let admission = if self.config.include_semantic_only {
            Some(hybrid::Admission {
                store: self.store.as_ref(),
                pantry: &pantry_keys,
            })
        } else {
            None
        };

        let mut fused = hybrid::fuse(
            exact,
            &semantic_hits,
            self.config.semantic_bonus,
            admission,
        );
        fused.truncate(top_k.min(self.config.max_top_k));

        fused
            .into_iter()
            .filter_map(|candidate| {
                self.store.get(candidate.id).map(|record| RankedRecipe {
                    record: record.clone(),
                    score: candidate.score,
                    pantry_used: candidate.pantry_used,
                    missing: candidate.missing,
                })
            })
            .collect()
    }

    /// Check one recipe against the live pantry inventory.
    ///
    /// Without an attached provider the recipe is reported infeasible with
    /// every ingredient missing.
    pub fn feasibility(&self, record: &RecipeRecord, allow_missing: usize) -> Feasibility {
        let mut seen: HashSet<&str> = HashSet::with_capacity(record.ingredients.len());
        let recipe_keys: Vec<&str> = record
            .ingredients
            .iter()
            .filter(|key| !key.is_empty())
            .filter(|key| seen.insert(key.as_str()))
            .map(String::as_str)
            .collect();

        let Some(provider) = &self.pantry_provider else {
            return Feasibility {
                feasible: false,
                available: Vec::new(),
                missing: recipe_keys.into_iter().map(str::to_string).collect(),
            };
        };

        let inventory = provider.get_inventory();
        let pantry: HashSet<String> = normalize_ingredients(
            inventory.iter().map(|item| item.ingredient_name.as_str()),
        )
        .into_iter()
        .collect();

        let (available, missing): (Vec<&str>, Vec<&str>) = recipe_keys
            .into_iter()
            .partition(|key| pantry.contains(*key));

        Feasibility {
            feasible: missing.len() <= allow_missing,
            available: available.into_iter().map(str::to_string).collect(),
            missing: missing.into_iter().map(str::to_string).collect(),
        }
    }
}
