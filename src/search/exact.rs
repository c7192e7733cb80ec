use crate::indexer::{normalize_ingredients, IngredientIndex};
use crate::search::RankedCandidate;
use crate::store::MetadataStore;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Waste-aware exact-match ranking over the inverted ingredient index.
///
/// The candidate universe is every recipe sharing at least one pantry
/// ingredient; recipes with zero overlap cannot reduce waste and are never
/// considered. Scoring rewards the number of distinct pantry items a recipe
/// consumes (weight 100), adds a flat 1000 for recipes cookable without
/// shopping, and subtracts the recipe's ingredient count as a tiebreaker
/// toward simpler recipes.
pub fn rank(
    store: &MetadataStore,
    index: &IngredientIndex,
    pantry_items: &[String],
    allow_missing: usize,
    top_k: usize,
) -> Vec<RankedCandidate> {
    let pantry: HashSet<String> = normalize_ingredients(pantry_items).into_iter().collect();
    if pantry.is_empty() {
        return Vec::new();
    }

    // Ascending-id iteration keeps equal-score ties deterministic.
    let mut candidate_ids: BTreeSet<i64> = BTreeSet::new();
    for key in &pantry {
        candidate_ids.extend(index.lookup(key));
    }

    let mut scored: Vec<RankedCandidate> = Vec::new();
    let mut stale = 0usize;

    for id in candidate_ids {
        let Some(record) = store.get(id) else {
            // Index knows this id but the metadata store does not: stale
            // index. Skip rather than fail the whole ranking call.
            stale += 1;
            continue;
        };

        // Dedup the recipe's ingredient list preserving first-occurrence
        // order, so `missing` comes out in recipe order.
        let mut recipe_keys: Vec<&str> = Vec::with_capacity(record.ingredients.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(record.ingredients.len());
        for key in &record.ingredients {
            if !key.is_empty() && seen.insert(key.as_str()) {
                recipe_keys.push(key.as_str());
            }
        }
        if recipe_keys.is_empty() {
            continue;
        }

        let used = recipe_keys
            .iter()
            .filter(|key| pantry.contains(**key))
            .count();
        let missing: Vec<String> = recipe_keys
            .iter()
            .filter(|key| !pantry.contains(**key))
            .map(|key| key.to_string())
            .collect();

        if missing.len() > allow_missing {
            continue;
        }

        let complete_bonus = if missing.is_empty() { 1000 } else { 0 };
        let score = (used as i64 * 100 + complete_bonus - recipe_keys.len() as i64) as f64;

        scored.push(RankedCandidate {
            id,
            score,
            pantry_used: used,
            missing,
        });
    }

    if stale > 0 {
        debug!("Skipped {} stale index ids without metadata", stale);
    }

    // Stable sort preserves the ascending-id order within equal scores.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    scored
}
