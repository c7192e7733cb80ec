use crate::search::RankedCandidate;
use crate::store::MetadataStore;
use std::collections::{HashMap, HashSet};

/// Context for admitting semantic hits that are outside the exact-match
/// pool. Only constructed when `include_semantic_only` is enabled.
pub(crate) struct Admission<'a> {
    pub store: &'a MetadataStore,
    /// Normalized pantry keys, for honest `pantry_used`/`missing` counts on
    /// admitted recipes.
    pub pantry: &'a HashSet<String>,
}

/// Fuse semantic similarity into the exact-match candidate list.
///
/// Every semantic hit already present in the exact pool gets a bonus of
/// `similarity * bonus_weight` on top of its exact score. The weight stays
/// below the per-ingredient weight (100), so similarity breaks ties and
/// nudges ordering but can never lift a weak ingredient match over a strong
/// one. In the default mode semantic search cannot introduce recipes the
/// pantry does not justify; with an `Admission` context, out-of-pool hits
/// are added scored by their bonus alone.
///
/// The incoming exact ordering is preserved across equal combined scores
/// (stable sort), keeping repeated runs reproducible.
pub(crate) fn fuse(
    exact: Vec<RankedCandidate>,
    semantic: &[(i64, f32)],
    bonus_weight: f64,
    admission: Option<Admission<'_>>,
) -> Vec<RankedCandidate> {
    let mut candidates = exact;
    let positions: HashMap<i64, usize> = candidates
        .iter()
        .enumerate()
        .map(|(pos, c)| (c.id, pos))
        .collect();

    for &(id, similarity) in semantic {
        if let Some(&pos) = positions.get(&id) {
            candidates[pos].score += f64::from(similarity) * bonus_weight;
        } else if let Some(admission) = &admission {
            if let Some(candidate) = admit(admission, id, similarity, bonus_weight) {
                candidates.push(candidate);
            }
        }
    }

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

fn admit(
    admission: &Admission<'_>,
    id: i64,
    similarity: f32,
    bonus_weight: f64,
) -> Option<RankedCandidate> {
    let record = admission.store.get(id)?;

    let mut seen: HashSet<&str> = HashSet::with_capacity(record.ingredients.len());
    let mut used = 0usize;
    let mut missing: Vec<String> = Vec::new();
    for key in &record.ingredients {
        if key.is_empty() || !seen.insert(key.as_str()) {
            continue;
        }
        if admission.pantry.contains(key.as_str()) {
            used += 1;
        } else {
            missing.push(key.clone());
        }
    }

    Some(RankedCandidate {
        id,
        score: f64::from(similarity) * bonus_weight,
        pantry_used: used,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::RecipeRecord;

    fn candidate(id: i64, score: f64, used: usize) -> RankedCandidate {
        RankedCandidate {
            id,
            score,
            pantry_used: used,
            missing: Vec::new(),
        }
    }

    #[test]
    fn test_bonus_applies_only_to_pool_members() {
        let exact = vec![candidate(1, 296.0, 3), candidate(2, 197.0, 2)];
        let semantic = vec![(2, 0.9_f32), (99, 1.0_f32)];

        let fused = fuse(exact, &semantic, 50.0, None);

        assert_eq!(fused.len(), 2);
        let by_id: HashMap<i64, f64> = fused.iter().map(|c| (c.id, c.score)).collect();
        assert_eq!(by_id[&1], 296.0);
        assert_eq!(by_id[&2], 197.0 + f64::from(0.9_f32) * 50.0);
        assert!(!by_id.contains_key(&99));
    }

    #[test]
    fn test_bonus_can_reorder_close_scores() {
        let exact = vec![candidate(1, 296.0, 3), candidate(2, 290.0, 3)];
        let semantic = vec![(2, 0.8_f32)];

        let fused = fuse(exact, &semantic, 50.0, None);

        assert_eq!(fused[0].id, 2);
        assert_eq!(fused[0].score, 290.0 + f64::from(0.8_f32) * 50.0);
    }

    #[test]
    fn test_bonus_cannot_overcome_an_ingredient_gap() {
        // One full pantry-item gap is 100 points; the bonus is capped at
        // bonus_weight * 1.0 = 50.
        let exact = vec![candidate(1, 396.0, 4), candidate(2, 296.0, 3)];
        let semantic = vec![(2, 1.0_f32)];

        let fused = fuse(exact, &semantic, 50.0, None);

        assert_eq!(fused[0].id, 1);
    }

    #[test]
    fn test_stable_order_on_ties() {
        let exact = vec![candidate(3, 200.0, 2), candidate(7, 200.0, 2)];

        let fused = fuse(exact, &[], 50.0, None);

        assert_eq!(fused[0].id, 3);
        assert_eq!(fused[1].id, 7);
    }

    #[test]
    fn test_admission_adds_out_of_pool_hits() {
        let store = MetadataStore::from_records(vec![RecipeRecord {
            id: 42,
            title: "Minestrone".to_string(),
            ingredients: vec!["bean".to_string(), "tomato".to_string()],
            directions: Vec::new(),
            source: String::new(),
            link: String::new(),
        }]);
        let pantry: HashSet<String> = ["tomato".to_string()].into_iter().collect();

        let fused = fuse(
            vec![candidate(1, 296.0, 3)],
            &[(42, 0.7_f32)],
            50.0,
            Some(Admission {
                store: &store,
                pantry: &pantry,
            }),
        );

        assert_eq!(fused.len(), 2);
        let admitted = fused.iter().find(|c| c.id == 42).unwrap();
        assert!((admitted.score - 35.0).abs() < 1e-3);
        assert_eq!(admitted.pantry_used, 1);
        assert_eq!(admitted.missing, vec!["bean"]);
    }

    #[test]
    fn test_admission_skips_stale_ids() {
        let store = MetadataStore::from_records(Vec::new());
        let pantry: HashSet<String> = HashSet::new();

        let fused = fuse(
            Vec::new(),
            &[(42, 0.7_f32)],
            50.0,
            Some(Admission {
                store: &store,
                pantry: &pantry,
            }),
        );

        assert!(fused.is_empty());
    }
}
