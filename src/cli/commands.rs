use crate::error::Result;
use crate::search::{RankedRecipe, RecipeSearch};
use crate::store::models::RecipeRecord;

const INGREDIENT_PREVIEW: usize = 6;

/// Exact ingredient-overlap search.
pub async fn ingredients(
    search: &RecipeSearch,
    items: &[String],
    allow_missing: usize,
    top_k: usize,
) -> Result<()> {
    println!("Searching for recipes with: {}", items.join(", "));

    let results = search.exact_match_rank(items, allow_missing, top_k);
    if results.is_empty() {
        print_no_results();
        return Ok(());
    }

    println!("\nFound {} recipes:\n", results.len());
    for (rank, candidate) in results.iter().enumerate() {
        let Some(record) = search.recipe(candidate.id) else {
            continue;
        };
        print_recipe(
            rank + 1,
            record,
            candidate.score,
            Some((candidate.pantry_used, candidate.missing.as_slice())),
        );
    }

    Ok(())
}

/// Semantic description search.
pub async fn describe(search: &RecipeSearch, query: &str, top_k: usize) -> Result<()> {
    if !search.semantic_enabled() {
        println!("Semantic search is not available - vector backend not configured");
        return Ok(());
    }

    println!("Searching for: '{query}'");

    let results = search.semantic_rank(Some(query), None, top_k).await;
    if results.is_empty() {
        print_no_results();
        return Ok(());
    }

    println!("\nFound {} recipes:\n", results.len());
    for (rank, (id, similarity)) in results.iter().enumerate() {
        let Some(record) = search.recipe(*id) else {
            continue;
        };
        print_recipe(rank + 1, record, f64::from(*similarity), None);
    }

    Ok(())
}

/// Hybrid search: ingredients plus an optional description.
pub async fn hybrid(
    search: &RecipeSearch,
    items: &[String],
    query: Option<&str>,
    allow_missing: usize,
    top_k: usize,
    use_semantic: bool,
) -> Result<()> {
    println!("Hybrid search:");
    println!("  Ingredients: {}", items.join(", "));
    if let Some(query) = query {
        println!("  Query: '{query}'");
    }

    let results = search
        .hybrid_rank(Some(items), query, top_k, allow_missing, use_semantic)
        .await;
    if results.is_empty() {
        print_no_results();
        return Ok(());
    }

    println!("\nFound {} recipes:\n", results.len());
    for (rank, result) in results.iter().enumerate() {
        let RankedRecipe {
            record,
            score,
            pantry_used,
            missing,
        } = result;
        print_recipe(rank + 1, record, *score, Some((*pantry_used, missing.as_slice())));
    }

    Ok(())
}

/// Corpus and backend status.
pub fn stats(search: &RecipeSearch) {
    println!("Recipes loaded:     {}", search.recipe_count());
    println!("Unique ingredients: {}", search.ingredient_count());
    println!(
        "Semantic search:    {}",
        if search.semantic_enabled() {
            "enabled"
        } else {
            "disabled"
        }
    );
}

fn print_no_results() {
    println!("\nNo recipes found. Try:");
    println!("  - Different ingredients");
    println!("  - A higher --allow-missing");
    println!("  - Different search terms");
}

fn print_recipe(
    rank: usize,
    record: &RecipeRecord,
    score: f64,
    pantry: Option<(usize, &[String])>,
) {
    println!("{rank}. {}", record.title);
    println!("   Score: {score:.2}");

    if let Some((used, missing)) = pantry {
        if missing.is_empty() {
            println!("   Uses {used} pantry items; nothing missing");
        } else {
            println!(
                "   Uses {used} pantry items; missing: {}",
                missing.join(", ")
            );
        }
    }

    if !record.ingredients.is_empty() {
        let mut preview = record.ingredients[..record.ingredients.len().min(INGREDIENT_PREVIEW)]
            .join(", ");
        if record.ingredients.len() > INGREDIENT_PREVIEW {
            preview.push_str(&format!(
                " ... (+{} more)",
                record.ingredients.len() - INGREDIENT_PREVIEW
            ));
        }
        println!("   Ingredients: {preview}");
    }

    if !record.source.is_empty() {
        println!("   Source: {}", record.source);
    }
    if !record.link.is_empty() {
        println!("   Link: {}", record.link);
    }

    println!();
}
