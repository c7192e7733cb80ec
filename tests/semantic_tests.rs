use leftovr::config::{DataConfig, SearchConfig, Settings, VectorConfig};
use leftovr::indexer::IngredientIndex;
use leftovr::search::SemanticSearch;
use leftovr::store::models::RecipeRecord;
use leftovr::store::MetadataStore;
use leftovr::vector::{EmbeddingClient, VectorBackend};
use leftovr::RecipeSearch;
use std::sync::Arc;
use std::time::Duration;

const DIM: usize = 4;

fn record(id: i64, title: &str, ingredients: &[&str]) -> RecipeRecord {
    RecipeRecord {
        id,
        title: title.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        directions: Vec::new(),
        source: String::new(),
        link: String::new(),
    }
}

fn settings() -> Settings {
    Settings {
        data: DataConfig {
            data_dir: "./data".into(),
            metadata_file: "recipe_metadata.jsonl".to_string(),
            index_file: "ingredient_index.json".to_string(),
        },
        vector: VectorConfig {
            backend_url: None,
            api_key: None,
            collection: "recipes".to_string(),
            embed_url: None,
            embed_api_key: None,
            embed_model: "test-model".to_string(),
            embed_dim: DIM,
            timeout_seconds: 2,
            max_retries: 1,
        },
        search: SearchConfig {
            candidate_pool: 500,
            semantic_bonus: 50.0,
            max_top_k: 100,
            include_semantic_only: false,
        },
    }
}

fn embed_client(server: &mockito::Server) -> EmbeddingClient {
    EmbeddingClient::new(
        &format!("{}/inference/text", server.url()),
        None,
        "test-model",
        DIM,
        Duration::from_secs(2),
    )
    .unwrap()
}

fn backend(server: &mockito::Server, max_retries: u32) -> VectorBackend {
    VectorBackend::new(
        &server.url(),
        None,
        "recipes",
        Duration::from_secs(2),
        max_retries,
    )
    .unwrap()
}

fn service_with(
    records: Vec<RecipeRecord>,
    semantic: Option<SemanticSearch>,
) -> RecipeSearch {
    let index = Arc::new(IngredientIndex::build(&records));
    let store = Arc::new(MetadataStore::from_records(records));
    RecipeSearch::new(store, index, semantic, &settings())
}

fn embed_body() -> &'static str {
    r#"{"data": [{"embedding": [1.0, 0.0, 0.0, 0.0]}]}"#
}

#[tokio::test]
async fn test_semantic_rank_orders_by_similarity() {
    let mut server = mockito::Server::new_async().await;
    let embed_mock = server
        .mock("POST", "/inference/text")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(embed_body())
        .create_async()
        .await;
    let search_mock = server
        .mock("POST", "/collections/recipes/points/search")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"result": [{"id": 2, "score": 0.91}, {"id": 1, "score": 0.55}], "status": "ok"}"#)
        .create_async()
        .await;

    let semantic = SemanticSearch::new(embed_client(&server), backend(&server, 0));
    let search = service_with(
        vec![record(1, "Pancakes", &["flour"]), record(2, "Crepes", &["flour"])],
        Some(semantic),
    );

    let hits = search.semantic_rank(Some("thin French pancakes"), None, 5).await;

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].0, 2);
    assert!(hits[0].1 > hits[1].1);

    embed_mock.assert_async().await;
    search_mock.assert_async().await;
}

#[tokio::test]
async fn test_semantic_rank_no_inputs_makes_no_requests() {
    let mut server = mockito::Server::new_async().await;
    let embed_mock = server
        .mock("POST", "/inference/text")
        .expect(0)
        .create_async()
        .await;

    let semantic = SemanticSearch::new(embed_client(&server), backend(&server, 0));
    let search = service_with(vec![record(1, "Pancakes", &["flour"])], Some(semantic));

    let hits = search.semantic_rank(None, None, 5).await;

    assert!(hits.is_empty());
    embed_mock.assert_async().await;
}

#[tokio::test]
async fn test_backend_5xx_is_retried_once_then_degrades() {
    let mut server = mockito::Server::new_async().await;
    let _embed_mock = server
        .mock("POST", "/inference/text")
        .with_status(200)
        .with_body(embed_body())
        .create_async()
        .await;
    // max_retries=1: the initial attempt plus exactly one retry.
    let search_mock = server
        .mock("POST", "/collections/recipes/points/search")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(2)
        .create_async()
        .await;

    let semantic = SemanticSearch::new(embed_client(&server), backend(&server, 1));
    let search = service_with(vec![record(1, "Pancakes", &["flour"])], Some(semantic));

    let hits = search.semantic_rank(Some("anything"), None, 5).await;

    assert!(hits.is_empty());
    search_mock.assert_async().await;
}

#[tokio::test]
async fn test_embedding_dimension_mismatch_degrades() {
    let mut server = mockito::Server::new_async().await;
    let _embed_mock = server
        .mock("POST", "/inference/text")
        .with_status(200)
        .with_body(r#"{"data": [{"embedding": [1.0, 0.0]}]}"#)
        .create_async()
        .await;
    let search_mock = server
        .mock("POST", "/collections/recipes/points/search")
        .expect(0)
        .create_async()
        .await;

    let semantic = SemanticSearch::new(embed_client(&server), backend(&server, 0));
    let search = service_with(vec![record(1, "Pancakes", &["flour"])], Some(semantic));

    let hits = search.semantic_rank(Some("anything"), None, 5).await;

    assert!(hits.is_empty());
    search_mock.assert_async().await;
}

#[tokio::test]
async fn test_hybrid_semantic_bonus_reorders_within_pool() {
    let mut server = mockito::Server::new_async().await;
    let _embed_mock = server
        .mock("POST", "/inference/text")
        .with_status(200)
        .with_body(embed_body())
        .create_async()
        .await;
    // Recipe 2 is semantically closest; 999 is not in the exact pool and
    // must not appear in the output.
    let _search_mock = server
        .mock("POST", "/collections/recipes/points/search")
        .with_status(200)
        .with_body(
            r#"{"result": [{"id": 999, "score": 0.99}, {"id": 2, "score": 0.9}], "status": "ok"}"#,
        )
        .create_async()
        .await;

    let semantic = SemanticSearch::new(embed_client(&server), backend(&server, 0));
    // Exact scores: recipe 1 -> 3*100 - 4 = 296, recipe 2 -> 3*100 - 5 = 295.
    let search = service_with(
        vec![
            record(1, "Pancakes", &["flour", "egg", "milk", "sugar"]),
            record(2, "Custard", &["flour", "egg", "milk", "sugar", "vanilla"]),
            record(999, "Tofu Bowl", &["tofu", "rice"]),
        ],
        Some(semantic),
    );
    let pantry = vec!["flour".to_string(), "egg".to_string(), "milk".to_string()];

    let results = search
        .hybrid_rank(Some(&pantry), Some("silky dessert"), 10, 2, true)
        .await;

    assert_eq!(results.len(), 2);
    // 295 + 0.9 * 50 = 340 beats 296.
    assert_eq!(results[0].record.id, 2);
    assert!((results[0].score - 340.0).abs() < 1e-3);
    assert_eq!(results[1].record.id, 1);
    assert_eq!(results[1].score, 296.0);
    assert!(results.iter().all(|r| r.record.id != 999));
}

#[tokio::test]
async fn test_hybrid_falls_back_when_backend_unreachable() {
    // Nothing is listening on this port; the connection is refused
    // immediately and the hybrid engine must fall back to exact order.
    let embedding = EmbeddingClient::new(
        "http://127.0.0.1:1/inference/text",
        None,
        "test-model",
        DIM,
        Duration::from_millis(200),
    )
    .unwrap();
    let backend = VectorBackend::new(
        "http://127.0.0.1:1",
        None,
        "recipes",
        Duration::from_millis(200),
        0,
    )
    .unwrap();

    let search = service_with(
        vec![
            record(1, "Pancakes", &["flour", "egg", "milk", "sugar"]),
            record(2, "Custard", &["flour", "egg", "milk", "sugar", "vanilla"]),
        ],
        Some(SemanticSearch::new(embedding, backend)),
    );
    let pantry = vec!["flour".to_string(), "egg".to_string(), "milk".to_string()];

    let results = search
        .hybrid_rank(Some(&pantry), Some("dessert"), 10, 2, true)
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].record.id, 1);
    assert_eq!(results[0].score, 296.0);
    assert_eq!(results[1].record.id, 2);
    assert_eq!(results[1].score, 295.0);
}

#[tokio::test]
async fn test_connect_disabled_without_configuration() {
    let mut config = settings().vector;
    config.backend_url = None;
    config.embed_url = None;

    let semantic = SemanticSearch::connect(&config).await.unwrap();
    assert!(semantic.is_none());
}

#[tokio::test]
async fn test_connect_disabled_when_collection_missing() {
    let mut server = mockito::Server::new_async().await;
    let collection_mock = server
        .mock("GET", "/collections/recipes")
        .with_status(404)
        .with_body(r#"{"status": {"error": "Not found"}}"#)
        .create_async()
        .await;

    let mut config = settings().vector;
    config.backend_url = Some(server.url());
    config.embed_url = Some(format!("{}/inference/text", server.url()));

    let semantic = SemanticSearch::connect(&config).await.unwrap();
    assert!(semantic.is_none());
    collection_mock.assert_async().await;
}

#[tokio::test]
async fn test_connect_succeeds_when_collection_exists() {
    let mut server = mockito::Server::new_async().await;
    let collection_mock = server
        .mock("GET", "/collections/recipes")
        .with_status(200)
        .with_body(r#"{"result": {"status": "green"}, "status": "ok"}"#)
        .create_async()
        .await;

    let mut config = settings().vector;
    config.backend_url = Some(server.url());
    config.embed_url = Some(format!("{}/inference/text", server.url()));

    let semantic = SemanticSearch::connect(&config).await.unwrap();
    assert!(semantic.is_some());
    collection_mock.assert_async().await;
}
