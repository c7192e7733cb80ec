use crate::config::VectorConfig;
use crate::error::Result;
use crate::vector::{EmbeddingClient, VectorBackend};
use std::time::Duration;
use tracing::{info, warn};

/// Semantic retrieval over the vector backend.
///
/// Holds the embedding client and the ANN backend; both were configured
/// together or not at all. Failures here must never take down the
/// exact-match path, so the service-level wrapper converts every error into
/// an empty result — `search` stays fallible internally so logs can tell
/// "no matches" apart from "backend down".
#[derive(Clone)]
pub struct SemanticSearch {
    embedding: EmbeddingClient,
    backend: VectorBackend,
}

impl SemanticSearch {
    /// Connect to the configured backend, verifying the collection exists.
    ///
    /// Returns `Ok(None)` when the capability is unconfigured or the
    /// collection is absent — semantic search is an enhancement layer, and
    /// its absence only disables that layer.
    pub async fn connect(config: &VectorConfig) -> Result<Option<Self>> {
        let (Some(backend_url), Some(embed_url)) = (&config.backend_url, &config.embed_url)
        else {
            info!("Vector backend not configured; semantic search disabled");
            return Ok(None);
        };

        let timeout = Duration::from_secs(config.timeout_seconds);

        let embedding = EmbeddingClient::new(
            embed_url,
            config.embed_api_key.as_deref(),
            &config.embed_model,
            config.embed_dim,
            timeout,
        )?;

        let backend = VectorBackend::new(
            backend_url,
            config.api_key.as_deref(),
            &config.collection,
            timeout,
            config.max_retries,
        )?;

        if !backend.collection_exists().await? {
            warn!(
                "Collection '{}' not found on vector backend; semantic search disabled",
                backend.collection()
            );
            return Ok(None);
        }

        info!(
            "Semantic search enabled (collection '{}', model '{}')",
            backend.collection(),
            config.embed_model
        );

        Ok(Some(Self { embedding, backend }))
    }

    /// Assemble clients directly (tests).
    pub fn new(embedding: EmbeddingClient, backend: VectorBackend) -> Self {
        Self { embedding, backend }
    }

    /// Top-k semantic candidates for a preference text and/or pantry list.
    ///
    /// The query string mirrors the template the corpus was embedded with:
    /// the free-text preference, then `"Ingredients: ..."` over the raw
    /// pantry items, joined by `". "`. Both inputs absent yields an empty
    /// result, not an error.
    pub async fn search(
        &self,
        query_text: Option<&str>,
        pantry_items: Option<&[String]>,
        k: usize,
    ) -> Result<Vec<(i64, f32)>> {
        let Some(search_text) = build_query_text(query_text, pantry_items) else {
            return Ok(Vec::new());
        };

        let vector = self.embedding.embed(&search_text).await?;
        let points = self.backend.search(&vector, k).await?;

        Ok(points.into_iter().map(|p| (p.id, p.score)).collect())
    }
}

/// Join the preference text and the pantry clause into one query string.
/// Returns `None` when there is nothing to search with.
fn build_query_text(query_text: Option<&str>, pantry_items: Option<&[String]>) -> Option<String> {
    let mut parts: Vec<String> = Vec::with_capacity(2);

    if let Some(text) = query_text {
        if !text.trim().is_empty() {
            parts.push(text.trim().to_string());
        }
    }

    if let Some(items) = pantry_items {
        if !items.is_empty() {
            parts.push(format!("Ingredients: {}", items.join(", ")));
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(". "))
    }
}
