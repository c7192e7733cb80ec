use crate::error::{Error, Result};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// An approximate-nearest-neighbor hit from the vector backend.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoredPoint {
    pub id: i64,
    pub score: f32,
}

/// REST client for a Qdrant-style vector backend.
///
/// Exposes the two operations the query path needs: a collection existence
/// check at startup and top-k similarity search. Transient failures
/// (timeouts, connection errors, throttling, 5xx) are retried a bounded
/// number of times with backoff before surfacing an error; the semantic
/// ranker converts that error into an empty result.
#[derive(Clone)]
pub struct VectorBackend {
    client: Client,
    base_url: String,
    collection: String,
    max_retries: u32,
}

impl VectorBackend {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        collection: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = api_key {
            headers.insert(
                "api-key",
                header::HeaderValue::from_str(key.trim())
                    .map_err(|_| Error::Config("Invalid vector backend API key".to_string()))?,
            );
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
            max_retries,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Check whether the configured collection exists.
    pub async fn collection_exists(&self) -> Result<bool> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);
        debug!("Vector backend: GET {}", url);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<body unavailable>".to_string());
                Err(Error::Backend(format!(
                    "Collection check failed ({status}): {body}"
                )))
            }
        }
    }

    /// Top-k similarity search against the collection. Scores are inner
    /// products, which equal cosine similarity for unit-length vectors.
    pub async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>> {
        let mut retries = 0;
        let mut backoff = Duration::from_millis(250);

        loop {
            match self.search_once(vector, limit).await {
                Ok(points) => return Ok(points),
                Err(e) if retries < self.max_retries && e.is_transient() => {
                    retries += 1;
                    warn!(
                        "Vector search failed (attempt {}/{}): {}. Retrying in {:?}",
                        retries, self.max_retries, e, backoff
                    );
                    sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn search_once(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredPoint>> {
        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );
        debug!("Vector backend: POST {} (limit {})", url, limit);

        let request = SearchRequest {
            vector,
            limit,
            with_payload: false,
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            // Keep the status on the error so the retry loop classifies it
            // as transient.
            if let Err(e) = response.error_for_status() {
                return Err(Error::Http(e));
            }
            return Err(Error::Backend(format!("Vector search failed ({status})")));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Error::Backend(format!(
                "Vector search failed ({status}): {body}"
            )));
        }

        let payload: SearchResponse = response.json().await?;
        Ok(payload.result)
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}
