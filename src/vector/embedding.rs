use crate::error::{Error, Result};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Client for a hosted text-embedding inference endpoint.
///
/// The corpus vectors were produced with a specific model and text template;
/// query vectors must use the same model or similarity scores are
/// meaningless. Vectors are L2-normalized client-side so that the backend's
/// inner product equals cosine similarity.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    model: String,
    dim: usize,
}

impl EmbeddingClient {
    pub fn new(
        endpoint: &str,
        api_key: Option<&str>,
        model: &str,
        dim: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = api_key {
            headers.insert(
                "api-key",
                header::HeaderValue::from_str(key.trim())
                    .map_err(|_| Error::Config("Invalid embedding API key".to_string()))?,
            );
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dim,
        })
    }

    /// Embedding dimension the collection was built with.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed one query string into a unit-length vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Embedding query text ({} chars)", text.len());

        let request = InferenceRequest {
            model: &self.model,
            inputs: &[text],
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(Error::Backend(format!(
                "Embedding request failed ({status}): {body}"
            )));
        }

        let payload: InferenceResponse = response.json().await?;
        let mut vector = payload.into_single()?;

        if vector.len() != self.dim {
            return Err(Error::Backend(format!(
                "Embedding dimension mismatch: got {}, expected {}",
                vector.len(),
                self.dim
            )));
        }

        normalize_in_place(&mut vector);
        Ok(vector)
    }
}

/// Scale a vector to unit length. Zero vectors are left untouched.
pub fn normalize_in_place(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    model: &'a str,
    #[serde(rename = "input")]
    inputs: &'a [&'a str],
}

// Hosted inference endpoints disagree on the response envelope: some wrap
// vectors in OpenAI-style `data[].embedding`, others in a bare `embeddings`
// array. Accept both.
#[derive(Debug, Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    data: Vec<InferenceData>,
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct InferenceData {
    embedding: Vec<f32>,
}

impl InferenceResponse {
    fn into_single(self) -> Result<Vec<f32>> {
        if let Some(first) = self.data.into_iter().next() {
            return Ok(first.embedding);
        }
        if let Some(first) = self.embeddings.into_iter().next() {
            return Ok(first);
        }
        Err(Error::Backend(
            "Embedding response missing vector payload".to_string(),
        ))
    }
}
