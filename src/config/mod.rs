use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data: DataConfig,
    pub vector: VectorConfig,
    pub search: SearchConfig,
}

/// Location of the persisted index files produced by the ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub metadata_file: String,
    pub index_file: String,
}

/// Vector backend + embedding endpoint configuration.
///
/// Both URLs must be set for semantic search to be available; leaving either
/// unset disables the semantic capability without affecting exact-match
/// ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
    pub collection: String,
    pub embed_url: Option<String>,
    pub embed_api_key: Option<String>,
    pub embed_model: String,
    pub embed_dim: usize,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Candidate pool size for each ranking stage inside the hybrid engine,
    /// decoupled from the caller's top_k.
    pub candidate_pool: usize,
    /// Weight applied to cosine similarity when fusing scores. Kept below the
    /// per-ingredient weight (100) so similarity can reorder but not override
    /// ingredient overlap.
    pub semantic_bonus: f64,
    pub max_top_k: usize,
    /// Admit semantic hits that are absent from the exact-match pool.
    pub include_semantic_only: bool,
}

impl DataConfig {
    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }

    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file)
    }
}

impl VectorConfig {
    /// Semantic search needs both a search backend and an embedding endpoint.
    pub fn is_enabled(&self) -> bool {
        self.backend_url.is_some() && self.embed_url.is_some()
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let data_dir = std::env::var("LEFTOVR_DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let metadata_file = std::env::var("LEFTOVR_METADATA_FILE")
            .unwrap_or_else(|_| "recipe_metadata.jsonl".to_string());

        let index_file = std::env::var("LEFTOVR_INDEX_FILE")
            .unwrap_or_else(|_| "ingredient_index.json".to_string());

        let backend_url = std::env::var("QDRANT_URL").ok();
        let api_key = std::env::var("QDRANT_API_KEY").ok();

        let collection =
            std::env::var("QDRANT_COLLECTION").unwrap_or_else(|_| "recipes".to_string());

        let embed_url = std::env::var("LEFTOVR_EMBED_URL").ok();
        let embed_api_key = std::env::var("LEFTOVR_EMBED_API_KEY")
            .ok()
            .or_else(|| api_key.clone());

        let embed_model = std::env::var("LEFTOVR_EMBED_MODEL")
            .unwrap_or_else(|_| "qdrant/all-MiniLM-L6-v2".to_string());

        let embed_dim = std::env::var("LEFTOVR_EMBED_DIM")
            .unwrap_or_else(|_| "384".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid LEFTOVR_EMBED_DIM value".to_string()))?;

        let timeout_seconds = std::env::var("LEFTOVR_BACKEND_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid LEFTOVR_BACKEND_TIMEOUT_SECS value".to_string()))?;

        let max_retries = std::env::var("LEFTOVR_BACKEND_RETRIES")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid LEFTOVR_BACKEND_RETRIES value".to_string()))?;

        let candidate_pool = std::env::var("LEFTOVR_CANDIDATE_POOL")
            .unwrap_or_else(|_| "500".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid LEFTOVR_CANDIDATE_POOL value".to_string()))?;

        let semantic_bonus = std::env::var("LEFTOVR_SEMANTIC_BONUS")
            .unwrap_or_else(|_| "50".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid LEFTOVR_SEMANTIC_BONUS value".to_string()))?;

        let max_top_k = std::env::var("LEFTOVR_MAX_TOP_K")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid LEFTOVR_MAX_TOP_K value".to_string()))?;

        let include_semantic_only = std::env::var("LEFTOVR_INCLUDE_SEMANTIC_ONLY")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .map_err(|_| {
                Error::Config("Invalid LEFTOVR_INCLUDE_SEMANTIC_ONLY value".to_string())
            })?;

        Ok(Settings {
            data: DataConfig {
                data_dir,
                metadata_file,
                index_file,
            },
            vector: VectorConfig {
                backend_url,
                api_key,
                collection,
                embed_url,
                embed_api_key,
                embed_model,
                embed_dim,
                timeout_seconds,
                max_retries,
            },
            search: SearchConfig {
                candidate_pool,
                semantic_bonus,
                max_top_k,
                include_semantic_only,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.search.candidate_pool == 0 {
            return Err(Error::Config(
                "Candidate pool must be non-zero".to_string(),
            ));
        }

        if self.search.max_top_k == 0 {
            return Err(Error::Config("Max top_k must be non-zero".to_string()));
        }

        if self.vector.embed_dim == 0 {
            return Err(Error::Config(
                "Embedding dimension must be non-zero".to_string(),
            ));
        }

        for endpoint in [&self.vector.backend_url, &self.vector.embed_url]
            .into_iter()
            .flatten()
        {
            url::Url::parse(endpoint)
                .map_err(|e| Error::Config(format!("Invalid endpoint URL {endpoint}: {e}")))?;
        }

        Ok(())
    }
}
