// Network clients for the semantic path: the embedding inference endpoint
// and the vector search backend. Both are optional capabilities; the
// exact-match path never depends on them.

pub mod backend;
pub mod embedding;

pub use backend::{ScoredPoint, VectorBackend};
pub use embedding::EmbeddingClient;
