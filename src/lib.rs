pub mod config;
pub mod error;

// Persisted corpus
pub mod store;

// Exact-match path
pub mod indexer;

// Semantic path
pub mod vector;

// Ranking engine
pub mod search;

// External collaborator seams
pub mod pantry;

// CLI
pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use search::{RankedCandidate, RankedRecipe, RecipeSearch};
