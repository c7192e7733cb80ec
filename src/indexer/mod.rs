// Ingredient normalization and the inverted ingredient index.
// Both sides of the exact-match path (ingestion and query) go through
// `normalize_token`; see that function's compatibility notes.

pub mod inverted;
pub mod normalize;

pub use inverted::IngredientIndex;
pub use normalize::{normalize_ingredients, normalize_token};
