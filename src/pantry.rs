use serde::{Deserialize, Serialize};

/// One row of the external pantry inventory.
///
/// Only `ingredient_name` feeds ranking; the remaining fields travel through
/// for display and for callers that care about quantities or expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryItem {
    pub ingredient_name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub expires_in_days: Option<i64>,
}

/// Seam to the external pantry inventory store.
///
/// The retrieval core never owns pantry state; when a caller omits
/// `pantry_items`, the attached provider supplies the current inventory.
pub trait PantryProvider: Send + Sync {
    fn get_inventory(&self) -> Vec<PantryItem>;
}
