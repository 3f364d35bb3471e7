//! Restaurant Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restaurant entity
///
/// Globally visible; mutated only via full replace-by-id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Uploaded cover image filename (served under `/api/image/{filename}`)
    pub cover_image: Option<String>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Upsert restaurant payload (multipart text fields; the cover image travels
/// as a separate `image` file field)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantUpsert {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
