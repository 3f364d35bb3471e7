//! Menu Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single dish on a restaurant's menu
///
/// The menu itself is a full-replace snapshot (`Vec<MenuItem>`); items are not
/// independently addressable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Non-negative; captured into orders as a price snapshot
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    pub is_available: bool,
    pub image: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Menu item as posted by the restaurant client
///
/// The server stamps id and `updated_at` when the snapshot is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemInput {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub image: Option<String>,
}

fn default_true() -> bool {
    true
}
