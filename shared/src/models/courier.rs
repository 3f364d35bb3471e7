//! Courier Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Courier entity
///
/// Created/updated on first activity; evicted by the sweep once idle beyond
/// the idle-TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Courier {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub vehicle: Option<String>,
    pub is_available: bool,
    pub current_order_id: Option<String>,
    pub total_deliveries: u32,
    pub total_earnings: Decimal,
    pub last_active_at: DateTime<Utc>,
}
