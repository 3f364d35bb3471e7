//! Chat Message Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat channel discriminator: each order carries two independent threads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatChannel {
    RestaurantChat,
    CourierChat,
}

/// A message inside an order's chat thread
///
/// Append-only; after creation only the `delivered` flag may change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub order_id: String,
    pub content: String,
    pub sender_id: String,
    /// true when the end-customer sent the message
    pub is_from_user: bool,
    pub chat_type: ChatChannel,
    pub created_at: DateTime<Utc>,
    pub delivered: bool,
}

/// Post message payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageCreate {
    pub content: String,
    pub sender_id: String,
    #[serde(default)]
    pub is_from_user: bool,
    pub chat_type: ChatChannel,
}
