//! Order Model
//!
//! 订单状态机：
//!
//! ```text
//! Pending → Accepted → Preparing → Ready → PickedUp → OnWay → Delivered
//!     └─────────┴──────────┴─────────┴─────────┴────────┴──→ Cancelled
//! ```
//!
//! Delivered 和 Cancelled 为终态，不再接受任何状态迁移。

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Preparing,
    Ready,
    PickedUp,
    OnWay,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The single legal forward successor, if any
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Accepted),
            OrderStatus::Accepted => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::PickedUp),
            OrderStatus::PickedUp => Some(OrderStatus::OnWay),
            OrderStatus::OnWay => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Transition table: strict forward adjacency, plus Cancelled from any
    /// non-terminal state.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if target == OrderStatus::Cancelled {
            return true;
        }
        self.next() == Some(target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::PickedUp => "PICKED_UP",
            OrderStatus::OnWay => "ON_WAY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Role hint used when listing orders for an owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerRole {
    Customer,
    Courier,
    #[default]
    Restaurant,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub status: OrderStatus,
    /// Must equal the sum of `items` (price × quantity)
    pub total: Decimal,
    pub items: Vec<OrderItem>,
    pub delivery_address: String,
    pub courier_id: Option<String>,
    pub courier_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A line item: price and name captured at order time, not a live menu reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// New order as posted by the customer client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub restaurant_id: String,
    pub total: Decimal,
    pub items: Vec<OrderItemDraft>,
    pub delivery_address: String,
}

/// Line item draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDraft {
    pub menu_item_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_chain_is_strict() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Accepted));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::PickedUp));
        // Skipping a step is rejected
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Accepted.can_transition_to(OrderStatus::Ready));
        // Going backwards is rejected
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Accepted));
    }

    #[test]
    fn cancelled_reachable_from_any_non_terminal() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::PickedUp,
            OrderStatus::OnWay,
        ] {
            assert!(status.can_transition_to(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for target in [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::Cancelled,
            OrderStatus::Delivered,
        ] {
            assert!(!OrderStatus::Delivered.can_transition_to(target));
            assert!(!OrderStatus::Cancelled.can_transition_to(target));
        }
    }

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&OrderStatus::PickedUp).unwrap();
        assert_eq!(json, "\"PICKED_UP\"");
        let back: OrderStatus = serde_json::from_str("\"ON_WAY\"").unwrap();
        assert_eq!(back, OrderStatus::OnWay);
    }
}
