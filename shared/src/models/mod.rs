//! Domain Models
//!
//! Entities are owned exclusively by their server-side store; everything that
//! crosses an API or socket boundary is a snapshot (clone) of store state.

mod chat;
mod courier;
mod menu;
mod order;
mod restaurant;

pub use chat::{ChatChannel, ChatMessage, ChatMessageCreate};
pub use courier::Courier;
pub use menu::{MenuItem, MenuItemInput};
pub use order::{Order, OrderDraft, OrderItem, OrderItemDraft, OrderStatus, OwnerRole};
pub use restaurant::{Restaurant, RestaurantUpsert};
