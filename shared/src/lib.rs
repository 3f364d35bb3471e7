//! Pelican 共享类型库
//!
//! 服务端 (pelican-server) 与各客户端 (餐厅端 / 顾客端 / 骑手端) 之间
//! 共享的数据模型和实时消息信封。
//!
//! # 模块结构
//!
//! - [`models`] - 领域实体快照 (Restaurant, MenuItem, Order, ChatMessage, Courier)
//! - [`message`] - 实时通道消息信封 (HubEvent / BusMessage)

pub mod message;
pub mod models;

pub use message::{BusMessage, DeliveryAck, EventKind, HubEvent, OrderUpdatePayload};
pub use models::{
    ChatChannel, ChatMessage, Courier, MenuItem, Order, OrderItem, OrderStatus, OwnerRole,
    Restaurant,
};
