//! 实时通道消息信封
//!
//! 这些类型在 pelican-server 和各客户端之间共享，定义 WebSocket
//! 通道上的 `{type, data}` 事件信封。
//!
//! # 消息流
//!
//! ```text
//! Server ──▶ publish() ──▶ 所有已连接客户端   (new_order / order_update / new_message)
//! Client ──▶ {type:"message"} ──▶ 其他客户端  (原样转发，不回环给发送者)
//! Client ──▶ {type:"message_delivered"} ──▶ MessageStore (送达回执)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ChatMessage, Order, OrderStatus};

/// 事件种类标识 (用于处理器注册表和日志)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NewOrder,
    OrderUpdate,
    NewMessage,
    /// 客户端之间的透传聊天帧
    Message,
    /// 客户端送达回执
    MessageDelivered,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::NewOrder => write!(f, "new_order"),
            EventKind::OrderUpdate => write!(f, "order_update"),
            EventKind::NewMessage => write!(f, "new_message"),
            EventKind::Message => write!(f, "message"),
            EventKind::MessageDelivered => write!(f, "message_delivered"),
        }
    }
}

/// `order_update` 事件载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdatePayload {
    pub order_id: String,
    pub status: OrderStatus,
    /// 更新后的完整订单快照
    pub order: Order,
}

/// `message_delivered` 回执载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAck {
    pub message_id: String,
}

/// 实时事件信封 - 线上形态为 `{"type": "...", "data": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum HubEvent {
    /// 新订单创建 (服务端 -> 所有客户端)
    NewOrder(Order),
    /// 订单状态变更 (服务端 -> 所有客户端)
    OrderUpdate(OrderUpdatePayload),
    /// 新聊天消息已入库 (服务端 -> 所有客户端)
    NewMessage(ChatMessage),
    /// 通用聊天帧 (客户端 -> 其他客户端，服务端原样转发)
    Message(serde_json::Value),
    /// 送达回执 (客户端 -> 服务端，不转发)
    MessageDelivered(DeliveryAck),
}

impl HubEvent {
    /// 获取事件种类
    pub fn kind(&self) -> EventKind {
        match self {
            HubEvent::NewOrder(_) => EventKind::NewOrder,
            HubEvent::OrderUpdate(_) => EventKind::OrderUpdate,
            HubEvent::NewMessage(_) => EventKind::NewMessage,
            HubEvent::Message(_) => EventKind::Message,
            HubEvent::MessageDelivered(_) => EventKind::MessageDelivered,
        }
    }

    /// 构造 `order_update` 事件
    pub fn order_update(order: &Order) -> Self {
        HubEvent::OrderUpdate(OrderUpdatePayload {
            order_id: order.id.clone(),
            status: order.status,
            order: order.clone(),
        })
    }

    /// 序列化为 WebSocket 文本帧
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 从 WebSocket 文本帧解析
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// 总线帧 - 信封加上来源连接标识
///
/// `source` 为 `None` 表示服务端发起（广播给所有连接）；
/// 为 `Some(id)` 表示来自某个客户端连接（转发时跳过该连接，避免回环）。
#[derive(Debug, Clone)]
pub struct BusMessage {
    pub source: Option<String>,
    pub event: HubEvent,
}

impl BusMessage {
    /// 服务端发起的广播帧
    pub fn server(event: HubEvent) -> Self {
        Self {
            source: None,
            event,
        }
    }

    /// 客户端发起的帧
    pub fn from_client(source: impl Into<String>, event: HubEvent) -> Self {
        Self {
            source: Some(source.into()),
            event,
        }
    }
}
