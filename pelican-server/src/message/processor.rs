//! Message Processor Trait
//!
//! Pluggable processing for inbound client frames. One processor per event
//! kind, registered once at process start on the single persistent bus
//! subscription (never per-request).

use async_trait::async_trait;
use shared::message::{BusMessage, EventKind, HubEvent};
use std::sync::Arc;

use crate::message::MessageBus;
use crate::store::MessageStore;
use crate::utils::AppError;

/// Result of message processing
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// Frame processed successfully
    Success { message: String },
    /// Frame skipped (e.g., unknown reference)
    Skipped { reason: String },
}

/// Inbound frame processor
#[async_trait]
pub trait MessageProcessor: Send + Sync {
    /// The event kind this processor handles
    fn event_kind(&self) -> EventKind;

    /// Process one inbound frame
    async fn process(&self, msg: &BusMessage) -> Result<ProcessResult, AppError>;
}

/// Delivery-ack processor - the `message_delivered` path
///
/// 收到客户端回执后，把对应消息标记为已送达。消息保留在线程里，
/// 到期后由清理任务淘汰。
pub struct DeliveryAckProcessor {
    messages: Arc<MessageStore>,
}

impl DeliveryAckProcessor {
    pub fn new(messages: Arc<MessageStore>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl MessageProcessor for DeliveryAckProcessor {
    fn event_kind(&self) -> EventKind {
        EventKind::MessageDelivered
    }

    async fn process(&self, msg: &BusMessage) -> Result<ProcessResult, AppError> {
        let HubEvent::MessageDelivered(ack) = &msg.event else {
            return Err(AppError::internal("Mismatched frame routed to ack processor"));
        };

        if self.messages.mark_delivered(&ack.message_id) {
            Ok(ProcessResult::Success {
                message: format!("Message {} delivered", ack.message_id),
            })
        } else {
            Ok(ProcessResult::Skipped {
                reason: format!("Unknown or expired message {}", ack.message_id),
            })
        }
    }
}

/// Chat relay processor - pass-through `message` frames
///
/// 客户端聊天帧原样转发给其他所有连接；保留来源标识，
/// 转发任务据此跳过发送者自身 (不回环)。
pub struct ChatRelayProcessor {
    bus: Arc<MessageBus>,
}

impl ChatRelayProcessor {
    pub fn new(bus: Arc<MessageBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl MessageProcessor for ChatRelayProcessor {
    fn event_kind(&self) -> EventKind {
        EventKind::Message
    }

    async fn process(&self, msg: &BusMessage) -> Result<ProcessResult, AppError> {
        if !matches!(msg.event, HubEvent::Message(_)) {
            return Err(AppError::internal("Mismatched frame routed to relay processor"));
        }

        self.bus.relay(msg.clone());
        Ok(ProcessResult::Success {
            message: "Chat frame relayed".to_string(),
        })
    }
}
