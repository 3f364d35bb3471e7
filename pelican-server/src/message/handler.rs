//! Message Handler for inbound client frames
//!
//! The MessageHandler owns the single persistent subscription to the
//! client→server channel and dispatches each frame to the processor
//! registered for its event kind. It is spawned exactly once at process
//! start; request handlers never subscribe.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use shared::message::{BusMessage, EventKind};

use crate::message::processor::{
    ChatRelayProcessor, DeliveryAckProcessor, MessageProcessor, ProcessResult,
};
use crate::message::MessageBus;
use crate::store::MessageStore;

pub struct MessageHandler {
    receiver: broadcast::Receiver<BusMessage>,
    shutdown_token: CancellationToken,
    processors: HashMap<EventKind, Arc<dyn MessageProcessor>>,
}

impl MessageHandler {
    pub fn new(
        receiver: broadcast::Receiver<BusMessage>,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            receiver,
            shutdown_token,
            processors: HashMap::new(),
        }
    }

    /// Register a processor for its event kind
    pub fn register_processor(mut self, processor: Arc<dyn MessageProcessor>) -> Self {
        self.processors.insert(processor.event_kind(), processor);
        self
    }

    /// Handler wired with the standard processors (ack + chat relay)
    pub fn with_default_processors(
        receiver: broadcast::Receiver<BusMessage>,
        shutdown_token: CancellationToken,
        messages: Arc<MessageStore>,
        bus: Arc<MessageBus>,
    ) -> Self {
        Self::new(receiver, shutdown_token)
            .register_processor(Arc::new(DeliveryAckProcessor::new(messages)))
            .register_processor(Arc::new(ChatRelayProcessor::new(bus)))
    }

    /// Start processing frames
    ///
    /// Long-running; spawn in the background. Processing failures are logged
    /// and never propagate anywhere near a request path.
    pub async fn run(mut self) {
        tracing::info!("Message handler started");

        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => {
                    tracing::info!("Message handler shutting down");
                    break;
                }

                msg_result = self.receiver.recv() => {
                    match msg_result {
                        Ok(msg) => self.handle_frame(&msg).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("Message handler lagged, skipped {} frames", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Client frame channel closed");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("Message handler stopped");
    }

    async fn handle_frame(&self, msg: &BusMessage) {
        let kind = msg.event.kind();
        let Some(processor) = self.processors.get(&kind) else {
            // Clients may only originate chat frames and delivery acks
            tracing::debug!(event = %kind, "No processor for client frame, ignoring");
            return;
        };

        match processor.process(msg).await {
            Ok(ProcessResult::Success { message }) => {
                tracing::debug!(event = %kind, result = %message, "Frame processed");
            }
            Ok(ProcessResult::Skipped { reason }) => {
                tracing::debug!(event = %kind, reason = %reason, "Frame skipped");
            }
            Err(e) => {
                tracing::error!(event = %kind, error = %e, "Frame processing failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::message::{DeliveryAck, HubEvent};
    use shared::models::{ChatChannel, ChatMessageCreate};

    /// End-to-end through the bus: client ack frame → handler → store flag
    #[tokio::test]
    async fn ack_frame_flows_through_the_persistent_subscription() {
        let bus = Arc::new(MessageBus::new());
        let store = Arc::new(MessageStore::new(bus.clone(), Duration::hours(3)));
        let msg = store
            .append(
                "o1",
                ChatMessageCreate {
                    content: "ready in 5".into(),
                    sender_id: "rest-1".into(),
                    is_from_user: false,
                    chat_type: ChatChannel::RestaurantChat,
                },
            )
            .unwrap();

        let token = CancellationToken::new();
        let handler = MessageHandler::with_default_processors(
            bus.subscribe_to_clients(),
            token.clone(),
            store.clone(),
            bus.clone(),
        );
        let handle = tokio::spawn(handler.run());

        bus.send_to_server(BusMessage::from_client(
            "conn-1",
            HubEvent::MessageDelivered(DeliveryAck {
                message_id: msg.id.clone(),
            }),
        ));

        // Give the handler a moment to drain the frame
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(store.list("o1", None)[0].delivered);

        token.cancel();
        handle.await.unwrap();
    }
}
