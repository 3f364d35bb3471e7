//! MessageStore - per-order chat threads with message-granular TTL
//!
//! Threads are append-only; a message changes only through its `delivered`
//! flag or batch eviction. Listing a thread prunes expired messages and
//! persists the pruned list back (read triggers eviction), then applies the
//! optional channel filter to the returned snapshot.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use shared::message::HubEvent;
use shared::models::{ChatChannel, ChatMessage, ChatMessageCreate};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::message::MessageBus;
use crate::utils::{AppError, AppResult};

/// Per-order ordered message sequences, partitioned by chat channel
pub struct MessageStore {
    /// Order id → that order's messages, in append order
    threads: RwLock<HashMap<String, Vec<ChatMessage>>>,
    bus: Arc<MessageBus>,
    /// Per-message TTL (3 h)
    ttl: Duration,
}

impl MessageStore {
    pub fn new(bus: Arc<MessageBus>, ttl: Duration) -> Self {
        Self {
            threads: RwLock::new(HashMap::new()),
            bus,
            ttl,
        }
    }

    /// Append a message to the order's thread and broadcast `new_message`
    pub fn append(&self, order_id: &str, create: ChatMessageCreate) -> AppResult<ChatMessage> {
        if order_id.trim().is_empty() {
            return Err(AppError::validation("Missing order id"));
        }
        if create.content.trim().is_empty() {
            return Err(AppError::validation("Message content is required"));
        }
        if create.sender_id.trim().is_empty() {
            return Err(AppError::validation("Sender id is required"));
        }

        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            content: create.content,
            sender_id: create.sender_id,
            is_from_user: create.is_from_user,
            chat_type: create.chat_type,
            created_at: Utc::now(),
            delivered: false,
        };

        {
            let mut threads = self.threads.write();
            threads
                .entry(order_id.to_string())
                .or_default()
                .push(message.clone());
        }

        self.bus.publish(HubEvent::NewMessage(message.clone()));
        tracing::debug!(order = %order_id, chat = ?message.chat_type, "Message appended");
        Ok(message)
    }

    /// List an order's messages, optionally filtered by channel
    ///
    /// Messages past the TTL are evicted in place before the snapshot is
    /// taken, so a listing always reflects (and enforces) the window.
    pub fn list(&self, order_id: &str, chat_type: Option<ChatChannel>) -> Vec<ChatMessage> {
        self.list_at(order_id, chat_type, Utc::now())
    }

    pub(crate) fn list_at(
        &self,
        order_id: &str,
        chat_type: Option<ChatChannel>,
        now: DateTime<Utc>,
    ) -> Vec<ChatMessage> {
        let mut threads = self.threads.write();
        let Some(thread) = threads.get_mut(order_id) else {
            return Vec::new();
        };

        thread.retain(|msg| now - msg.created_at <= self.ttl);
        let snapshot: Vec<ChatMessage> = thread
            .iter()
            .filter(|msg| chat_type.is_none_or(|chat| msg.chat_type == chat))
            .cloned()
            .collect();
        if thread.is_empty() {
            threads.remove(order_id);
        }
        snapshot
    }

    /// Acknowledge delivery of a message
    ///
    /// Sets the `delivered` flag; the message remains readable for everyone
    /// else until the TTL evicts it. Returns false for unknown ids.
    pub fn mark_delivered(&self, message_id: &str) -> bool {
        let mut threads = self.threads.write();
        for thread in threads.values_mut() {
            if let Some(msg) = thread.iter_mut().find(|msg| msg.id == message_id) {
                msg.delivered = true;
                tracing::debug!(message = %message_id, "Message marked delivered");
                return true;
            }
        }
        false
    }

    /// Evict messages older than the TTL; empty threads are removed.
    /// Returns the number of messages evicted.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut threads = self.threads.write();
        let mut removed = 0;
        threads.retain(|_, thread| {
            let before = thread.len();
            thread.retain(|msg| now - msg.created_at <= self.ttl);
            removed += before - thread.len();
            !thread.is_empty()
        });
        removed
    }

    /// Total number of live messages across all threads
    pub fn len(&self) -> usize {
        self.threads.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (Arc<MessageBus>, MessageStore) {
        let bus = Arc::new(MessageBus::new());
        let store = MessageStore::new(bus.clone(), Duration::hours(3));
        (bus, store)
    }

    fn create(content: &str, chat_type: ChatChannel) -> ChatMessageCreate {
        ChatMessageCreate {
            content: content.to_string(),
            sender_id: "cust-1".to_string(),
            is_from_user: true,
            chat_type,
        }
    }

    #[test]
    fn append_stamps_identity_and_flags() {
        let (_bus, store) = test_store();
        let msg = store
            .append("o1", create("on my way", ChatChannel::CourierChat))
            .unwrap();
        assert!(!msg.delivered);
        assert_eq!(msg.order_id, "o1");
        assert!(!msg.id.is_empty());
    }

    #[test]
    fn append_validates_required_fields() {
        let (_bus, store) = test_store();

        let err = store
            .append("o1", create("   ", ChatChannel::RestaurantChat))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut missing_sender = create("hello", ChatChannel::RestaurantChat);
        missing_sender.sender_id = String::new();
        let err = store.append("o1", missing_sender).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn append_broadcasts_new_message() {
        let (bus, store) = test_store();
        let mut rx = bus.subscribe();

        let msg = store
            .append("o1", create("hello", ChatChannel::RestaurantChat))
            .unwrap();

        let event = rx.try_recv().unwrap();
        match event.event {
            HubEvent::NewMessage(broadcast) => assert_eq!(broadcast.id, msg.id),
            other => panic!("expected new_message, got {:?}", other.kind()),
        }
    }

    #[test]
    fn every_connection_sees_exactly_one_new_message_event() {
        let (bus, store) = test_store();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        store
            .append("o1", create("hello", ChatChannel::RestaurantChat))
            .unwrap();

        // Broadcast is unaddressed: both connections get the event, once
        assert!(matches!(rx1.try_recv().unwrap().event, HubEvent::NewMessage(_)));
        assert!(matches!(rx2.try_recv().unwrap().event, HubEvent::NewMessage(_)));
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn channel_filter_partitions_the_thread() {
        let (_bus, store) = test_store();
        store
            .append("o1", create("for the kitchen", ChatChannel::RestaurantChat))
            .unwrap();

        assert!(store.list("o1", Some(ChatChannel::CourierChat)).is_empty());
        assert_eq!(store.list("o1", Some(ChatChannel::RestaurantChat)).len(), 1);
        assert_eq!(store.list("o1", None).len(), 1);
    }

    #[test]
    fn listing_twice_inside_the_window_is_idempotent() {
        let (_bus, store) = test_store();
        store
            .append("o1", create("a", ChatChannel::RestaurantChat))
            .unwrap();
        store
            .append("o1", create("b", ChatChannel::RestaurantChat))
            .unwrap();

        let first = store.list("o1", None);
        let second = store.list("o1", None);
        assert_eq!(first.len(), second.len());
        let ids: Vec<_> = first.iter().map(|m| &m.id).collect();
        let ids2: Vec<_> = second.iter().map(|m| &m.id).collect();
        assert_eq!(ids, ids2);
    }

    #[test]
    fn expiry_boundary_is_exactly_three_hours() {
        let (_bus, store) = test_store();
        let msg = store
            .append("o1", create("ping", ChatChannel::RestaurantChat))
            .unwrap();
        let t0 = msg.created_at;

        // Present at T+2h59m
        assert_eq!(
            store
                .list_at("o1", None, t0 + Duration::minutes(179))
                .len(),
            1
        );
        // Absent at T+3h01m, and the read evicted it
        assert!(
            store
                .list_at("o1", None, t0 + Duration::minutes(181))
                .is_empty()
        );
        assert!(store.is_empty());
    }

    #[test]
    fn mark_delivered_sets_the_flag_without_removal() {
        let (_bus, store) = test_store();
        let msg = store
            .append("o1", create("got it?", ChatChannel::CourierChat))
            .unwrap();

        assert!(store.mark_delivered(&msg.id));
        assert!(!store.mark_delivered("unknown-id"));

        // Still listed for every reader, now flagged
        let listed = store.list("o1", None);
        assert_eq!(listed.len(), 1);
        assert!(listed[0].delivered);
    }

    #[test]
    fn sweep_removes_expired_messages_and_empty_threads() {
        let (_bus, store) = test_store();
        let early = store
            .append("o1", create("early", ChatChannel::RestaurantChat))
            .unwrap();
        store
            .append("o2", create("other thread", ChatChannel::CourierChat))
            .unwrap();

        let removed = store.sweep(early.created_at + Duration::hours(4));
        assert_eq!(removed, 2);
        assert!(store.is_empty());
        assert!(store.threads.read().is_empty());
    }
}
