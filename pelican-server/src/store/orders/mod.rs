//! OrderRegistry - owner-bucketed order state and lifecycle
//!
//! This module handles:
//! - Order batch creation with line-item total validation
//! - Status transitions against the explicit transition table
//! - Courier assignment bookkeeping on the order itself
//! - Terminal-order retention sweeps
//! - Event broadcasting after each committed mutation
//!
//! # Mutation Flow
//!
//! ```text
//! create_orders(owner, drafts)
//!     ├─ 1. Validate every draft (totals, quantities)
//!     ├─ 2. Stamp ids / timestamps, append to the owner bucket
//!     ├─ 3. Release the lock
//!     └─ 4. Broadcast one new_order event per created order
//! ```
//!
//! The whole read-modify-write sequence runs under one `RwLock` write guard;
//! broadcasting happens after the guard is dropped and is best-effort.


use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use shared::message::HubEvent;
use shared::models::{Order, OrderDraft, OrderItem, OrderStatus, OwnerRole};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::message::MessageBus;
use crate::utils::{AppError, AppResult};

/// In-memory registry of all live orders, bucketed by the owning principal
pub struct OrderRegistry {
    /// Owner id → that principal's orders
    buckets: RwLock<HashMap<String, Vec<Order>>>,
    bus: Arc<MessageBus>,
    /// 24 h listing/retention window
    retention: Duration,
}

impl OrderRegistry {
    pub fn new(bus: Arc<MessageBus>, retention: Duration) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            bus,
            retention,
        }
    }

    /// List orders visible to `owner_id` under the given role hint
    ///
    /// Results exclude orders older than the retention window regardless of
    /// status. Read-only; never mutates.
    pub fn list_orders(&self, owner_id: &str, role: OwnerRole) -> Vec<Order> {
        self.list_orders_at(owner_id, role, Utc::now())
    }

    pub(crate) fn list_orders_at(
        &self,
        owner_id: &str,
        role: OwnerRole,
        now: DateTime<Utc>,
    ) -> Vec<Order> {
        let buckets = self.buckets.read();
        buckets
            .values()
            .flatten()
            .filter(|order| match role {
                OwnerRole::Customer => order.customer_id == owner_id,
                OwnerRole::Courier => order.courier_id.as_deref() == Some(owner_id),
                OwnerRole::Restaurant => order.restaurant_id == owner_id,
            })
            .filter(|order| now - order.created_at <= self.retention)
            .cloned()
            .collect()
    }

    /// Orders ready for pickup with no courier yet (courier polling)
    pub fn list_available(&self) -> Vec<Order> {
        let buckets = self.buckets.read();
        buckets
            .values()
            .flatten()
            .filter(|order| order.status == OrderStatus::Ready && order.courier_id.is_none())
            .cloned()
            .collect()
    }

    /// Append a batch of orders to the owner's bucket
    ///
    /// The whole batch is validated before anything is inserted; a single bad
    /// draft rejects the batch. On success one `new_order` event is broadcast
    /// per created order.
    pub fn create_orders(&self, owner_id: &str, drafts: Vec<OrderDraft>) -> AppResult<Vec<Order>> {
        for (idx, draft) in drafts.iter().enumerate() {
            validate_draft(idx, draft)?;
        }

        let now = Utc::now();
        let created: Vec<Order> = drafts
            .into_iter()
            .map(|draft| Order {
                id: Uuid::new_v4().to_string(),
                customer_id: owner_id.to_string(),
                restaurant_id: draft.restaurant_id,
                status: OrderStatus::Pending,
                total: draft.total,
                items: draft
                    .items
                    .into_iter()
                    .map(|item| OrderItem {
                        id: Uuid::new_v4().to_string(),
                        menu_item_id: item.menu_item_id,
                        name: item.name,
                        price: item.price,
                        quantity: item.quantity,
                    })
                    .collect(),
                delivery_address: draft.delivery_address,
                courier_id: None,
                courier_name: None,
                created_at: now,
            })
            .collect();

        {
            let mut buckets = self.buckets.write();
            buckets
                .entry(owner_id.to_string())
                .or_default()
                .extend(created.iter().cloned());
        }

        // Broadcast after the mutation is applied; every order of the batch
        // gets its own event.
        for order in &created {
            self.bus.publish(HubEvent::NewOrder(order.clone()));
        }

        tracing::info!(owner = %owner_id, count = created.len(), "Orders created");
        Ok(created)
    }

    /// Apply a status transition to the order with the given id
    ///
    /// Scans every bucket (no owner hint required). Terminal orders and
    /// transitions missing from the table are rejected. A courier id, once
    /// assigned, is retained across updates that omit one; passing a courier
    /// id explicitly replaces the assignment.
    pub fn update_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
        courier_id: Option<String>,
        courier_name: Option<String>,
    ) -> AppResult<Order> {
        let snapshot = {
            let mut buckets = self.buckets.write();
            let order = buckets
                .values_mut()
                .flatten()
                .find(|order| order.id == order_id)
                .ok_or_else(|| AppError::not_found(format!("Order {}", order_id)))?;

            if order.status.is_terminal() {
                return Err(AppError::business_rule(format!(
                    "Order {} is already {} and cannot change",
                    order_id, order.status
                )));
            }
            if !order.status.can_transition_to(new_status) {
                return Err(AppError::business_rule(format!(
                    "Illegal status transition {} -> {}",
                    order.status, new_status
                )));
            }

            order.status = new_status;
            if let Some(cid) = courier_id {
                order.courier_id = Some(cid);
                if courier_name.is_some() {
                    order.courier_name = courier_name;
                }
            }
            order.clone()
        };

        self.bus.publish(HubEvent::order_update(&snapshot));
        tracing::info!(order = %order_id, status = %snapshot.status, "Order status updated");
        Ok(snapshot)
    }

    /// Evict terminal orders older than the retention window
    ///
    /// Non-terminal orders are retained regardless of age; emptied buckets
    /// are removed entirely. Returns the number of orders evicted.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut buckets = self.buckets.write();
        let mut removed = 0;
        buckets.retain(|_, orders| {
            let before = orders.len();
            orders.retain(|order| {
                !order.status.is_terminal() || now - order.created_at <= self.retention
            });
            removed += before - orders.len();
            !orders.is_empty()
        });
        removed
    }

    /// Total number of orders across all buckets
    pub fn len(&self) -> usize {
        self.buckets.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A draft is valid when it has items, every quantity is at least one, and
/// the declared total exactly equals the line-item sum.
fn validate_draft(idx: usize, draft: &OrderDraft) -> AppResult<()> {
    if draft.items.is_empty() {
        return Err(AppError::validation(format!("Order #{} has no items", idx)));
    }
    if draft.delivery_address.trim().is_empty() {
        return Err(AppError::validation(format!(
            "Order #{} is missing a delivery address",
            idx
        )));
    }
    let mut sum = Decimal::ZERO;
    for item in &draft.items {
        if item.quantity == 0 {
            return Err(AppError::validation(format!(
                "Order #{}: item {} has zero quantity",
                idx, item.menu_item_id
            )));
        }
        if item.price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Order #{}: item {} has a negative price",
                idx, item.menu_item_id
            )));
        }
        sum += item.price * Decimal::from(item.quantity);
    }
    if sum != draft.total {
        return Err(AppError::validation(format!(
            "Order #{}: declared total {} does not match item sum {}",
            idx, draft.total, sum
        )));
    }
    Ok(())
}
