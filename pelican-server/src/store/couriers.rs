//! CourierStore - courier presence and delivery bookkeeping
//!
//! Couriers are created/updated on first activity and evicted by the sweep
//! once idle beyond the idle-TTL. Every touch restamps `last_active_at`.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use shared::models::Courier;

use super::expiring::ExpiringStore;

/// Flat per-drop fee credited to a courier on delivery
fn delivery_fee() -> Decimal {
    Decimal::new(500, 2)
}

pub struct CourierStore {
    couriers: ExpiringStore<String, Courier>,
}

impl CourierStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            couriers: ExpiringStore::new(idle_ttl),
        }
    }

    fn blank(id: &str) -> Courier {
        Courier {
            id: id.to_string(),
            name: String::new(),
            phone: None,
            vehicle: None,
            is_available: true,
            current_order_id: None,
            total_deliveries: 0,
            total_earnings: Decimal::ZERO,
            last_active_at: Utc::now(),
        }
    }

    /// Upsert on any activity, restamping `last_active_at`
    pub fn record_activity(&self, courier_id: &str, name: Option<&str>) {
        self.couriers
            .upsert(courier_id.to_string(), Self::blank(courier_id), |courier| {
                if let Some(name) = name {
                    courier.name = name.to_string();
                }
                courier.last_active_at = Utc::now();
            });
    }

    /// The courier takes an order: unavailable until it completes
    pub fn assign_order(&self, courier_id: &str, name: Option<&str>, order_id: &str) {
        self.couriers
            .upsert(courier_id.to_string(), Self::blank(courier_id), |courier| {
                if let Some(name) = name {
                    courier.name = name.to_string();
                }
                courier.is_available = false;
                courier.current_order_id = Some(order_id.to_string());
                courier.last_active_at = Utc::now();
            });
    }

    /// A drop completed: bump counters, credit the fee, free the courier
    pub fn record_delivery(&self, courier_id: &str) {
        self.couriers
            .upsert(courier_id.to_string(), Self::blank(courier_id), |courier| {
                courier.total_deliveries += 1;
                courier.total_earnings += delivery_fee();
                courier.current_order_id = None;
                courier.is_available = true;
                courier.last_active_at = Utc::now();
            });
    }

    pub fn get(&self, courier_id: &str) -> Option<Courier> {
        self.couriers.get(&courier_id.to_string())
    }

    /// Evict couriers idle beyond the TTL; returns the count removed
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        self.couriers.sweep(now)
    }

    pub fn len(&self) -> usize {
        self.couriers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_activity_creates_the_courier() {
        let store = CourierStore::new(Duration::hours(24));
        store.record_activity("c1", Some("Ana"));

        let courier = store.get("c1").unwrap();
        assert_eq!(courier.name, "Ana");
        assert!(courier.is_available);
        assert_eq!(courier.total_deliveries, 0);
    }

    #[test]
    fn assignment_and_delivery_update_bookkeeping() {
        let store = CourierStore::new(Duration::hours(24));
        store.assign_order("c1", Some("Ana"), "o1");

        let busy = store.get("c1").unwrap();
        assert!(!busy.is_available);
        assert_eq!(busy.current_order_id.as_deref(), Some("o1"));

        store.record_delivery("c1");
        let free = store.get("c1").unwrap();
        assert!(free.is_available);
        assert_eq!(free.current_order_id, None);
        assert_eq!(free.total_deliveries, 1);
        assert_eq!(free.total_earnings, Decimal::new(500, 2));
    }

    #[test]
    fn idle_couriers_are_swept() {
        let store = CourierStore::new(Duration::hours(24));
        store.record_activity("c1", None);

        assert_eq!(store.sweep(Utc::now() + Duration::hours(25)), 1);
        assert_eq!(store.len(), 0);
    }
}
