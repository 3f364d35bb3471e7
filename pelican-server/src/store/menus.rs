//! MenuStore - full-replace menu snapshots with a 24 h TTL
//!
//! A restaurant's menu is one value: posting a new menu replaces the previous
//! snapshot wholesale and resets its TTL clock. Items are never addressed
//! individually.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use shared::models::{MenuItem, MenuItemInput};
use uuid::Uuid;

use super::expiring::ExpiringStore;
use crate::utils::{AppError, AppResult};

pub struct MenuStore {
    menus: ExpiringStore<String, Vec<MenuItem>>,
}

impl MenuStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            menus: ExpiringStore::new(ttl),
        }
    }

    /// Replace the restaurant's menu snapshot, stamping ids and timestamps
    pub fn set_menu(
        &self,
        restaurant_id: &str,
        items: Vec<MenuItemInput>,
    ) -> AppResult<Vec<MenuItem>> {
        let now = Utc::now();
        let mut menu = Vec::with_capacity(items.len());
        for item in items {
            if item.name.trim().is_empty() {
                return Err(AppError::validation("Menu item name is required"));
            }
            if item.price < Decimal::ZERO {
                return Err(AppError::validation(format!(
                    "Menu item {} has a negative price",
                    item.name
                )));
            }
            menu.push(MenuItem {
                id: item.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                name: item.name,
                description: item.description,
                price: item.price,
                category: item.category,
                is_available: item.is_available,
                image: item.image,
                updated_at: now,
            });
        }

        self.menus.put(restaurant_id.to_string(), menu.clone());
        tracing::info!(restaurant = %restaurant_id, items = menu.len(), "Menu replaced");
        Ok(menu)
    }

    /// The restaurant's current menu, absent once the TTL has elapsed
    pub fn get_menu(&self, restaurant_id: &str) -> Option<Vec<MenuItem>> {
        self.menus.get(&restaurant_id.to_string())
    }

    /// Image filenames referenced by any live menu (orphan-sweep input)
    pub fn referenced_images(&self) -> Vec<String> {
        self.menus
            .values()
            .into_iter()
            .flatten()
            .filter_map(|item| item.image)
            .collect()
    }

    /// Evict menus older than the TTL; returns the count removed
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        self.menus.sweep(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: Decimal) -> MenuItemInput {
        MenuItemInput {
            id: None,
            name: name.to_string(),
            description: String::new(),
            price,
            category: "mains".to_string(),
            is_available: true,
            image: None,
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let store = MenuStore::new(Duration::hours(24));
        let stored = store
            .set_menu(
                "rest-1",
                vec![
                    input("Pad Thai", Decimal::new(999, 2)),
                    input("Green Curry", Decimal::new(1150, 2)),
                ],
            )
            .unwrap();

        let menu = store.get_menu("rest-1").unwrap();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].id, stored[0].id);
        assert_eq!(menu[0].name, "Pad Thai");
        assert_eq!(menu[0].price, Decimal::new(999, 2));
    }

    #[test]
    fn posting_replaces_the_previous_snapshot() {
        let store = MenuStore::new(Duration::hours(24));
        store
            .set_menu("rest-1", vec![input("Old Dish", Decimal::ONE)])
            .unwrap();
        store
            .set_menu("rest-1", vec![input("New Dish", Decimal::TWO)])
            .unwrap();

        let menu = store.get_menu("rest-1").unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].name, "New Dish");
    }

    #[test]
    fn negative_price_is_rejected() {
        let store = MenuStore::new(Duration::hours(24));
        let err = store
            .set_menu("rest-1", vec![input("Bad", Decimal::new(-100, 2))])
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.get_menu("rest-1").is_none());
    }
}
