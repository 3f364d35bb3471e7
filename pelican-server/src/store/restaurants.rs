//! RestaurantStore - the global restaurant directory
//!
//! No TTL: restaurants live for the process lifetime and are mutated only via
//! full replace-by-id.

use chrono::Utc;
use dashmap::DashMap;
use shared::models::{Restaurant, RestaurantUpsert};

use crate::utils::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct RestaurantStore {
    restaurants: DashMap<String, Restaurant>,
}

impl RestaurantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All restaurants, inactive ones excluded unless asked for
    pub fn list(&self, include_inactive: bool) -> Vec<Restaurant> {
        self.restaurants
            .iter()
            .filter(|entry| include_inactive || entry.value().is_active)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Restaurant> {
        self.restaurants.get(id).map(|entry| entry.value().clone())
    }

    /// Full replace-by-id upsert
    ///
    /// `cover_image` of `None` keeps the existing cover. Returns the stored
    /// snapshot plus the filename of a replaced cover (so the caller can
    /// delete the orphaned file).
    pub fn upsert(
        &self,
        payload: RestaurantUpsert,
        cover_image: Option<String>,
    ) -> AppResult<(Restaurant, Option<String>)> {
        if payload.id.trim().is_empty() {
            return Err(AppError::validation("Restaurant id is required"));
        }
        if payload.name.trim().is_empty() {
            return Err(AppError::validation("Restaurant name is required"));
        }

        let previous = self.restaurants.get(&payload.id).map(|e| e.value().clone());
        let replaced_cover = match (&cover_image, previous.as_ref()) {
            (Some(_), Some(prev)) => prev.cover_image.clone(),
            _ => None,
        };

        let restaurant = Restaurant {
            id: payload.id.clone(),
            name: payload.name,
            cover_image: cover_image.or_else(|| previous.and_then(|p| p.cover_image)),
            is_active: payload.is_active,
            updated_at: Utc::now(),
        };
        self.restaurants
            .insert(payload.id.clone(), restaurant.clone());
        tracing::info!(restaurant = %payload.id, "Restaurant upserted");
        Ok((restaurant, replaced_cover))
    }

    /// Image filenames referenced by any restaurant (orphan-sweep input)
    pub fn referenced_images(&self) -> Vec<String> {
        self.restaurants
            .iter()
            .filter_map(|entry| entry.value().cover_image.clone())
            .collect()
    }
}
