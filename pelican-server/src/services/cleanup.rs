//! Cleanup Service
//!
//! 周期性清理任务：每个 tick 依次清扫菜单、聊天线程、订单、孤儿图片、
//! 骑手。各清扫相互独立，单个失败 (例如文件删除错误) 不会中断其余清扫，
//! 也永远不会影响任何请求路径。

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::services::ImageStore;
use crate::store::{CourierStore, MenuStore, MessageStore, OrderRegistry, RestaurantStore};

pub struct CleanupService {
    menus: Arc<MenuStore>,
    messages: Arc<MessageStore>,
    orders: Arc<OrderRegistry>,
    couriers: Arc<CourierStore>,
    restaurants: Arc<RestaurantStore>,
    images: ImageStore,
    /// 孤儿图片存活时长
    image_ttl: Duration,
    /// tick 间隔
    interval: std::time::Duration,
}

impl CleanupService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        menus: Arc<MenuStore>,
        messages: Arc<MessageStore>,
        orders: Arc<OrderRegistry>,
        couriers: Arc<CourierStore>,
        restaurants: Arc<RestaurantStore>,
        images: ImageStore,
        image_ttl: Duration,
        interval: std::time::Duration,
    ) -> Self {
        Self {
            menus,
            messages,
            orders,
            couriers,
            restaurants,
            images,
            image_ttl,
            interval,
        }
    }

    /// Periodic loop; runs until the shutdown token fires
    pub async fn run(self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; treat it as the startup sweep
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Cleanup service started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Cleanup service shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.run_sweeps(Utc::now()).await;
                }
            }
        }
    }

    /// One full pass over every store, in sequence
    pub async fn run_sweeps(&self, now: DateTime<Utc>) {
        let menus = self.menus.sweep(now);
        let messages = self.messages.sweep(now);
        let orders = self.orders.sweep(now);

        // Orphan images: anything referenced by a restaurant cover or a live
        // menu item stays, regardless of age.
        let in_use: HashSet<String> = self
            .restaurants
            .referenced_images()
            .into_iter()
            .chain(self.menus.referenced_images())
            .collect();
        let images = self.images.cleanup_orphans(&in_use, now, self.image_ttl).await;

        let couriers = self.couriers.sweep(now);

        if menus + messages + orders + images + couriers > 0 {
            tracing::info!(
                menus,
                messages,
                orders,
                images,
                couriers,
                "Cleanup sweep evicted stale entries"
            );
        } else {
            tracing::debug!("Cleanup sweep found nothing to evict");
        }
    }
}
