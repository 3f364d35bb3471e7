use std::sync::Arc;

use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::Config;
use crate::message::{MessageBus, MessageHandler};
use crate::services::{CleanupService, ImageStore};
use crate::store::{CourierStore, MenuStore, MessageStore, OrderRegistry, RestaurantStore};

/// 服务器状态 - 持有所有存储与服务的单例引用
///
/// ServerState 是协调中枢的核心数据结构。所有存储都是进程级单例，
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | bus | Arc<MessageBus> | 实时事件广播中心 |
/// | restaurants | Arc<RestaurantStore> | 餐厅目录 |
/// | menus | Arc<MenuStore> | 菜单快照 (24h TTL) |
/// | orders | Arc<OrderRegistry> | 订单注册表 |
/// | messages | Arc<MessageStore> | 聊天线程 (3h TTL) |
/// | couriers | Arc<CourierStore> | 骑手目录 (闲置淘汰) |
/// | images | ImageStore | 上传图片落盘 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 实时事件广播中心
    pub bus: Arc<MessageBus>,
    /// 餐厅目录
    pub restaurants: Arc<RestaurantStore>,
    /// 菜单快照存储
    pub menus: Arc<MenuStore>,
    /// 订单注册表
    pub orders: Arc<OrderRegistry>,
    /// 聊天线程存储
    pub messages: Arc<MessageStore>,
    /// 骑手目录
    pub couriers: Arc<CourierStore>,
    /// 上传图片存储
    pub images: ImageStore,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：工作目录结构、消息总线、各存储。
    ///
    /// # Panics
    ///
    /// 工作目录创建失败时 panic
    pub fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let bus = Arc::new(MessageBus::with_capacity(config.channel_capacity));

        Self {
            config: config.clone(),
            restaurants: Arc::new(RestaurantStore::new()),
            menus: Arc::new(MenuStore::new(config.menu_ttl())),
            orders: Arc::new(OrderRegistry::new(bus.clone(), config.order_retention())),
            messages: Arc::new(MessageStore::new(bus.clone(), config.message_ttl())),
            couriers: Arc::new(CourierStore::new(config.courier_idle_ttl())),
            images: ImageStore::new(config.images_dir()),
            bus,
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 接收请求之前调用。
    ///
    /// 启动的任务：
    /// - 入站帧处理器 (MessageHandler) - 送达回执与聊天透传
    /// - 清理调度 (CleanupService) - 周期性 TTL 清扫
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let handler = MessageHandler::with_default_processors(
            self.bus.subscribe_to_clients(),
            tasks.shutdown_token(),
            self.messages.clone(),
            self.bus.clone(),
        );
        tasks.spawn("message_handler", TaskKind::Listener, handler.run());

        let cleanup = CleanupService::new(
            self.menus.clone(),
            self.messages.clone(),
            self.orders.clone(),
            self.couriers.clone(),
            self.restaurants.clone(),
            self.images.clone(),
            self.config.image_ttl(),
            std::time::Duration::from_secs(self.config.cleanup_interval_secs),
        );
        let shutdown = tasks.shutdown_token();
        tasks.spawn("cleanup", TaskKind::Periodic, cleanup.run(shutdown));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::{
        ChatChannel, ChatMessageCreate, MenuItemInput, OrderDraft, OrderItemDraft, OrderStatus,
        OwnerRole, RestaurantUpsert,
    };

    fn test_state() -> (tempfile::TempDir, ServerState) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
        let state = ServerState::initialize(&config);
        (dir, state)
    }

    /// The restaurant → menu → order → status flow, across the stores
    #[test]
    fn order_flow_end_to_end() {
        let (_dir, state) = test_state();

        state
            .restaurants
            .upsert(
                RestaurantUpsert {
                    id: "r1".into(),
                    name: "Thai Garden".into(),
                    is_active: true,
                },
                None,
            )
            .unwrap();

        let menu = state
            .menus
            .set_menu(
                "r1",
                vec![MenuItemInput {
                    id: None,
                    name: "Pad Thai".into(),
                    description: String::new(),
                    price: Decimal::new(999, 2),
                    category: "mains".into(),
                    is_available: true,
                    image: None,
                }],
            )
            .unwrap();

        let created = state
            .orders
            .create_orders(
                "cust-1",
                vec![OrderDraft {
                    restaurant_id: "r1".into(),
                    total: Decimal::new(999, 2),
                    items: vec![OrderItemDraft {
                        menu_item_id: menu[0].id.clone(),
                        name: menu[0].name.clone(),
                        price: menu[0].price,
                        quantity: 1,
                    }],
                    delivery_address: "1 Harbour St".into(),
                }],
            )
            .unwrap();
        let order_id = created[0].id.clone();

        state
            .orders
            .update_status(&order_id, OrderStatus::Accepted, None, None)
            .unwrap();
        state
            .orders
            .update_status(&order_id, OrderStatus::Preparing, None, None)
            .unwrap();

        let listed = state.orders.list_orders("r1", OwnerRole::Restaurant);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, OrderStatus::Preparing);
    }

    /// Chat channels partition an order's thread
    #[test]
    fn message_channels_are_independent() {
        let (_dir, state) = test_state();

        state
            .messages
            .append(
                "o1",
                ChatMessageCreate {
                    content: "extra chili please".into(),
                    sender_id: "cust-1".into(),
                    is_from_user: true,
                    chat_type: ChatChannel::RestaurantChat,
                },
            )
            .unwrap();

        assert!(
            state
                .messages
                .list("o1", Some(ChatChannel::CourierChat))
                .is_empty()
        );
        assert_eq!(
            state
                .messages
                .list("o1", Some(ChatChannel::RestaurantChat))
                .len(),
            1
        );
    }
}
