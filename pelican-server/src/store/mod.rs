//! 共享状态存储
//!
//! 所有可变共享状态都封装在本模块的组件中：调用方只能通过定义好的操作
//! 访问，永远拿不到内部集合的迭代/可变句柄，取到的都是快照副本。
//! 每个组件内部用一把锁覆盖完整的读-改-写序列。
//!
//! # 组件
//!
//! - [`ExpiringStore`] - 通用 TTL 键值存储
//! - [`RestaurantStore`] - 餐厅目录 (无 TTL)
//! - [`MenuStore`] - 菜单快照 (24h TTL)
//! - [`OrderRegistry`] - 订单注册表 (终态订单 24h 保留)
//! - [`MessageStore`] - 订单聊天线程 (消息粒度 3h TTL)
//! - [`CourierStore`] - 骑手目录 (闲置 24h 淘汰)

pub mod couriers;
pub mod expiring;
pub mod menus;
pub mod messages;
pub mod orders;
pub mod restaurants;

pub use couriers::CourierStore;
pub use expiring::ExpiringStore;
pub use menus::MenuStore;
pub use messages::MessageStore;
pub use orders::OrderRegistry;
pub use restaurants::RestaurantStore;
