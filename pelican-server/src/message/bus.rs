//! 消息总线核心实现
//!
//! # 消息流
//!
//! ```text
//! Store  ──▶ publish() ─────▶ server_tx ──▶ 每个 WebSocket 连接的转发任务
//!                                          (跳过 source == 自身 的帧)
//! Client ──▶ send_to_server() ──▶ client_tx ──▶ MessageHandler
//! ```
//!
//! 广播是尽力而为的：`publish` 永远不会让触发它的请求失败，单个连接的
//! 发送失败只会使该连接被注销。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use shared::message::{BusMessage, HubEvent};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// 已连接的实时客户端
#[derive(Debug, Clone)]
pub struct ConnectedClient {
    /// 连接标识 (进程内唯一，随 socket 生灭)
    pub id: String,
    pub connected_at: DateTime<Utc>,
}

/// 消息总线 - 实时事件扇出中心
///
/// # 职责
///
/// - 连接生命周期 (register / deregister)
/// - 服务端事件广播 (publish)
/// - 客户端入站帧路由 (send_to_server → MessageHandler)
#[derive(Debug)]
pub struct MessageBus {
    /// 客户端到服务器的消息通道
    client_tx: broadcast::Sender<BusMessage>,
    /// 服务器到客户端的广播通道
    server_tx: broadcast::Sender<BusMessage>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
    /// 已连接的客户端 (Connection ID -> 元数据)
    clients: DashMap<String, ConnectedClient>,
}

impl MessageBus {
    /// 创建默认容量的消息总线
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// 创建指定通道容量的消息总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (client_tx, _) = broadcast::channel(capacity);
        let (server_tx, _) = broadcast::channel(capacity);
        Self {
            client_tx,
            server_tx,
            shutdown_token: CancellationToken::new(),
            clients: DashMap::new(),
        }
    }

    /// 注册新连接 (WebSocket 建立时调用)
    pub fn register(&self, id: impl Into<String>) {
        let id = id.into();
        tracing::info!(conn = %id, "Client connected");
        self.clients.insert(
            id.clone(),
            ConnectedClient {
                id,
                connected_at: Utc::now(),
            },
        );
    }

    /// 注销连接 (断开或发送失败时调用)
    pub fn deregister(&self, id: &str) {
        if self.clients.remove(id).is_some() {
            tracing::info!(conn = %id, "Client disconnected");
        }
    }

    /// 当前连接数
    pub fn connection_count(&self) -> usize {
        self.clients.len()
    }

    /// 发布服务端事件 (广播给所有连接)
    ///
    /// 尽力而为：没有订阅者时静默丢弃，永远不向调用方返回错误。
    pub fn publish(&self, event: HubEvent) {
        let kind = event.kind();
        match self.server_tx.send(BusMessage::server(event)) {
            Ok(receivers) => {
                tracing::debug!(event = %kind, receivers, "Event published");
            }
            Err(_) => {
                // No live subscribers; nothing to deliver
                tracing::trace!(event = %kind, "Event dropped, no subscribers");
            }
        }
    }

    /// 转发一个保留来源标识的帧 (聊天透传)
    ///
    /// 每个连接的转发任务会跳过 source 等于自身的帧，发送者不会收到回环。
    pub fn relay(&self, msg: BusMessage) {
        let kind = msg.event.kind();
        if self.server_tx.send(msg).is_err() {
            tracing::trace!(event = %kind, "Relay dropped, no subscribers");
        }
    }

    /// 客户端入站帧 (WebSocket 读循环调用)
    pub fn send_to_server(&self, msg: BusMessage) {
        if let Err(e) = self.client_tx.send(msg) {
            tracing::warn!("Failed to forward client frame: {}", e);
        }
    }

    /// 订阅服务器广播 (每个 WebSocket 连接一个接收端)
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.server_tx.subscribe()
    }

    /// 订阅客户端入站帧 (MessageHandler 专用)
    pub fn subscribe_to_clients(&self) -> broadcast::Receiver<BusMessage> {
        self.client_tx.subscribe()
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭消息总线
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
