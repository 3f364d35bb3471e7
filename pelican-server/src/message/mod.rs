//! 实时消息模块
//!
//! # 架构
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     MessageBus                        │
//! │   server_tx ──▶ 每个 WebSocket 连接 (扇出广播)        │
//! │   client_tx ──▶ MessageHandler (入站帧处理)           │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! - [`bus`] - 广播中心 (连接注册表 + 双向通道)
//! - [`ws`] - WebSocket 接入端点
//! - [`handler`] - 入站帧分发器 (进程启动时注册一次)
//! - [`processor`] - 入站帧处理器 (送达回执 / 聊天透传)

pub mod bus;
pub mod handler;
pub mod processor;
pub mod ws;

pub use bus::{ConnectedClient, MessageBus};
pub use handler::MessageHandler;
pub use processor::{MessageProcessor, ProcessResult};
