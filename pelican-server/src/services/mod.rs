//! 后台服务
//!
//! - [`ImageStore`] - 上传图片的落盘、校验与孤儿清理
//! - [`CleanupService`] - 周期性 TTL 清扫调度

pub mod cleanup;
pub mod images;

pub use cleanup::CleanupService;
pub use images::{ImageStore, StoredImage};
