use std::path::PathBuf;

use chrono::Duration;

/// 服务器配置 - 协调中枢的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/pelican | 工作目录 (上传图片、日志) |
/// | HTTP_PORT | 3000 | HTTP/WebSocket 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | CLEANUP_INTERVAL_SECS | 900 | 清理任务运行间隔 (秒) |
/// | CHANNEL_CAPACITY | 1024 | 广播通道容量 |
/// | ORDER_RETENTION_HOURS | 24 | 终态订单保留时长 |
/// | MESSAGE_TTL_HOURS | 3 | 聊天消息存活时长 |
/// | MENU_TTL_HOURS | 24 | 菜单快照存活时长 |
/// | COURIER_IDLE_HOURS | 24 | 骑手闲置淘汰时长 |
/// | IMAGE_TTL_HOURS | 3 | 孤儿图片存活时长 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/pelican HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储上传图片、日志等文件
    pub work_dir: String,
    /// HTTP API / WebSocket 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 清理任务运行间隔 (秒)
    pub cleanup_interval_secs: u64,
    /// 广播通道容量
    pub channel_capacity: usize,
    /// 终态订单保留时长 (小时)
    pub order_retention_hours: i64,
    /// 聊天消息存活时长 (小时)
    pub message_ttl_hours: i64,
    /// 菜单快照存活时长 (小时)
    pub menu_ttl_hours: i64,
    /// 骑手闲置淘汰时长 (小时)
    pub courier_idle_hours: i64,
    /// 孤儿图片存活时长 (小时)
    pub image_ttl_hours: i64,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/pelican".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            cleanup_interval_secs: env_parse("CLEANUP_INTERVAL_SECS", 900),
            channel_capacity: env_parse("CHANNEL_CAPACITY", 1024),
            order_retention_hours: env_parse("ORDER_RETENTION_HOURS", 24),
            message_ttl_hours: env_parse("MESSAGE_TTL_HOURS", 3),
            menu_ttl_hours: env_parse("MENU_TTL_HOURS", 24),
            courier_idle_hours: env_parse("COURIER_IDLE_HOURS", 24),
            image_ttl_hours: env_parse("IMAGE_TTL_HOURS", 3),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 图片上传目录: {work_dir}/uploads/images
    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads/images")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.images_dir())
    }

    pub fn order_retention(&self) -> Duration {
        Duration::hours(self.order_retention_hours)
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::hours(self.message_ttl_hours)
    }

    pub fn menu_ttl(&self) -> Duration {
        Duration::hours(self.menu_ttl_hours)
    }

    pub fn courier_idle_ttl(&self) -> Duration {
        Duration::hours(self.courier_idle_hours)
    }

    pub fn image_ttl(&self) -> Duration {
        Duration::hours(self.image_ttl_hours)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
