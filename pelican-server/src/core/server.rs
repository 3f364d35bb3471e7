//! Server Implementation
//!
//! HTTP/WebSocket 服务器启动和管理

use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for sharing with tests/tools)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config),
        };

        // Start background tasks (inbound frame handler + cleanup scheduler)
        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);
        tracing::info!("{} background tasks running", tasks.len());

        let app = crate::api::router(state.clone());
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("🐦 Pelican hub listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        // Drain the bus and the background tasks
        state.bus.shutdown();
        tasks.shutdown().await;

        Ok(())
    }
}
