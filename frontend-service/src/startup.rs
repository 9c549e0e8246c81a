use crate::config::FrontendConfig;
use crate::handlers::health_check;
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::tracing::{http_request_span, request_id_middleware};
use service_core::shutdown::shutdown_signal;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// `/health` plus everything under `static_dir`. Directory requests resolve
/// to their `index.html`; anything missing is a plain 404.
pub fn build_router(static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http().make_span_with(http_request_span))
        .layer(from_fn(request_id_middleware))
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    static_dir: PathBuf,
}

impl Application {
    /// Bind the listener. Fails if the static directory does not exist, so a
    /// wrong working directory is caught at startup instead of as a 404 storm.
    pub async fn build(config: FrontendConfig) -> Result<Self, AppError> {
        if !config.static_dir.is_dir() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "static directory {} does not exist",
                config.static_dir.display()
            )));
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            static_dir = %config.static_dir.display(),
            "Frontend service listening on port {}",
            port
        );

        Ok(Self {
            port,
            listener,
            static_dir: config.static_dir,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(&self.static_dir);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
