use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::PlannerConfig;
use crate::dashboard::Dashboard;

/// The full application: API under `/api`, optional static front-end elsewhere
pub fn app(dashboard: Dashboard, config: &PlannerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().nest("/api", api::router(dashboard));
    if let Some(static_dir) = &config.server.static_dir {
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    app.layer(cors).layer(TraceLayer::new_for_http())
}

pub async fn run(dashboard: Dashboard, config: &PlannerConfig) -> Result<()> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app(dashboard, config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
