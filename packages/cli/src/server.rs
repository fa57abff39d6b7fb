// ABOUTME: HTTP server assembly: API routes, optional static client, tracing and CORS layers
// ABOUTME: Binds the configured address and serves until Ctrl-C

use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use figstory_api::{create_router, AppState};

use crate::config::Config;
use crate::middleware::{create_cors_layer, create_panic_handler};

/// Router with every layer applied, ready to serve
pub fn build_app(config: &Config) -> anyhow::Result<Router> {
    let mut app = create_router(AppState::new(config.service.clone()));

    if let Some(dir) = &config.static_dir {
        info!("Serving static client from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    let cors = create_cors_layer(&config.cors_origin)
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;

    Ok(app
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(create_panic_handler()))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let app = build_app(&config)?;
    let addr = SocketAddr::new(config.host, config.port);

    if config.service.figma.access_token.is_none() {
        tracing::warn!("FIGMA_ACCESS_TOKEN is not set; imports will fail until it is configured");
    }
    info!(
        "Story generation backend: {} at {}",
        config.service.generation.provider,
        config.service.generation.endpoint()
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
