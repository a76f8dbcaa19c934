//! HTTP server setup and initialization
//!
//! Routes:
//!   GET    /api/health
//!   GET    /api/components?page&limit&type
//!   POST   /api/components
//!   GET    /api/components/:id
//!   PUT    /api/components/:id
//!   DELETE /api/components/:id
//!   GET    /api/components/:id/preview
//!
//! Everything else falls through to the static front-end bundle when one is
//! configured, or to a JSON 404 otherwise.

pub mod api;
mod state;

pub use state::AppState;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::render;
use crate::store::ComponentStore;

/// Request bodies carry HTML plus an optional base64 screenshot
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Build the router for the given state
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let app = Router::new()
        .route("/api/health", get(api::health))
        .route(
            "/api/components",
            get(api::list_components).post(api::create_component),
        )
        .route(
            "/api/components/:id",
            get(api::get_component)
                .put(api::update_component)
                .delete(api::delete_component),
        )
        .route("/api/components/:id/preview", get(api::get_preview))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state);

    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app.fallback(api::not_found),
    }
}

/// Start the HTTP server
pub async fn start_server(
    config: Config,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
    let bind_addr = config.bind_addr;

    let renderer = render::create_renderer(&config.screenshot);
    if renderer.is_ready() {
        tracing::info!(
            "Screenshot rendering enabled ({}, timeout {}s)",
            config.screenshot.browser,
            config.screenshot.timeout_secs
        );
    } else {
        tracing::debug!("Screenshot rendering: disabled");
    }

    let store = ComponentStore::new(config.contents_dir.clone());
    let state = AppState::new(store, renderer, config.page_size);

    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving static assets from {}", dir.display());
    }
    let app = router(state, config.static_dir.as_deref());

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Gallery listening on {}", bind_addr);

    // Stop accepting connections once shutdown fires, finish in-flight requests
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}
