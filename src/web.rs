use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::{Router, response::Html, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::VayuConfig;
use crate::api;
use crate::map::TileRegistry;

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

pub async fn run(config: VayuConfig) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let registry = Arc::new(TileRegistry::new(config.custom_tiles));

    let app = Router::new()
        .route("/", get(index))
        .nest("/api", api::router(registry))
        // Upstream fetches retry with backoff, so a request can legitimately
        // take well beyond the single-call ceiling.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(60),
        ))
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", config.port);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
