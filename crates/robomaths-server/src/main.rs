//! Robot Maths HTTP API server
//!
//! Serves the public runtime configuration consumed by the static site and
//! proxies authenticated GitHub content writes through the server-held
//! token.

use axum::{
    Router,
    response::Json,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod error;
mod github;
mod routes;

use config::ServerConfig;
use error::Result;

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "robomaths_server=debug,tower_http=debug".to_string()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    info!("Starting Robot Maths API on {}:{}", config.host, config.port);

    let state = AppState { config: config.clone() };
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/env", get(routes::env::public_env))
        .route("/github", post(routes::github::handle))
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "robomaths-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": time::OffsetDateTime::now_utc()
    })))
}
