use std::sync::Arc;

mod core;
mod error_handler;
mod routes;

pub use crate::core::{api_config::ApiConfig, app_state::AppState};
pub use error_handler::{AppError, AppResult};

use axum::{Router, routing::post};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::routes::user_msg::user_msg_route::user_msg;

/// Builds the router with permissive CORS.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/user_msg_Api", post(user_msg))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(Arc::new(state))
}

/// Binds the listener and serves until Ctrl+C.
pub async fn start(state: AppState, cfg: &ApiConfig) -> Result<(), AppError> {
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(cfg.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %cfg.address, "API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("API stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
