//! Health check handlers.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Fetches the shop name (never cached) to confirm the Storefront API is
/// reachable with our token. Returns 503 Service Unavailable otherwise.
#[instrument(skip(state))]
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.storefront().shop_name().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
