//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Home page (recommended products deferred)
//! GET  /health                     - Liveness
//! GET  /health/ready               - Readiness (Storefront API probe)
//!
//! # Collections
//! GET  /collections                - Collection listing (paginated)
//! GET  /collections/               - Same
//! GET  /collections/{handle}       - Collection detail (paginated products)
//!
//! # Products
//! GET  /products/{handle}          - Product detail (variants deferred)
//! POST /products/{handle}/options  - Option selection, 303 to the variant URL
//! ```

pub mod collections;
pub mod health;
pub mod home;
pub mod products;

use askama::Template;
use axum::{
    Router,
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{handle}", get(products::show))
        .route("/{handle}/options", post(products::select_option))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/collections", get(collections::index))
        .route("/collections/", get(collections::index))
        .route("/collections/{handle}", get(collections::show))
        .nest("/products", product_routes())
}

/// Render a template to a string for streaming.
pub(crate) fn render<T: Template>(template: &T) -> Result<String> {
    template
        .render()
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
}

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(LOCATION, value)]).into_response(),
        Err(e) => AppError::Internal(format!("Invalid redirect target {location}: {e}"))
            .into_response(),
    }
}
