//! Route definitions for the Smart Irrigation Dashboard API

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Crop and feature allow-lists
        .route("/catalog", get(handlers::get_catalog))
        // Weather series, historical or forecast
        .route("/observations/:source/:feature", get(handlers::get_observations))
        .route("/crops/:crop", get(handlers::get_crop_detail))
        .nest("/irrigation", irrigation_routes())
        // Composed dashboard pages
        .route("/dashboard", get(handlers::render_dashboard))
}

/// Irrigation routes
fn irrigation_routes() -> Router<AppState> {
    Router::new()
        .route("/:crop/needs", get(handlers::get_irrigation_needs))
        .route("/:crop/alerts", get(handlers::get_irrigation_alerts))
}
