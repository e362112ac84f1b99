//! Route definitions for the EekoAI platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/weather", weather_routes())
        .route("/chat", post(handlers::chat))
        .nest("/detect", detection_routes())
}

/// Weather explorer routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/insights",
            get(handlers::get_location_insights).post(handlers::analyze_bundle),
        )
        .route("/export", get(handlers::export_weather_csv))
}

/// Image analysis routes
fn detection_routes() -> Router<AppState> {
    Router::new()
        .route("/weed", post(handlers::detect_weed))
        .route("/insect", post(handlers::detect_insect))
}
