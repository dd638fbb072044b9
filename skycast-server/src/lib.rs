//! HTTP proxy between the skycast front end and OpenWeather.
//!
//! Exposes `/weather`, `/forecast` and `/rain_alert`, each taking a `city` and
//! a `units` selector, plus `/ping` for liveness checks.

use axum::{Router, routing::get};
use skycast_core::QueryService;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod extract;
pub mod handlers;

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: QueryService,
}

impl AppState {
    pub fn new(service: QueryService) -> Self {
        Self { service }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/weather", get(handlers::current_weather))
        .route("/forecast", get(handlers::forecast))
        .route("/rain_alert", get(handlers::rain_alert))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
