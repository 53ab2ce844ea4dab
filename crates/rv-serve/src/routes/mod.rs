pub mod error;
pub mod reviews;

use crate::middleware::correlation::correlation_middleware;
use crate::middleware::json::require_json;
use crate::{AppState, openapi};
use axum::Router;
use axum::middleware;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(reviews::router(state))
        .merge(openapi::router())
        .route_layer(middleware::from_fn(require_json))
        .route_layer(middleware::from_fn(correlation_middleware))
        .layer(TraceLayer::new_for_http())
}
