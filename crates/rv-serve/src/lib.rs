pub mod auth;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod upstream;

use axum::Router;
use axum::http::Request;
use middleware::correlation::CorrelationId;
use rv_core::{ReviewService, ServiceConfig, ServiceError};
use rv_db::schema;
use rv_db::store::DbStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use upstream::Upstream;

#[derive(Clone)]
pub struct AppState {
    pub db_path: String,
    pub config: ServiceConfig,
    pub upstream: Arc<dyn Upstream>,
    pub version: String,
}

pub fn build_service(state: &AppState) -> Result<ReviewService<DbStore>, ServiceError> {
    let conn = schema::open_and_migrate(&state.db_path).map_err(|err| ServiceError::Internal {
        message: err.to_string(),
    })?;
    let store = DbStore::new(conn);
    Ok(ReviewService::new(store, state.config.clone()))
}

pub fn correlation_id_from_request<B>(request: &Request<B>) -> Option<String> {
    request
        .extensions()
        .get::<CorrelationId>()
        .map(|value| value.0.clone())
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "reviews service listening");
    axum::serve(listener, app(state)).await
}
