use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rv_core::error::{QueryError, ReviewError, ServiceError};
use serde::Serialize;
use utoipa::ToSchema;

const GENERIC_MESSAGE: &str = "something went wrong";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    #[schema(value_type = String)]
    pub code: &'static str,
    pub message: String,
    pub correlation_id: Option<String>,
}

pub fn map_error(
    err: &ServiceError,
    correlation_id: Option<String>,
) -> (StatusCode, Json<ErrorEnvelope>) {
    let (status, code, message) = match err {
        ServiceError::Query(query) => map_query_error(query),
        ServiceError::InvalidId(_) => (StatusCode::BAD_REQUEST, "invalid_id", err.to_string()),
        ServiceError::Review(review) => map_review_error(review),
        ServiceError::Auth(_) => (StatusCode::UNAUTHORIZED, "unauthorized", err.to_string()),
        ServiceError::Upstream(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "upstream_unavailable",
            err.to_string(),
        ),
        ServiceError::Config(_) | ServiceError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            GENERIC_MESSAGE.to_string(),
        ),
    };

    if err.is_server_side() {
        tracing::error!(correlation_id = ?correlation_id, error = %err, "request failed");
    }

    (
        status,
        Json(ErrorEnvelope {
            code,
            message,
            correlation_id,
        }),
    )
}

pub fn error_response(err: &ServiceError, correlation_id: Option<String>) -> Response {
    map_error(err, correlation_id).into_response()
}

fn map_query_error(err: &QueryError) -> (StatusCode, &'static str, String) {
    match err {
        QueryError::PageOutOfRange { .. } => {
            (StatusCode::BAD_REQUEST, "page_out_of_range", err.to_string())
        }
        _ => (StatusCode::BAD_REQUEST, "invalid_query", err.to_string()),
    }
}

fn map_review_error(err: &ReviewError) -> (StatusCode, &'static str, String) {
    match err {
        ReviewError::NotFound | ReviewError::NoReviews => {
            (StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        ReviewError::InvalidInput { .. } | ReviewError::ReviewerMismatch => {
            (StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
        }
        ReviewError::ReferenceInvalid { .. } => {
            (StatusCode::BAD_REQUEST, "invalid_reference", err.to_string())
        }
        ReviewError::Duplicate => (StatusCode::CONFLICT, "conflict", err.to_string()),
        ReviewError::NotDeleted => (StatusCode::BAD_REQUEST, "not_deleted", err.to_string()),
        ReviewError::Storage { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            GENERIC_MESSAGE.to_string(),
        ),
    }
}
