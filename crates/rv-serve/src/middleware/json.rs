use crate::correlation_id_from_request;
use crate::routes::error::ErrorEnvelope;
use axum::Json;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

const EXEMPT_PATHS: [&str; 3] = ["/reviews/status", "/reviews/openapi.json", "/reviews/docs"];

pub const NOT_JSON_MESSAGE: &str = "request must be json";

pub async fn require_json(request: Request<Body>, next: Next) -> Response {
    if EXEMPT_PATHS.contains(&request.uri().path()) || is_json(request.headers()) {
        return next.run(request).await;
    }
    let correlation_id = correlation_id_from_request(&request);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorEnvelope {
            code: "invalid_content_type",
            message: NOT_JSON_MESSAGE.to_string(),
            correlation_id,
        }),
    )
        .into_response()
}

/// `application/json`, optionally with a UTF-8 charset parameter.
pub fn is_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let mut parts = value.split(';').map(str::trim);
    let mime = parts.next().unwrap_or_default();
    if !mime.eq_ignore_ascii_case("application/json") {
        return false;
    }
    parts.all(|param| {
        param.is_empty()
            || param
                .split_once('=')
                .is_some_and(|(key, value)| {
                    key.trim().eq_ignore_ascii_case("charset")
                        && value.trim().trim_matches('"').eq_ignore_ascii_case("utf-8")
                })
    })
}
