use utoipa::OpenApi;

use crate::routes::error::ErrorEnvelope;
use crate::routes::reviews::{MessageBody, StatusBody};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use rv_core::types::{
    AuctionId, CreateReviewInput, CreatedReview, ItemId, ListParams, PublicId, Review, ReviewId,
    ReviewPage, ReviewTotal, ScoreSummary, UserMetadata,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Reviews API", description = "Buyer reviews of marketplace sellers"),
    paths(
        crate::routes::reviews::status,
        crate::routes::reviews::list_mine,
        crate::routes::reviews::create_review,
        crate::routes::reviews::get_review,
        crate::routes::reviews::delete_review,
        crate::routes::reviews::list_for_item,
        crate::routes::reviews::list_for_auction,
        crate::routes::reviews::list_of_user,
        crate::routes::reviews::list_by_user,
        crate::routes::reviews::user_metadata
    ),
    components(schemas(
        Review,
        CreateReviewInput,
        CreatedReview,
        ReviewPage,
        ReviewTotal,
        ScoreSummary,
        UserMetadata,
        ListParams,
        StatusBody,
        MessageBody,
        ErrorEnvelope,
        ReviewId,
        PublicId,
        AuctionId,
        ItemId
    ))
)]
struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_pretty_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn router() -> Router {
    Router::new()
        .route("/reviews/openapi.json", get(openapi_json))
        .route("/reviews/docs", get(swagger_ui))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

async fn swagger_ui() -> impl IntoResponse {
    let html = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Reviews API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
  </head>
  <body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
      window.ui = SwaggerUIBundle({ url: '/reviews/openapi.json', dom_id: '#swagger-ui' });
    </script>
  </body>
</html>
"#;
    (axum::http::StatusCode::OK, axum::response::Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec: serde_json::Value = serde_json::from_str(&generate_spec()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        for path in [
            "/reviews",
            "/reviews/status",
            "/reviews/{id}",
            "/reviews/item/{id}",
            "/reviews/auction/{id}",
            "/reviews/of/user/{id}",
            "/reviews/by/user/{id}",
            "/reviews/user/{id}",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(paths["/reviews/{id}"].get("delete").is_some());
    }
}
