use crate::auth::authenticate;
use crate::middleware::correlation::CorrelationId;
use crate::routes::error::{ErrorEnvelope, error_response};
use crate::upstream::{EntityKind, LOOKUP_TIMEOUT, Lookup, ensure_all_exist, verify_all};
use crate::{AppState, build_service};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use rv_core::error::{ReviewError, ServiceError};
use rv_core::types::{
    AuctionId, CreateReviewInput, CreatedReview, Filter, ItemId, ListParams, PublicId, Review,
    ReviewId, ReviewPage, ReviewTotal, UserMetadata,
};
use rv_core::validation::validate_create_input;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const STATUS_MESSAGE: &str = "System running...";
const DELETED_MESSAGE: &str = "review deleted";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusBody {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/reviews/status", get(status))
        .route("/reviews", get(list_mine).post(create_review))
        .route("/reviews/{id}", get(get_review).delete(delete_review))
        .route("/reviews/item/{id}", get(list_for_item))
        .route("/reviews/auction/{id}", get(list_for_auction))
        .route("/reviews/of/user/{id}", get(list_of_user))
        .route("/reviews/by/user/{id}", get(list_by_user))
        .route("/reviews/user/{id}", get(user_metadata))
        .with_state(state)
}

fn path_and_query(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|value| value.as_str())
        .unwrap_or_else(|| uri.path())
}

fn listing(
    state: &AppState,
    filter: &Filter,
    params: &ListParams,
    uri: &Uri,
    correlation_id: String,
) -> Response {
    let service = match build_service(state) {
        Ok(service) => service,
        Err(err) => return error_response(&err, Some(correlation_id)),
    };
    match service.list(filter, params, path_and_query(uri)) {
        Ok(page) => Json(page).into_response(),
        Err(err) => error_response(&err, Some(correlation_id)),
    }
}

fn listing_or_total(
    state: &AppState,
    filter: &Filter,
    params: &ListParams,
    uri: &Uri,
    correlation_id: String,
) -> Response {
    if !params.total_only() {
        return listing(state, filter, params, uri, correlation_id);
    }
    let service = match build_service(state) {
        Ok(service) => service,
        Err(err) => return error_response(&err, Some(correlation_id)),
    };
    match service.total(filter) {
        Ok(total_reviews) => Json(ReviewTotal { total_reviews }).into_response(),
        Err(err) => error_response(&err, Some(correlation_id)),
    }
}

fn invalid_input(message: String) -> ServiceError {
    ServiceError::from(ReviewError::InvalidInput { message })
}

/// Repeated or undecodable query keys surface as our own 400 envelope.
fn list_params(params: Result<Query<ListParams>, QueryRejection>) -> Result<ListParams, ServiceError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| invalid_input(rejection.body_text()))
}

fn parse_id<T, E>(raw: &str, parse: impl FnOnce(&str) -> Result<T, E>) -> Result<T, ServiceError>
where
    ServiceError: From<E>,
{
    parse(raw).map_err(ServiceError::from)
}

#[utoipa::path(
    get,
    path = "/reviews/status",
    responses((status = 200, body = StatusBody))
)]
pub(crate) async fn status(State(state): State<AppState>) -> Response {
    Json(StatusBody {
        message: STATUS_MESSAGE.to_string(),
        version: state.version.clone(),
    })
    .into_response()
}

#[utoipa::path(
    get,
    path = "/reviews",
    params(ListParams),
    responses(
        (status = 200, body = ReviewPage),
        (status = 401, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn list_mine(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let caller = match authenticate(&state, &headers).await {
        Ok(caller) => caller,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    let params = match list_params(params) {
        Ok(params) => params,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    let filter = Filter::reviewed_by(&caller.public_id);
    listing(&state, &filter, &params, &uri, correlation.0)
}

#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CreateReviewInput,
    responses(
        (status = 201, body = CreatedReview),
        (status = 400, body = ErrorEnvelope),
        (status = 401, body = ErrorEnvelope),
        (status = 409, body = ErrorEnvelope),
        (status = 503, body = ErrorEnvelope)
    )
)]
pub(crate) async fn create_review(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    headers: HeaderMap,
    payload: Result<Json<CreateReviewInput>, JsonRejection>,
) -> Response {
    let caller = match authenticate(&state, &headers).await {
        Ok(caller) => caller,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            return error_response(&invalid_input(rejection.body_text()), Some(correlation.0));
        }
    };
    if let Err(err) = validate_create_input(&input, &caller.public_id) {
        return error_response(&ServiceError::from(err), Some(correlation.0));
    }

    let lookups = [
        Lookup::new(EntityKind::Auction, input.auction_id.to_key()),
        Lookup::new(EntityKind::Item, input.item_id.to_key()),
    ];
    let outcomes = verify_all(&*state.upstream, &caller.token, &lookups, LOOKUP_TIMEOUT).await;
    if let Err(err) = ensure_all_exist(outcomes) {
        return error_response(&err, Some(correlation.0));
    }

    let service = match build_service(&state) {
        Ok(service) => service,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    match service.create(&caller.public_id, input) {
        Ok(review) => (
            StatusCode::CREATED,
            Json(CreatedReview {
                review_id: review.review_id,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err, Some(correlation.0)),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 200, body = Review),
        (status = 400, body = ErrorEnvelope),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn get_review(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Response {
    let review_id = match parse_id(&id, ReviewId::parse) {
        Ok(value) => value,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    let service = match build_service(&state) {
        Ok(service) => service,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    match service.get(&review_id) {
        Ok(review) => Json(review).into_response(),
        Err(err) => error_response(&err, Some(correlation.0)),
    }
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = String, Path, description = "Review ID")),
    responses(
        (status = 410, body = MessageBody),
        (status = 400, body = ErrorEnvelope),
        (status = 401, body = ErrorEnvelope)
    )
)]
pub(crate) async fn delete_review(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let caller = match authenticate(&state, &headers).await {
        Ok(caller) => caller,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    let review_id = match parse_id(&id, ReviewId::parse) {
        Ok(value) => value,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    let service = match build_service(&state) {
        Ok(service) => service,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    match service.delete(&review_id, &caller.public_id) {
        Ok(()) => (
            StatusCode::GONE,
            Json(MessageBody {
                message: DELETED_MESSAGE.to_string(),
            }),
        )
            .into_response(),
        Err(err) => error_response(&err, Some(correlation.0)),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/item/{id}",
    params(("id" = String, Path, description = "Item ID"), ListParams),
    responses((status = 200, body = ReviewPage), (status = 404, body = ErrorEnvelope))
)]
pub(crate) async fn list_for_item(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let params = match list_params(params) {
        Ok(params) => params,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    match parse_id(&id, ItemId::parse) {
        Ok(item) => listing(&state, &Filter::item(&item), &params, &uri, correlation.0),
        Err(err) => error_response(&err, Some(correlation.0)),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/auction/{id}",
    params(("id" = String, Path, description = "Auction ID"), ListParams),
    responses((status = 200, body = ReviewPage), (status = 404, body = ErrorEnvelope))
)]
pub(crate) async fn list_for_auction(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let params = match list_params(params) {
        Ok(params) => params,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    match parse_id(&id, AuctionId::parse) {
        Ok(auction) => listing(&state, &Filter::auction(&auction), &params, &uri, correlation.0),
        Err(err) => error_response(&err, Some(correlation.0)),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/of/user/{id}",
    params(("id" = String, Path, description = "Seller public ID"), ListParams),
    responses(
        (status = 200, body = ReviewPage),
        (status = 200, description = "With totalonly=true", body = ReviewTotal),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn list_of_user(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let params = match list_params(params) {
        Ok(params) => params,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    match parse_id(&id, PublicId::parse) {
        Ok(seller) => listing_or_total(&state, &Filter::seller(&seller), &params, &uri, correlation.0),
        Err(err) => error_response(&err, Some(correlation.0)),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/by/user/{id}",
    params(("id" = String, Path, description = "Reviewer public ID"), ListParams),
    responses(
        (status = 200, body = ReviewPage),
        (status = 200, description = "With totalonly=true", body = ReviewTotal),
        (status = 404, body = ErrorEnvelope)
    )
)]
pub(crate) async fn list_by_user(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Response {
    let params = match list_params(params) {
        Ok(params) => params,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    match parse_id(&id, PublicId::parse) {
        Ok(reviewer) => listing_or_total(
            &state,
            &Filter::reviewed_by(&reviewer),
            &params,
            &uri,
            correlation.0,
        ),
        Err(err) => error_response(&err, Some(correlation.0)),
    }
}

#[utoipa::path(
    get,
    path = "/reviews/user/{id}",
    params(("id" = String, Path, description = "User public ID")),
    responses((status = 200, body = UserMetadata), (status = 400, body = ErrorEnvelope))
)]
pub(crate) async fn user_metadata(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Response {
    let user = match parse_id(&id, PublicId::parse) {
        Ok(value) => value,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    let service = match build_service(&state) {
        Ok(service) => service,
        Err(err) => return error_response(&err, Some(correlation.0)),
    };
    match service.metadata(&user) {
        Ok(metadata) => Json(metadata).into_response(),
        Err(err) => error_response(&err, Some(correlation.0)),
    }
}
