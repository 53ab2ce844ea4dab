use crate::types::ids::IdError;
use crate::types::query::FilterColumn;
use thiserror::Error;

/// Client mistakes in a listing request.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("not a valid filter column: {value}")]
    InvalidFilterColumn { value: String },
    #[error("not a valid {column} value")]
    InvalidFilterValue { column: FilterColumn, value: String },
    #[error("not a valid orderby value")]
    InvalidOrderBy { value: String },
    #[error("not a valid sort value")]
    InvalidSort { value: String },
    #[error("not a valid page value")]
    InvalidPage { value: String },
    #[error("not a valid pagesize value")]
    InvalidPageSize { value: String },
    #[error("page value is incorrect")]
    PageOutOfRange { page: i64, total_pages: u64 },
}

/// Server-side misconfiguration discovered while serving a request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configured default page size is not a number: {value}")]
    InvalidDefaultPageSize { value: String },
    #[error("cannot build page url: {message}")]
    InvalidPageUrl { message: String },
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("review not found")]
    NotFound,
    #[error("no reviews found")]
    NoReviews,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("reviewed_by does not match the access token")]
    ReviewerMismatch,
    #[error("{kind} does not exist")]
    ReferenceInvalid { kind: &'static str },
    #[error("item already reviewed by this user")]
    Duplicate,
    #[error("review not deleted")]
    NotDeleted,
    #[error("storage error: {message}")]
    Storage { message: String },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing access token")]
    MissingToken,
    #[error("access token rejected")]
    Rejected,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} service unavailable: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },
    #[error("{service} service timed out")]
    Timeout { service: &'static str },
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    InvalidId(#[from] IdError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ServiceError {
    /// Whether the failure is the server's fault and must not be echoed to
    /// the caller verbatim.
    pub fn is_server_side(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Review(ReviewError::Storage { .. }) | Self::Internal { .. }
        )
    }
}
