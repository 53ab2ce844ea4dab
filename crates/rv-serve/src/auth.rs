use crate::AppState;
use crate::upstream::ACCESS_TOKEN_HEADER;
use axum::http::HeaderMap;
use rv_core::error::{AuthError, ServiceError};
use rv_core::types::PublicId;

/// An authenticated caller and the token it presented, which is forwarded on
/// upstream lookups.
#[derive(Debug, Clone)]
pub struct Caller {
    pub public_id: PublicId,
    pub token: String,
}

pub fn access_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingToken)
}

pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Caller, ServiceError> {
    let token = access_token(headers)?;
    let public_id = state.upstream.resolve_identity(token).await?;
    Ok(Caller {
        public_id,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_must_be_present_and_non_blank() {
        let mut headers = HeaderMap::new();
        assert!(matches!(access_token(&headers), Err(AuthError::MissingToken)));
        headers.insert(ACCESS_TOKEN_HEADER, HeaderValue::from_static("  "));
        assert!(access_token(&headers).is_err());
        headers.insert(ACCESS_TOKEN_HEADER, HeaderValue::from_static("abc.def"));
        assert_eq!(access_token(&headers).unwrap(), "abc.def");
    }
}
