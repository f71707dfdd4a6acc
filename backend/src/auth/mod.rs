//! Caller identity
//!
//! Identity is established upstream (reverse proxy or session layer), which
//! forwards the authenticated user's id in the `X-User-Id` header. Every
//! `/api/v1` handler takes a `CurrentUser` and scopes its queries by it.

use crate::error::ApiError;
use axum::http::request::Parts;
use uuid::Uuid;

/// Header carrying the authenticated user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user extracted from the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

impl CurrentUser {
    fn from_parts(parts: &Parts) -> Result<Self, ApiError> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing X-User-Id header".to_string()))?;

        let user_id = Uuid::parse_str(raw.trim())
            .map_err(|_| ApiError::Unauthorized("Invalid user id".to_string()))?;

        Ok(CurrentUser { user_id })
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        CurrentUser::from_parts(parts)
    }
}
