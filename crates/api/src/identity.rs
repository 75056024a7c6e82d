//! Authenticated identity extraction.
//!
//! Authentication itself is delegated to the fronting OAuth/session proxy,
//! which injects the authenticated user's id as the `x-user-id` header.
//! Handlers take a [`CurrentUser`] argument to require identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use omm_core::error::CoreError;
use omm_core::types::DbId;

use crate::error::AppError;

/// Header the auth proxy sets on every authenticated request.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user behind the current request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: DbId,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<DbId>().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing or invalid x-user-id header".to_string(),
                ))
            })?;
        Ok(CurrentUser { id })
    }
}
