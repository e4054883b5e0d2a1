//! Caller identity
//!
//! Authentication happens upstream; the identity provider forwards the
//! authenticated user id in `x-user-id`.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use formcraft_core::{FormsError, OwnerId};

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated owner of the request
#[derive(Debug, Clone)]
pub struct Identity(pub OwnerId);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .map(|v| v.to_str().map_err(|_| FormsError::Unauthenticated))
            .transpose()?;
        Ok(Identity(OwnerId::from_identity(raw)?))
    }
}
