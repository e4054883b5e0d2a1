//! HTTP mapping for core errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use formcraft_core::FormsError;
use tracing::{error, warn};

use crate::models::ApiResponse;

/// Handler error wrapping [`FormsError`]
#[derive(Debug)]
pub struct ApiError(pub FormsError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<FormsError> for ApiError {
    fn from(err: FormsError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            FormsError::SchemaShape(_)
            | FormsError::SchemaField { .. }
            | FormsError::InvalidInput(_)
            | FormsError::InvalidStep { .. }
            | FormsError::Validation(_) => StatusCode::BAD_REQUEST,
            FormsError::Unauthenticated => StatusCode::UNAUTHORIZED,
            FormsError::NotFound => StatusCode::NOT_FOUND,
            FormsError::NotPublished => StatusCode::CONFLICT,
            FormsError::Generation(_) => StatusCode::BAD_GATEWAY,
            FormsError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self.0 {
            FormsError::Storage(e) => error!(error = %e, "Storage failure"),
            FormsError::Generation(e) => warn!(error = %e, "Form generation failed"),
            _ => {}
        }

        let mut body = ApiResponse::<()>::error(self.0.code(), &self.0.to_string());
        if let (FormsError::Validation(details), Some(err)) = (&self.0, body.error.as_mut()) {
            err.details = Some(details.clone());
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (FormsError::SchemaShape("x".into()), StatusCode::BAD_REQUEST),
            (FormsError::invalid_input("Prompt is required"), StatusCode::BAD_REQUEST),
            (FormsError::InvalidStep { index: 3, step_count: 2 }, StatusCode::BAD_REQUEST),
            (FormsError::Validation(BTreeMap::new()), StatusCode::BAD_REQUEST),
            (FormsError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (FormsError::NotFound, StatusCode::NOT_FOUND),
            (FormsError::NotPublished, StatusCode::CONFLICT),
            (FormsError::Generation("timeout".into()), StatusCode::BAD_GATEWAY),
            (FormsError::Storage("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }
}
