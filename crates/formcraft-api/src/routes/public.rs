//! Public fill-and-submit endpoints (no identity)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use formcraft_core::application::dto::{PublicFormView, SubmitResponseCommand};
use formcraft_core::FormId;

use crate::error::ApiResult;
use crate::models::{ApiResponse, SubmitReceipt, SubmitRequest};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_public_form))
        .route("/:id/responses", post(submit_response))
}

pub async fn get_public_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<PublicFormView>>> {
    let form = state.forms.get_public_form(&FormId::parse(&id)?).await?;
    Ok(Json(ApiResponse::success(form)))
}

pub async fn submit_response(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SubmitReceipt>>)> {
    let stored = state
        .submissions
        .submit(SubmitResponseCommand {
            form_id: id,
            responses: req.responses,
            submitter_email: req.submitter_email,
            submitter_name: req.submitter_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SubmitReceipt {
            response_id: stored.id.to_string(),
            submitted_at: stored.submitted_at.to_rfc3339(),
        })),
    ))
}
