//! Owner form endpoints

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use formcraft_core::application::dto::{
    DashboardStats, FormSummary, FormView, GenerateFormCommand, ResponseView,
};
use formcraft_core::FormId;

use crate::error::ApiResult;
use crate::middleware::Identity;
use crate::models::{ApiResponse, SaveFormRequest};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_forms))
        .route("/generate", post(generate_form))
        .route("/:id", get(get_form).put(save_form))
        .route("/:id/publish", post(publish_form))
        .route("/:id/unpublish", post(unpublish_form))
        .route("/:id/responses", get(list_responses))
}

pub async fn generate_form(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Json(command): Json<GenerateFormCommand>,
) -> ApiResult<Json<ApiResponse<FormView>>> {
    let form = state.forms.create_from_prompt(&owner, command).await?;
    Ok(Json(ApiResponse::success(form)))
}

pub async fn list_forms(
    State(state): State<AppState>,
    Identity(owner): Identity,
) -> ApiResult<Json<ApiResponse<Vec<FormSummary>>>> {
    let forms = state.forms.list_forms(&owner).await?;
    Ok(Json(ApiResponse::success(forms)))
}

pub async fn get_form(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<FormView>>> {
    let form = state.forms.get_form(&owner, &FormId::parse(&id)?).await?;
    Ok(Json(ApiResponse::success(form)))
}

pub async fn save_form(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
    Json(req): Json<SaveFormRequest>,
) -> ApiResult<Json<ApiResponse<FormView>>> {
    let form = state
        .forms
        .save_definition(&owner, &FormId::parse(&id)?, &req.form)
        .await?;
    Ok(Json(ApiResponse::success(form)))
}

pub async fn publish_form(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<FormView>>> {
    let form = state.forms.publish(&owner, &FormId::parse(&id)?).await?;
    Ok(Json(ApiResponse::success(form)))
}

pub async fn unpublish_form(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<FormView>>> {
    let form = state.forms.unpublish(&owner, &FormId::parse(&id)?).await?;
    Ok(Json(ApiResponse::success(form)))
}

pub async fn list_responses(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<ResponseView>>>> {
    let responses = state
        .forms
        .list_responses(&owner, &FormId::parse(&id)?)
        .await?;
    Ok(Json(ApiResponse::success(responses)))
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
    Identity(owner): Identity,
) -> ApiResult<Json<ApiResponse<DashboardStats>>> {
    let stats = state.forms.dashboard_stats(&owner).await?;
    Ok(Json(ApiResponse::success(stats)))
}
