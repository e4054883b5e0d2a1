//! Builder session endpoints

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use formcraft_core::application::dto::SessionView;
use formcraft_core::schema::{palette as field_palette, PaletteEntry};
use formcraft_core::{BuilderOp, FormId};

use crate::error::ApiResult;
use crate::middleware::Identity;
use crate::models::ApiResponse;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:id/session",
            post(open_session).get(get_session).delete(close_session),
        )
        .route("/:id/session/ops", post(apply_op))
        .route("/:id/session/undo", post(undo))
        .route("/:id/session/save", post(save_session))
}

pub async fn open_session(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SessionView>>> {
    let view = state.builder.open_session(&owner, &FormId::parse(&id)?).await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SessionView>>> {
    let view = state.builder.get_session(&owner, &FormId::parse(&id)?).await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn apply_op(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
    Json(op): Json<BuilderOp>,
) -> ApiResult<Json<ApiResponse<SessionView>>> {
    let view = state
        .builder
        .apply_op(&owner, &FormId::parse(&id)?, op)
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn undo(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SessionView>>> {
    let view = state.builder.undo(&owner, &FormId::parse(&id)?).await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn save_session(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SessionView>>> {
    let view = state.builder.save_session(&owner, &FormId::parse(&id)?).await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn close_session(
    State(state): State<AppState>,
    Identity(owner): Identity,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.builder.close_session(&owner, &FormId::parse(&id)?).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Field templates for the builder sidebar
pub async fn palette(Identity(_owner): Identity) -> Json<ApiResponse<Vec<PaletteEntry>>> {
    Json(ApiResponse::success(field_palette()))
}
