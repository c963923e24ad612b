//! Picture API endpoints
//!
//! Pictures are stored as `photo/...` references only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Picture, PictureInput};

/// Build the pictures router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_picture))
        .route("/{id}", get(get_picture).delete(delete_picture))
}

async fn create_picture(
    State(state): State<AppState>,
    Json(input): Json<PictureInput>,
) -> Result<(StatusCode, Json<Picture>), ApiError> {
    let picture = state.picture_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(picture)))
}

async fn get_picture(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Picture>, ApiError> {
    Ok(Json(state.picture_service.get(id).await?))
}

async fn delete_picture(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.picture_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
