//! Like API endpoints
//!
//! - POST /api/v1/likes - Like a publication or comment
//! - GET /api/v1/likes/{id} - Read a like
//! - DELETE /api/v1/likes/{id} - Unlike
//!
//! A second like of the same target by the same author answers
//! 409 `DUPLICATE_LIKE`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{CreateLikeInput, Like};

/// Build the likes router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_like))
        .route("/{id}", get(get_like).delete(delete_like))
}

async fn create_like(
    State(state): State<AppState>,
    Json(input): Json<CreateLikeInput>,
) -> Result<(StatusCode, Json<Like>), ApiError> {
    let like = state.like_service.like(input.author_id, input.target).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

async fn get_like(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Like>, ApiError> {
    Ok(Json(state.like_service.get(id).await?))
}

async fn delete_like(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.like_service.unlike(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
