//! Comment API endpoints
//!
//! Comments are created under their publication (see `publications`); this
//! router addresses existing comments by id.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::publications::LikeCountResponse;
use crate::models::{Comment, LikeTarget, UpdateCommentInput};

/// Build the comments router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_comment).put(update_comment).delete(delete_comment))
        .route("/{id}/likes", get(count_likes))
}

async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Comment>, ApiError> {
    Ok(Json(state.comment_service.get(id).await?))
}

async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateCommentInput>,
) -> Result<Json<Comment>, ApiError> {
    Ok(Json(state.comment_service.update(id, input).await?))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.comment_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn count_likes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LikeCountResponse>, ApiError> {
    state.comment_service.get(id).await?;
    let target = LikeTarget::Comment(id);
    let like_count = state.like_service.count(target).await?;
    Ok(Json(LikeCountResponse { target, like_count }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{create_publication, create_user, test_server};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_edit_and_delete_comment() {
        let (server, _pool) = test_server().await;
        let author = create_user(&server, "writer").await;
        let post = create_publication(&server, author, "post").await;
        let comment: Value = server
            .post(&format!("/api/v1/publications/{}/comments", post))
            .json(&json!({ "author_id": author, "comment": "typo" }))
            .await
            .json();
        let path = format!("/api/v1/comments/{}", comment["id"]);

        let edited: Value = server
            .put(&path)
            .json(&json!({ "comment": "fixed" }))
            .await
            .json();
        assert_eq!(edited["comment"], "fixed");

        server
            .put(&path)
            .json(&json!({ "comment": "   " }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }
}
