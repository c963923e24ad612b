//! Publication API endpoints
//!
//! Handles HTTP requests for publications and everything scoped to one:
//! - GET/POST /api/v1/publications
//! - GET/PUT/DELETE /api/v1/publications/{id}
//! - GET/POST /api/v1/publications/{id}/comments
//! - GET /api/v1/publications/{id}/comments/popular - Comments ranked by likes
//! - GET /api/v1/publications/{id}/pictures
//! - GET /api/v1/publications/{id}/likes - Like count
//! - GET /api/v1/publications/{id}/tags
//! - PUT/DELETE /api/v1/publications/{id}/tags/{tag_id}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{
    Comment, CommentWithLikes, CreateCommentInput, LikeTarget, Picture, Publication,
    PublicationInput, Tag,
};

/// Response for publication list
#[derive(Debug, Serialize)]
pub struct PublicationListResponse {
    pub publications: Vec<Publication>,
}

/// Request body for commenting on a publication
#[derive(Debug, Deserialize)]
pub struct NewCommentRequest {
    pub author_id: i64,
    pub comment: String,
}

/// Like count of a single target
#[derive(Debug, Serialize)]
pub struct LikeCountResponse {
    pub target: LikeTarget,
    pub like_count: i64,
}

/// Build the publications router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_publications).post(create_publication))
        .route(
            "/{id}",
            get(get_publication)
                .put(update_publication)
                .delete(delete_publication),
        )
        .route("/{id}/comments", get(list_comments).post(create_comment))
        .route("/{id}/comments/popular", get(popular_comments))
        .route("/{id}/pictures", get(list_pictures))
        .route("/{id}/likes", get(count_likes))
        .route("/{id}/tags", get(list_tags))
        .route("/{id}/tags/{tag_id}", put(attach_tag).delete(detach_tag))
}

async fn list_publications(
    State(state): State<AppState>,
) -> Result<Json<PublicationListResponse>, ApiError> {
    let publications = state.publication_service.list().await?;
    Ok(Json(PublicationListResponse { publications }))
}

async fn create_publication(
    State(state): State<AppState>,
    Json(input): Json<PublicationInput>,
) -> Result<(StatusCode, Json<Publication>), ApiError> {
    let publication = state.publication_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(publication)))
}

async fn get_publication(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Publication>, ApiError> {
    Ok(Json(state.publication_service.get(id).await?))
}

async fn update_publication(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PublicationInput>,
) -> Result<Json<Publication>, ApiError> {
    Ok(Json(state.publication_service.update(id, input).await?))
}

async fn delete_publication(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.publication_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    state.publication_service.get(id).await?;
    Ok(Json(state.comment_service.list_by_publication(id).await?))
}

async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NewCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state
        .comment_service
        .create(CreateCommentInput {
            author_id: req.author_id,
            publication_id: id,
            comment: req.comment,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/publications/{id}/comments/popular
///
/// An unknown publication has no comments, so this answers with an empty list.
async fn popular_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<CommentWithLikes>>, ApiError> {
    Ok(Json(state.ranking_service.rank_comments_by_likes(id).await?))
}

async fn list_pictures(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Picture>>, ApiError> {
    state.publication_service.get(id).await?;
    Ok(Json(state.picture_service.list_by_publication(id).await?))
}

async fn count_likes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LikeCountResponse>, ApiError> {
    state.publication_service.get(id).await?;
    let target = LikeTarget::Publication(id);
    let like_count = state.like_service.count(target).await?;
    Ok(Json(LikeCountResponse { target, like_count }))
}

async fn list_tags(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    state.publication_service.get(id).await?;
    Ok(Json(state.tag_service.tags_of(id).await?))
}

/// PUT /api/v1/publications/{id}/tags/{tag_id} - Idempotent
async fn attach_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.tag_service.attach(tag_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn detach_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.tag_service.detach(tag_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
