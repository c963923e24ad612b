//! User API endpoints
//!
//! - GET /api/v1/users - List users
//! - POST /api/v1/users - Create a user
//! - GET/PUT/DELETE /api/v1/users/{id} - Read, replace or delete a user
//! - GET /api/v1/users/{id}/publications - Publications by the user
//! - GET /api/v1/users/{id}/pictures - Pictures by the user
//! - GET /api/v1/users/{id}/subscribers - Who follows the user
//! - GET /api/v1/users/{id}/subscriptions - Whom the user follows

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Picture, Publication, Subscription, User, UserInput};

/// Response for user list
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

/// Response for subscription listings
#[derive(Debug, Serialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<Subscription>,
}

/// Build the users router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/publications", get(list_user_publications))
        .route("/{id}/pictures", get(list_user_pictures))
        .route("/{id}/subscribers", get(list_subscribers))
        .route("/{id}/subscriptions", get(list_subscriptions))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.user_service.list().await?;
    Ok(Json(UserListResponse { users }))
}

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.user_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service.get(id).await?))
}

/// PUT /api/v1/users/{id} - Replace every field except the id
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service.update(id, input).await?))
}

/// DELETE /api/v1/users/{id} - Cascades to everything the user authored
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_user_publications(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Publication>>, ApiError> {
    state.user_service.get(id).await?;
    Ok(Json(state.publication_service.list_by_author(id).await?))
}

async fn list_user_pictures(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Picture>>, ApiError> {
    state.user_service.get(id).await?;
    Ok(Json(state.picture_service.list_by_author(id).await?))
}

async fn list_subscribers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SubscriptionListResponse>, ApiError> {
    state.user_service.get(id).await?;
    let subscriptions = state.subscription_service.subscribers_of(id).await?;
    Ok(Json(SubscriptionListResponse { subscriptions }))
}

async fn list_subscriptions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SubscriptionListResponse>, ApiError> {
    state.user_service.get(id).await?;
    let subscriptions = state.subscription_service.subscriptions_of(id).await?;
    Ok(Json(SubscriptionListResponse { subscriptions }))
}
