//! Subscription API endpoints
//!
//! - POST /api/v1/subscriptions - Subscribe to an author
//! - GET /api/v1/subscriptions/{id} - Read a subscription
//! - DELETE /api/v1/subscriptions/{id} - Unsubscribe

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Subscription, SubscriptionInput};

/// Build the subscriptions router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(subscribe))
        .route("/{id}", get(get_subscription).delete(unsubscribe))
}

async fn subscribe(
    State(state): State<AppState>,
    Json(input): Json<SubscriptionInput>,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    let subscription = state.subscription_service.subscribe(input).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

async fn get_subscription(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Subscription>, ApiError> {
    Ok(Json(state.subscription_service.get(id).await?))
}

async fn unsubscribe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.subscription_service.unsubscribe(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
