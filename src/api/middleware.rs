//! Shared API state and error mapping
//!
//! Contains:
//! - `AppState`, the services every handler reaches through `State`
//! - `ApiError`, the JSON error body and its HTTP status mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::repositories::{
    SqlxCommentRepository, SqlxLikeRepository, SqlxPictureRepository, SqlxPublicationRepository,
    SqlxRankingRepository, SqlxSubscriptionRepository, SqlxTagRepository, SqlxUserRepository,
};
use crate::db::DynDatabasePool;
use crate::services::{
    CommentService, CommentServiceError, LikeService, LikeServiceError, PictureService,
    PictureServiceError, PublicationService, PublicationServiceError, RankingService,
    RankingServiceError, SubscriptionService, SubscriptionServiceError, TagService,
    TagServiceError, UserService, UserServiceError,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub publication_service: Arc<PublicationService>,
    pub picture_service: Arc<PictureService>,
    pub comment_service: Arc<CommentService>,
    pub like_service: Arc<LikeService>,
    pub tag_service: Arc<TagService>,
    pub ranking_service: Arc<RankingService>,
}

impl AppState {
    /// Wire every service to its SQL repository on `pool`
    pub fn new(pool: DynDatabasePool) -> Self {
        Self {
            user_service: Arc::new(UserService::new(SqlxUserRepository::boxed(pool.clone()))),
            subscription_service: Arc::new(SubscriptionService::new(
                SqlxSubscriptionRepository::boxed(pool.clone()),
            )),
            publication_service: Arc::new(PublicationService::new(
                SqlxPublicationRepository::boxed(pool.clone()),
            )),
            picture_service: Arc::new(PictureService::new(SqlxPictureRepository::boxed(
                pool.clone(),
            ))),
            comment_service: Arc::new(CommentService::new(SqlxCommentRepository::boxed(
                pool.clone(),
            ))),
            like_service: Arc::new(LikeService::new(SqlxLikeRepository::boxed(pool.clone()))),
            tag_service: Arc::new(TagService::new(SqlxTagRepository::boxed(pool.clone()))),
            ranking_service: Arc::new(RankingService::new(SqlxRankingRepository::boxed(
                pool,
            ))),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    /// HTTP status for this error's code
    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "DUPLICATE_LIKE" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn internal(err: anyhow::Error) -> Self {
        tracing::error!("Request failed: {:#}", err);
        Self::internal_error("Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::NotFound(id) => Self::not_found(format!("User not found: {}", id)),
            UserServiceError::ValidationError(msg) => Self::validation_error(msg),
            UserServiceError::InternalError(e) => Self::internal(e),
        }
    }
}

impl From<SubscriptionServiceError> for ApiError {
    fn from(err: SubscriptionServiceError) -> Self {
        match err {
            SubscriptionServiceError::NotFound(what) => Self::not_found(what),
            SubscriptionServiceError::InternalError(e) => Self::internal(e),
        }
    }
}

impl From<PublicationServiceError> for ApiError {
    fn from(err: PublicationServiceError) -> Self {
        match err {
            PublicationServiceError::NotFound(what) => Self::not_found(what),
            PublicationServiceError::ValidationError(msg) => Self::validation_error(msg),
            PublicationServiceError::InternalError(e) => Self::internal(e),
        }
    }
}

impl From<PictureServiceError> for ApiError {
    fn from(err: PictureServiceError) -> Self {
        match err {
            PictureServiceError::NotFound(what) => Self::not_found(what),
            PictureServiceError::ValidationError(msg) => Self::validation_error(msg),
            PictureServiceError::InternalError(e) => Self::internal(e),
        }
    }
}

impl From<CommentServiceError> for ApiError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::NotFound(what) => Self::not_found(what),
            CommentServiceError::ValidationError(msg) => Self::validation_error(msg),
            CommentServiceError::InternalError(e) => Self::internal(e),
        }
    }
}

impl From<LikeServiceError> for ApiError {
    fn from(err: LikeServiceError) -> Self {
        match err {
            LikeServiceError::NotFound(what) => Self::not_found(what),
            LikeServiceError::DuplicateLike(dup) => Self::with_details(
                "DUPLICATE_LIKE",
                dup.to_string(),
                serde_json::json!({ "author_id": dup.author_id, "target": dup.target }),
            ),
            LikeServiceError::InternalError(e) => Self::internal(e),
        }
    }
}

impl From<TagServiceError> for ApiError {
    fn from(err: TagServiceError) -> Self {
        match err {
            TagServiceError::NotFound(what) => Self::not_found(format!("Tag not found: {}", what)),
            TagServiceError::ValidationError(msg) => Self::validation_error(msg),
            TagServiceError::InternalError(e) => Self::internal(e),
        }
    }
}

impl From<RankingServiceError> for ApiError {
    fn from(err: RankingServiceError) -> Self {
        match err {
            RankingServiceError::InternalError(e) => Self::internal(e),
        }
    }
}
