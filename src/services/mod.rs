//! Services layer - Business logic
//!
//! This module contains the business logic services for publica.
//! Services are responsible for:
//! - Validating input before it reaches the store
//! - Turning missing records into typed `NotFound` errors
//! - Computing the like rankings

pub mod comment;
pub mod like;
pub mod picture;
pub mod publication;
pub mod ranking;
pub mod subscription;
pub mod tag;
pub mod user;

pub use comment::{CommentService, CommentServiceError};
pub use like::{LikeService, LikeServiceError};
pub use picture::{PictureService, PictureServiceError};
pub use publication::{PublicationService, PublicationServiceError};
pub use ranking::{RankingService, RankingServiceError};
pub use subscription::{SubscriptionService, SubscriptionServiceError};
pub use tag::{TagService, TagServiceError};
pub use user::{UserService, UserServiceError};

/// Whether a repository error was caused by a foreign key pointing at a
/// record that does not exist.
pub(crate) fn is_missing_reference(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::Database(db)) if db.is_foreign_key_violation()
        )
    })
}
