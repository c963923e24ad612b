//! Data models
//!
//! This module contains all data structures used throughout publica.
//! Models represent:
//! - Database entities (User, Subscription, Publication, Picture, Comment, Like, Tag)
//! - API request types (`*Input`)
//! - Ranked views (`PublicationWithLikes`, `CommentWithLikes`)

mod comment;
mod like;
mod picture;
mod publication;
mod subscription;
mod tag;
mod user;

pub use comment::{Comment, CommentWithLikes, CreateCommentInput, UpdateCommentInput};
pub use like::{CreateLikeInput, DuplicateLikeError, Like, LikeTarget};
pub use picture::{photo_path, Picture, PictureInput, PHOTO_MAX_LEN, PHOTO_PREFIX};
pub use publication::{Publication, PublicationInput, PublicationWithLikes, PUBLICATION_TITLE_MAX_LEN};
pub use subscription::{Subscription, SubscriptionInput};
pub use tag::{Tag, TagInput, TAG_TITLE_MAX_LEN};
pub use user::{User, UserInput, EMAIL_MAX_LEN, USER_NAME_MAX_LEN};
