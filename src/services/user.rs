//! User service
//!
//! Validates user records and manages their lifecycle. Deleting a user
//! removes everything they authored.

use crate::db::repositories::UserRepository;
use crate::models::{User, UserInput, EMAIL_MAX_LEN, USER_NAME_MAX_LEN};
use crate::services::is_missing_reference;
use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// User not found
    #[error("User not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// User service
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Register a new user
    ///
    /// # Errors
    /// - `ValidationError` if the name is empty or too long, the email is
    ///   malformed or too long, or the avatar picture does not exist
    pub async fn create(&self, input: UserInput) -> Result<User, UserServiceError> {
        let input = validate_input(input)?;

        let user = self
            .repo
            .create(&User::new(input))
            .await
            .map_err(map_store_error)?;

        tracing::info!("Created user {} ({})", user.id, user.name);
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: i64) -> Result<User, UserServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or_else(|| UserServiceError::NotFound(id.to_string()))
    }

    /// All users ordered by name
    pub async fn list(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repo.list().await.context("Failed to list users")?)
    }

    /// Replace a user record.
    ///
    /// Every field is taken from `input`; only the registration date falls
    /// back to the stored value when omitted.
    pub async fn update(&self, id: i64, input: UserInput) -> Result<User, UserServiceError> {
        let input = validate_input(input)?;
        let existing = self.get(id).await?;

        self.repo
            .update(&existing.replaced_with(input))
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| UserServiceError::NotFound(id.to_string()))
    }

    /// Delete a user together with their publications, pictures, comments,
    /// likes and subscriptions.
    pub async fn delete(&self, id: i64) -> Result<(), UserServiceError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete user")?;

        if !deleted {
            return Err(UserServiceError::NotFound(id.to_string()));
        }

        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}

fn validate_input(mut input: UserInput) -> Result<UserInput, UserServiceError> {
    input.name = input.name.trim().to_string();
    input.email = input.email.trim().to_string();

    if input.name.is_empty() {
        return Err(UserServiceError::ValidationError(
            "Name cannot be empty".to_string(),
        ));
    }
    if input.name.chars().count() > USER_NAME_MAX_LEN {
        return Err(UserServiceError::ValidationError(format!(
            "Name cannot exceed {} characters",
            USER_NAME_MAX_LEN
        )));
    }
    if input.email.chars().count() > EMAIL_MAX_LEN {
        return Err(UserServiceError::ValidationError(format!(
            "Email cannot exceed {} characters",
            EMAIL_MAX_LEN
        )));
    }
    if !EMAIL_RE.is_match(&input.email) {
        return Err(UserServiceError::ValidationError(format!(
            "Invalid email address: {}",
            input.email
        )));
    }

    Ok(input)
}

fn map_store_error(err: anyhow::Error) -> UserServiceError {
    if is_missing_reference(&err) {
        UserServiceError::ValidationError("Avatar picture does not exist".to_string())
    } else {
        UserServiceError::InternalError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{
        insert_comment, insert_publication, setup_pool, user_input,
    };
    use crate::db::repositories::{
        CommentRepository, LikeRepository, PictureRepository, SqlxCommentRepository,
        SqlxLikeRepository, SqlxPictureRepository, SqlxSubscriptionRepository,
        SqlxUserRepository, SubscriptionRepository,
    };
    use crate::db::DynDatabasePool;
    use crate::models::LikeTarget;

    async fn setup_service() -> (DynDatabasePool, UserService) {
        let pool = setup_pool().await;
        let service = UserService::new(SqlxUserRepository::boxed(pool.clone()));
        (pool, service)
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let (_pool, service) = setup_service().await;

        let mut input = user_input("alice");
        input.name = "  alice  ".to_string();
        input.email = " alice@example.com ".to_string();

        let user = service.create(input).await.unwrap();
        assert_eq!(user.name, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(service.get(user.id).await.unwrap().name, "alice");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let (_pool, service) = setup_service().await;

        let result = service.create(user_input("   ")).await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_long_name() {
        let (_pool, service) = setup_service().await;
        let mut input = user_input("x");
        input.name = "n".repeat(USER_NAME_MAX_LEN + 1);

        let result = service.create(input).await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_email() {
        let (_pool, service) = setup_service().await;
        let mut input = user_input("alice");
        input.email = "not-an-email".to_string();

        let result = service.create(input).await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_long_email() {
        let (_pool, service) = setup_service().await;
        let mut input = user_input("alice");
        let domain = "@example.com";
        input.email = format!("{}{}", "a".repeat(EMAIL_MAX_LEN + 1 - domain.len()), domain);

        let result = service.create(input).await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(msg)) if msg.contains("exceed")));

        let mut input = user_input("alice");
        input.email = format!("{}{}", "a".repeat(EMAIL_MAX_LEN - domain.len()), domain);
        assert!(service.create(input).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_with_missing_avatar_is_validation_error() {
        let (_pool, service) = setup_service().await;
        let mut input = user_input("alice");
        input.avatar_id = Some(9999);

        let result = service.create(input).await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let (_pool, service) = setup_service().await;

        let result = service.get(12).await;
        assert!(matches!(result, Err(UserServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_sets_avatar() {
        let (pool, service) = setup_service().await;
        let alice = service.create(user_input("alice")).await.unwrap();
        let avatar = SqlxPictureRepository::new(pool.clone())
            .create(alice.id, None, "photo/me.jpg")
            .await
            .unwrap();

        let mut input = user_input("alice");
        input.avatar_id = Some(avatar.id);
        let updated = service.update(alice.id, input).await.unwrap();

        assert_eq!(updated.avatar_id, Some(avatar.id));
        assert_eq!(updated.registration_date, alice.registration_date);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let (_pool, service) = setup_service().await;

        let result = service.update(5, user_input("ghost")).await;
        assert!(matches!(result, Err(UserServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_everything_authored() {
        let (pool, service) = setup_service().await;
        let alice = service.create(user_input("alice")).await.unwrap();
        let bob = service.create(user_input("bob")).await.unwrap();

        let post = insert_publication(&pool, alice.id, "alice's").await;
        let bobs_post = insert_publication(&pool, bob.id, "bob's").await;
        let comment = insert_comment(&pool, alice.id, bobs_post.id, "hi").await;
        let pictures = SqlxPictureRepository::new(pool.clone());
        let picture = pictures.create(alice.id, Some(post.id), "photo/a.jpg").await.unwrap();
        let likes = SqlxLikeRepository::new(pool.clone());
        let like = likes
            .create(alice.id, LikeTarget::Publication(bobs_post.id))
            .await
            .unwrap();
        let subscriptions = SqlxSubscriptionRepository::new(pool.clone());
        let followed = subscriptions.create(bob.id, alice.id).await.unwrap();
        let follower = subscriptions.create(alice.id, bob.id).await.unwrap();

        service.delete(alice.id).await.unwrap();

        assert!(matches!(service.get(alice.id).await, Err(UserServiceError::NotFound(_))));
        assert!(pictures.get_by_id(picture.id).await.unwrap().is_none());
        assert!(likes.get_by_id(like.id).await.unwrap().is_none());
        assert!(subscriptions.get_by_id(followed.id).await.unwrap().is_none());
        assert!(subscriptions.get_by_id(follower.id).await.unwrap().is_none());
        let comments = SqlxCommentRepository::new(pool.clone());
        assert!(comments.get_by_id(comment.id).await.unwrap().is_none());
        assert!(service.get(bob.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let (_pool, service) = setup_service().await;

        let result = service.delete(1).await;
        assert!(matches!(result, Err(UserServiceError::NotFound(_))));
    }
}
