//! Like service
//!
//! An author can like a given publication or comment at most once. A second
//! attempt fails with [`LikeServiceError::DuplicateLike`]; liking a different
//! target is unaffected.

use crate::db::repositories::LikeRepository;
use crate::models::{DuplicateLikeError, Like, LikeTarget};
use crate::services::is_missing_reference;
use anyhow::Context;
use std::sync::Arc;

/// Error types for like service operations
#[derive(Debug, thiserror::Error)]
pub enum LikeServiceError {
    /// Like, author or target not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The author already likes the target
    #[error(transparent)]
    DuplicateLike(#[from] DuplicateLikeError),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Like service
pub struct LikeService {
    repo: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(repo: Arc<dyn LikeRepository>) -> Self {
        Self { repo }
    }

    /// Record that `author_id` likes `target`
    pub async fn like(&self, author_id: i64, target: LikeTarget) -> Result<Like, LikeServiceError> {
        let like = self
            .repo
            .create(author_id, target)
            .await
            .map_err(|e| match e.downcast::<DuplicateLikeError>() {
                Ok(duplicate) => LikeServiceError::DuplicateLike(duplicate),
                Err(e) if is_missing_reference(&e) => {
                    LikeServiceError::NotFound(format!("User {} or {}", author_id, target))
                }
                Err(e) => LikeServiceError::InternalError(e),
            })?;

        tracing::debug!("User {} liked {}", author_id, target);
        Ok(like)
    }

    /// Remove a like
    pub async fn unlike(&self, id: i64) -> Result<(), LikeServiceError> {
        let deleted = self.repo.delete(id).await.context("Failed to delete like")?;

        if !deleted {
            return Err(LikeServiceError::NotFound(format!("Like {}", id)));
        }
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Like, LikeServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get like")?
            .ok_or_else(|| LikeServiceError::NotFound(format!("Like {}", id)))
    }

    /// Number of likes on a target
    pub async fn count(&self, target: LikeTarget) -> Result<i64, LikeServiceError> {
        Ok(self.repo.count(target).await.context("Failed to count likes")?)
    }

    /// Whether `author_id` likes `target`
    pub async fn is_liked(&self, author_id: i64, target: LikeTarget) -> Result<bool, LikeServiceError> {
        Ok(self
            .repo
            .find(author_id, target)
            .await
            .context("Failed to check like")?
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{
        insert_comment, insert_publication, insert_user, setup_pool,
    };
    use crate::db::repositories::SqlxLikeRepository;
    use crate::db::DynDatabasePool;

    async fn setup_service() -> (DynDatabasePool, LikeService) {
        let pool = setup_pool().await;
        let service = LikeService::new(SqlxLikeRepository::boxed(pool.clone()));
        (pool, service)
    }

    #[tokio::test]
    async fn test_like_and_count() {
        let (pool, service) = setup_service().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let post = insert_publication(&pool, alice.id, "post").await;
        let target = LikeTarget::Publication(post.id);

        service.like(alice.id, target).await.unwrap();
        service.like(bob.id, target).await.unwrap();

        assert_eq!(service.count(target).await.unwrap(), 2);
        assert!(service.is_liked(bob.id, target).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_like_rejected() {
        let (pool, service) = setup_service().await;
        let alice = insert_user(&pool, "alice").await;
        let post = insert_publication(&pool, alice.id, "post").await;
        let comment = insert_comment(&pool, alice.id, post.id, "nice").await;

        service
            .like(alice.id, LikeTarget::Publication(post.id))
            .await
            .unwrap();

        let again = service.like(alice.id, LikeTarget::Publication(post.id)).await;
        match again {
            Err(LikeServiceError::DuplicateLike(err)) => {
                assert_eq!(err.author_id, alice.id);
                assert_eq!(err.target, LikeTarget::Publication(post.id));
            }
            other => panic!("Expected DuplicateLike, got {:?}", other),
        }

        // A different target by the same author is fine
        assert!(service
            .like(alice.id, LikeTarget::Comment(comment.id))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_like_missing_target() {
        let (pool, service) = setup_service().await;
        let alice = insert_user(&pool, "alice").await;

        let result = service.like(alice.id, LikeTarget::Publication(5150)).await;
        assert!(matches!(result, Err(LikeServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unlike_allows_liking_again() {
        let (pool, service) = setup_service().await;
        let alice = insert_user(&pool, "alice").await;
        let post = insert_publication(&pool, alice.id, "post").await;
        let target = LikeTarget::Publication(post.id);

        let like = service.like(alice.id, target).await.unwrap();
        service.unlike(like.id).await.unwrap();

        assert!(!service.is_liked(alice.id, target).await.unwrap());
        assert!(service.like(alice.id, target).await.is_ok());
        assert!(matches!(
            service.unlike(like.id).await,
            Err(LikeServiceError::NotFound(_))
        ));
    }
}
