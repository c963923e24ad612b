//! Picture service
//!
//! Pictures are photo references under the `photo/` prefix. Nothing is read
//! from or written to disk here.

use crate::db::repositories::PictureRepository;
use crate::models::{photo_path, Picture, PictureInput, PHOTO_MAX_LEN, PHOTO_PREFIX};
use crate::services::is_missing_reference;
use anyhow::Context;
use std::sync::Arc;

/// Error types for picture service operations
#[derive(Debug, thiserror::Error)]
pub enum PictureServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Picture service
pub struct PictureService {
    repo: Arc<dyn PictureRepository>,
}

impl PictureService {
    pub fn new(repo: Arc<dyn PictureRepository>) -> Self {
        Self { repo }
    }

    /// Store a photo reference, optionally attached to a publication
    pub async fn create(&self, input: PictureInput) -> Result<Picture, PictureServiceError> {
        let photo = photo_path(&input.photo);
        if photo[PHOTO_PREFIX.len()..].trim_matches('/').is_empty() {
            return Err(PictureServiceError::ValidationError(
                "Photo reference cannot be empty".to_string(),
            ));
        }
        if photo.chars().count() > PHOTO_MAX_LEN {
            return Err(PictureServiceError::ValidationError(format!(
                "Photo reference cannot exceed {} characters",
                PHOTO_MAX_LEN
            )));
        }

        let picture = self
            .repo
            .create(input.author_id, input.publication_id, &photo)
            .await
            .map_err(|e| {
                if is_missing_reference(&e) {
                    PictureServiceError::NotFound("Author or publication".to_string())
                } else {
                    PictureServiceError::InternalError(e)
                }
            })?;

        tracing::info!("Stored picture {} ({})", picture.id, picture.photo);
        Ok(picture)
    }

    pub async fn get(&self, id: i64) -> Result<Picture, PictureServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get picture")?
            .ok_or_else(|| PictureServiceError::NotFound(format!("Picture {}", id)))
    }

    pub async fn list_by_publication(
        &self,
        publication_id: i64,
    ) -> Result<Vec<Picture>, PictureServiceError> {
        Ok(self
            .repo
            .list_by_publication(publication_id)
            .await
            .context("Failed to list pictures")?)
    }

    pub async fn list_by_author(&self, author_id: i64) -> Result<Vec<Picture>, PictureServiceError> {
        Ok(self
            .repo
            .list_by_author(author_id)
            .await
            .context("Failed to list pictures")?)
    }

    /// Delete a picture. Any user using it as avatar is left without one.
    pub async fn delete(&self, id: i64) -> Result<(), PictureServiceError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete picture")?;

        if !deleted {
            return Err(PictureServiceError::NotFound(format!("Picture {}", id)));
        }

        tracing::info!("Deleted picture {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_publication, insert_user, setup_pool};
    use crate::db::repositories::SqlxPictureRepository;

    #[tokio::test]
    async fn test_create_prefixes_photo() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let service = PictureService::new(SqlxPictureRepository::boxed(pool.clone()));

        let picture = service
            .create(PictureInput {
                author_id: alice.id,
                publication_id: None,
                photo: "beach.jpg".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(picture.photo, "photo/beach.jpg");
        assert_eq!(service.get(picture.id).await.unwrap(), picture);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_photo() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let service = PictureService::new(SqlxPictureRepository::boxed(pool.clone()));

        let result = service
            .create(PictureInput {
                author_id: alice.id,
                publication_id: None,
                photo: "  ".to_string(),
            })
            .await;
        assert!(matches!(result, Err(PictureServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bare_prefix() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let service = PictureService::new(SqlxPictureRepository::boxed(pool.clone()));

        for photo in ["photo/", "/photo/", "photo//"] {
            let result = service
                .create(PictureInput {
                    author_id: alice.id,
                    publication_id: None,
                    photo: photo.to_string(),
                })
                .await;
            assert!(
                matches!(result, Err(PictureServiceError::ValidationError(_))),
                "{:?} should be rejected",
                photo
            );
        }
        assert!(service.list_by_author(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_long_photo() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let service = PictureService::new(SqlxPictureRepository::boxed(pool.clone()));
        let input = |len: usize| PictureInput {
            author_id: alice.id,
            publication_id: None,
            photo: "p".repeat(len),
        };

        let result = service.create(input(PHOTO_MAX_LEN - PHOTO_PREFIX.len() + 1)).await;
        assert!(matches!(result, Err(PictureServiceError::ValidationError(_))));

        let picture = service.create(input(PHOTO_MAX_LEN - PHOTO_PREFIX.len())).await.unwrap();
        assert_eq!(picture.photo.len(), PHOTO_MAX_LEN);
    }

    #[tokio::test]
    async fn test_create_for_missing_publication() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let service = PictureService::new(SqlxPictureRepository::boxed(pool.clone()));

        let result = service
            .create(PictureInput {
                author_id: alice.id,
                publication_id: Some(404),
                photo: "x.jpg".to_string(),
            })
            .await;
        assert!(matches!(result, Err(PictureServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let post = insert_publication(&pool, alice.id, "album").await;
        let service = PictureService::new(SqlxPictureRepository::boxed(pool.clone()));

        let picture = service
            .create(PictureInput {
                author_id: alice.id,
                publication_id: Some(post.id),
                photo: "photo/one.jpg".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(service.list_by_publication(post.id).await.unwrap().len(), 1);
        assert_eq!(service.list_by_author(alice.id).await.unwrap().len(), 1);

        service.delete(picture.id).await.unwrap();
        assert!(matches!(
            service.delete(picture.id).await,
            Err(PictureServiceError::NotFound(_))
        ));
    }
}
