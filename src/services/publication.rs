//! Publication service
//!
//! Creation, full-record replacement and deletion of publications.
//! Deleting a publication drops its comments, pictures, likes and tag links.

use crate::db::repositories::PublicationRepository;
use crate::models::{Publication, PublicationInput, PUBLICATION_TITLE_MAX_LEN};
use crate::services::is_missing_reference;
use anyhow::Context;
use std::sync::Arc;

/// Error types for publication service operations
#[derive(Debug, thiserror::Error)]
pub enum PublicationServiceError {
    /// Publication or author not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Publication service
pub struct PublicationService {
    repo: Arc<dyn PublicationRepository>,
}

impl PublicationService {
    pub fn new(repo: Arc<dyn PublicationRepository>) -> Self {
        Self { repo }
    }

    /// Create a publication dated now
    ///
    /// # Errors
    /// - `ValidationError` if the title is too long
    /// - `NotFound` if the author does not exist
    pub async fn create(
        &self,
        input: PublicationInput,
    ) -> Result<Publication, PublicationServiceError> {
        validate_input(&input)?;

        let publication = self
            .repo
            .create(&input)
            .await
            .map_err(|e| map_store_error(e, input.author_id))?;

        tracing::info!(
            "Created publication {} by user {}",
            publication.id,
            publication.author_id
        );
        Ok(publication)
    }

    pub async fn get(&self, id: i64) -> Result<Publication, PublicationServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get publication")?
            .ok_or_else(|| PublicationServiceError::NotFound(format!("Publication {}", id)))
    }

    /// All publications, newest first
    pub async fn list(&self) -> Result<Vec<Publication>, PublicationServiceError> {
        Ok(self.repo.list().await.context("Failed to list publications")?)
    }

    /// Publications of one author, newest first
    pub async fn list_by_author(
        &self,
        author_id: i64,
    ) -> Result<Vec<Publication>, PublicationServiceError> {
        Ok(self
            .repo
            .list_by_author(author_id)
            .await
            .context("Failed to list publications by author")?)
    }

    /// Replace a publication's author, title and description
    pub async fn update(
        &self,
        id: i64,
        input: PublicationInput,
    ) -> Result<Publication, PublicationServiceError> {
        validate_input(&input)?;

        self.repo
            .update(id, &input)
            .await
            .map_err(|e| map_store_error(e, input.author_id))?
            .ok_or_else(|| PublicationServiceError::NotFound(format!("Publication {}", id)))
    }

    /// Delete a publication and everything attached to it
    pub async fn delete(&self, id: i64) -> Result<(), PublicationServiceError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete publication")?;

        if !deleted {
            return Err(PublicationServiceError::NotFound(format!("Publication {}", id)));
        }

        tracing::info!("Deleted publication {}", id);
        Ok(())
    }
}

fn validate_input(input: &PublicationInput) -> Result<(), PublicationServiceError> {
    if let Some(title) = &input.title {
        if title.chars().count() > PUBLICATION_TITLE_MAX_LEN {
            return Err(PublicationServiceError::ValidationError(format!(
                "Title cannot exceed {} characters",
                PUBLICATION_TITLE_MAX_LEN
            )));
        }
    }
    Ok(())
}

fn map_store_error(err: anyhow::Error, author_id: i64) -> PublicationServiceError {
    if is_missing_reference(&err) {
        PublicationServiceError::NotFound(format!("User {}", author_id))
    } else {
        PublicationServiceError::InternalError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_user, setup_pool};
    use crate::db::repositories::SqlxPublicationRepository;
    use crate::db::DynDatabasePool;

    async fn setup_service() -> (DynDatabasePool, PublicationService) {
        let pool = setup_pool().await;
        let service = PublicationService::new(SqlxPublicationRepository::boxed(pool.clone()));
        (pool, service)
    }

    fn input(author_id: i64, title: Option<&str>) -> PublicationInput {
        PublicationInput {
            author_id,
            title: title.map(str::to_string),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (pool, service) = setup_service().await;
        let alice = insert_user(&pool, "alice").await;

        let created = service.create(input(alice.id, Some("Hello"))).await.unwrap();
        let found = service.get(created.id).await.unwrap();

        assert_eq!(found.title.as_deref(), Some("Hello"));
        assert_eq!(found.to_string(), "Hello");
    }

    #[tokio::test]
    async fn test_title_length_limit() {
        let (pool, service) = setup_service().await;
        let alice = insert_user(&pool, "alice").await;

        let at_limit = "t".repeat(PUBLICATION_TITLE_MAX_LEN);
        assert!(service.create(input(alice.id, Some(&at_limit))).await.is_ok());

        let too_long = "t".repeat(PUBLICATION_TITLE_MAX_LEN + 1);
        let result = service.create(input(alice.id, Some(&too_long))).await;
        assert!(matches!(result, Err(PublicationServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_for_missing_author() {
        let (_pool, service) = setup_service().await;

        let result = service.create(input(31, Some("orphan"))).await;
        assert!(matches!(result, Err(PublicationServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (pool, service) = setup_service().await;
        let alice = insert_user(&pool, "alice").await;
        let created = service.create(input(alice.id, Some("v1"))).await.unwrap();

        let updated = service
            .update(created.id, input(alice.id, None))
            .await
            .unwrap();
        assert!(updated.title.is_none());

        service.delete(created.id).await.unwrap();
        assert!(matches!(
            service.get(created.id).await,
            Err(PublicationServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.update(created.id, input(alice.id, None)).await,
            Err(PublicationServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_author() {
        let (pool, service) = setup_service().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        service.create(input(alice.id, Some("a"))).await.unwrap();
        service.create(input(bob.id, Some("b"))).await.unwrap();

        let alices = service.list_by_author(alice.id).await.unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].author_id, alice.id);
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
