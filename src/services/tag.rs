//! Tag service
//!
//! Implements business logic for tag management:
//! - Tag CRUD with an optional title
//! - Tag-publication associations in both directions

use crate::db::repositories::TagRepository;
use crate::models::{Publication, Tag, TagInput, TAG_TITLE_MAX_LEN};
use crate::services::is_missing_reference;
use anyhow::Context;
use std::sync::Arc;

/// Error types for tag service operations
#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    /// Tag not found
    #[error("Tag not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Tag service for managing publication tags
pub struct TagService {
    repo: Arc<dyn TagRepository>,
}

impl TagService {
    /// Create a new tag service
    ///
    /// # Arguments
    /// * `repo` - Tag repository for database operations
    pub fn new(repo: Arc<dyn TagRepository>) -> Self {
        Self { repo }
    }

    /// Create a new tag
    ///
    /// A blank title is stored as no title.
    ///
    /// # Errors
    /// - `ValidationError` if the title is longer than 128 characters
    pub async fn create(&self, input: TagInput) -> Result<Tag, TagServiceError> {
        let title = normalize_title(input.title)?;

        let created = self
            .repo
            .create(&Tag::new(title))
            .await
            .context("Failed to create tag")?;

        tracing::info!("Created tag {} ({})", created.id, created);
        Ok(created)
    }

    /// Get tag by ID
    pub async fn get(&self, id: i64) -> Result<Tag, TagServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get tag by ID")?
            .ok_or_else(|| TagServiceError::NotFound(id.to_string()))
    }

    /// List all tags ordered by title
    pub async fn list(&self) -> Result<Vec<Tag>, TagServiceError> {
        Ok(self.repo.list().await.context("Failed to list tags")?)
    }

    /// Replace a tag's title
    pub async fn update(&self, id: i64, input: TagInput) -> Result<Tag, TagServiceError> {
        let title = normalize_title(input.title)?;

        self.repo
            .update(&Tag { id, title })
            .await
            .context("Failed to update tag")?
            .ok_or_else(|| TagServiceError::NotFound(id.to_string()))
    }

    /// Delete a tag. Tagged publications stay.
    pub async fn delete(&self, id: i64) -> Result<(), TagServiceError> {
        let deleted = self.repo.delete(id).await.context("Failed to delete tag")?;

        if !deleted {
            return Err(TagServiceError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Attach a tag to a publication. Attaching twice is a no-op.
    pub async fn attach(&self, tag_id: i64, publication_id: i64) -> Result<(), TagServiceError> {
        self.repo
            .add_to_publication(tag_id, publication_id)
            .await
            .map_err(|e| {
                if is_missing_reference(&e) {
                    TagServiceError::NotFound(format!(
                        "tag {} or publication {}",
                        tag_id, publication_id
                    ))
                } else {
                    TagServiceError::InternalError(e)
                }
            })
    }

    /// Detach a tag from a publication
    pub async fn detach(&self, tag_id: i64, publication_id: i64) -> Result<(), TagServiceError> {
        let removed = self
            .repo
            .remove_from_publication(tag_id, publication_id)
            .await
            .context("Failed to detach tag")?;

        if !removed {
            return Err(TagServiceError::NotFound(format!(
                "tag {} on publication {}",
                tag_id, publication_id
            )));
        }
        Ok(())
    }

    /// Tags of a publication
    pub async fn tags_of(&self, publication_id: i64) -> Result<Vec<Tag>, TagServiceError> {
        Ok(self
            .repo
            .get_by_publication_id(publication_id)
            .await
            .context("Failed to get tags of publication")?)
    }

    /// Publications carrying a tag
    pub async fn publications_of(&self, tag_id: i64) -> Result<Vec<Publication>, TagServiceError> {
        self.get(tag_id).await?;

        Ok(self
            .repo
            .get_publications(tag_id)
            .await
            .context("Failed to get publications of tag")?)
    }
}

fn normalize_title(title: Option<String>) -> Result<Option<String>, TagServiceError> {
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    if let Some(t) = &title {
        if t.chars().count() > TAG_TITLE_MAX_LEN {
            return Err(TagServiceError::ValidationError(format!(
                "Tag title cannot exceed {} characters",
                TAG_TITLE_MAX_LEN
            )));
        }
    }
    Ok(title)
}
