//! Comment service

use crate::db::repositories::CommentRepository;
use crate::models::{Comment, CreateCommentInput, UpdateCommentInput};
use crate::services::is_missing_reference;
use anyhow::Context;
use std::sync::Arc;

/// Error types for comment service operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// Comment, publication or author not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Comment service
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>) -> Self {
        Self { repo }
    }

    /// Add a comment to a publication
    ///
    /// # Errors
    /// - `ValidationError` if the text is blank
    /// - `NotFound` if the publication or author does not exist
    pub async fn create(&self, input: CreateCommentInput) -> Result<Comment, CommentServiceError> {
        let text = validate_text(&input.comment)?;
        let input = CreateCommentInput {
            comment: text,
            ..input
        };

        let comment = self.repo.create(&input).await.map_err(|e| {
            if is_missing_reference(&e) {
                CommentServiceError::NotFound(format!(
                    "Publication {} or user {}",
                    input.publication_id, input.author_id
                ))
            } else {
                CommentServiceError::InternalError(e)
            }
        })?;

        tracing::info!(
            "Created comment {} on publication {}",
            comment.id,
            comment.publication_id
        );
        Ok(comment)
    }

    pub async fn get(&self, id: i64) -> Result<Comment, CommentServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get comment")?
            .ok_or_else(|| CommentServiceError::NotFound(format!("Comment {}", id)))
    }

    /// Comments of a publication, oldest first
    pub async fn list_by_publication(
        &self,
        publication_id: i64,
    ) -> Result<Vec<Comment>, CommentServiceError> {
        Ok(self
            .repo
            .list_by_publication(publication_id)
            .await
            .context("Failed to list comments")?)
    }

    /// Replace the comment text
    pub async fn update(
        &self,
        id: i64,
        input: UpdateCommentInput,
    ) -> Result<Comment, CommentServiceError> {
        let text = validate_text(&input.comment)?;

        self.repo
            .update(id, &text)
            .await
            .context("Failed to update comment")?
            .ok_or_else(|| CommentServiceError::NotFound(format!("Comment {}", id)))
    }

    /// Delete a comment and its likes
    pub async fn delete(&self, id: i64) -> Result<(), CommentServiceError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete comment")?;

        if !deleted {
            return Err(CommentServiceError::NotFound(format!("Comment {}", id)));
        }

        tracing::info!("Deleted comment {}", id);
        Ok(())
    }
}

fn validate_text(text: &str) -> Result<String, CommentServiceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CommentServiceError::ValidationError(
            "Comment cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
