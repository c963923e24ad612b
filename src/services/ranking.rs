//! Ranking service
//!
//! Orders publications, and the comments of one publication, by how many
//! likes they received. Most liked first; equal counts fall back to
//! ascending id. Records without likes are included with a count of 0.
//!
//! Every call re-runs the aggregation, so the result always reflects the
//! likes present at call time and can be requested again at will.

use crate::db::repositories::RankingRepository;
use crate::models::{CommentWithLikes, PublicationWithLikes};
use anyhow::Context;
use std::sync::Arc;

/// Error types for ranking operations
#[derive(Debug, thiserror::Error)]
pub enum RankingServiceError {
    /// The store could not be queried
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Ranking service
pub struct RankingService {
    repo: Arc<dyn RankingRepository>,
}

impl RankingService {
    pub fn new(repo: Arc<dyn RankingRepository>) -> Self {
        Self { repo }
    }

    /// All publications with their like counts, most liked first
    pub async fn rank_publications_by_likes(
        &self,
    ) -> Result<Vec<PublicationWithLikes>, RankingServiceError> {
        let ranked = self
            .repo
            .rank_publications()
            .await
            .context("Failed to rank publications by likes")?;

        tracing::debug!("Ranked {} publications", ranked.len());
        Ok(ranked)
    }

    /// Comments of `publication_id` with their like counts, most liked first.
    ///
    /// An unknown publication yields an empty list.
    pub async fn rank_comments_by_likes(
        &self,
        publication_id: i64,
    ) -> Result<Vec<CommentWithLikes>, RankingServiceError> {
        let ranked = self
            .repo
            .rank_comments(publication_id)
            .await
            .context("Failed to rank comments by likes")?;

        tracing::debug!(
            "Ranked {} comments of publication {}",
            ranked.len(),
            publication_id
        );
        Ok(ranked)
    }
}
