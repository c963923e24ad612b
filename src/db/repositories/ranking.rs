//! Ranking repository
//!
//! Like-count aggregations over publications and comments. Each call runs a
//! single `LEFT JOIN ... GROUP BY ... ORDER BY` statement, so rows without
//! likes are kept with a count of 0 and every call sees the current data.
//! Ties are broken by ascending id.

use super::comment::{row_to_comment_mysql, row_to_comment_sqlite};
use super::publication::{row_to_publication_mysql, row_to_publication_sqlite};
use crate::db::pool::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::{CommentWithLikes, PublicationWithLikes};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

const RANK_PUBLICATIONS: &str = r#"
    SELECT p.id, p.author_id, p.title, p.description, p.date, COUNT(l.id) AS like_count
    FROM publications p
    LEFT JOIN likes l ON l.publication_id = p.id
    GROUP BY p.id, p.author_id, p.title, p.description, p.date
    ORDER BY like_count DESC, p.id ASC
"#;

const RANK_COMMENTS: &str = r#"
    SELECT c.id, c.author_id, c.publication_id, c.comment, c.date, COUNT(l.id) AS like_count
    FROM comments c
    LEFT JOIN likes l ON l.comment_id = c.id
    WHERE c.publication_id = ?
    GROUP BY c.id, c.author_id, c.publication_id, c.comment, c.date
    ORDER BY like_count DESC, c.id ASC
"#;

/// Ranking repository trait
#[async_trait]
pub trait RankingRepository: Send + Sync {
    /// All publications ordered by like count, most liked first
    async fn rank_publications(&self) -> Result<Vec<PublicationWithLikes>>;

    /// Comments of one publication ordered by like count, most liked first
    async fn rank_comments(&self, publication_id: i64) -> Result<Vec<CommentWithLikes>>;
}

/// SQLx-based ranking repository implementation
pub struct SqlxRankingRepository {
    pool: DynDatabasePool,
}

impl SqlxRankingRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn RankingRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl RankingRepository for SqlxRankingRepository {
    async fn rank_publications(&self) -> Result<Vec<PublicationWithLikes>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(RANK_PUBLICATIONS)
                    .fetch_all(pool)
                    .await
                    .context("Failed to rank publications")?;
                rows.iter()
                    .map(|row| -> Result<PublicationWithLikes> {
                        Ok(PublicationWithLikes::new(
                            row_to_publication_sqlite(row)?,
                            row.try_get("like_count")?,
                        ))
                    })
                    .collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(RANK_PUBLICATIONS)
                    .fetch_all(pool)
                    .await
                    .context("Failed to rank publications")?;
                rows.iter()
                    .map(|row| -> Result<PublicationWithLikes> {
                        Ok(PublicationWithLikes::new(
                            row_to_publication_mysql(row)?,
                            row.try_get("like_count")?,
                        ))
                    })
                    .collect()
            }
        }
    }

    async fn rank_comments(&self, publication_id: i64) -> Result<Vec<CommentWithLikes>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(RANK_COMMENTS)
                    .bind(publication_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to rank comments")?;
                rows.iter()
                    .map(|row| -> Result<CommentWithLikes> {
                        Ok(CommentWithLikes::new(
                            row_to_comment_sqlite(row)?,
                            row.try_get("like_count")?,
                        ))
                    })
                    .collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(RANK_COMMENTS)
                    .bind(publication_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to rank comments")?;
                rows.iter()
                    .map(|row| -> Result<CommentWithLikes> {
                        Ok(CommentWithLikes::new(
                            row_to_comment_mysql(row)?,
                            row.try_get("like_count")?,
                        ))
                    })
                    .collect()
            }
        }
    }
}
