//! Comment repository
//!
//! Database operations for comments on publications.

use crate::db::pool::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::{Comment, CreateCommentInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_COMMENT: &str = r#"
    SELECT id, author_id, publication_id, comment, date
    FROM comments
"#;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment dated now
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment>;

    /// Get comment by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;

    /// Comments of a publication, oldest first
    async fn list_by_publication(&self, publication_id: i64) -> Result<Vec<Comment>>;

    /// Replace the comment text
    async fn update(&self, id: i64, text: &str) -> Result<Option<Comment>>;

    /// Delete a comment together with its likes
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, input: &CreateCommentInput) -> Result<Comment> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => create_comment_sqlite(pool, input).await,
            Backend::Mysql(pool) => create_comment_mysql(pool, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => get_comment_by_id_sqlite(pool, id).await,
            Backend::Mysql(pool) => get_comment_by_id_mysql(pool, id).await,
        }
    }

    async fn list_by_publication(&self, publication_id: i64) -> Result<Vec<Comment>> {
        let sql = format!(
            "{} WHERE publication_id = ? ORDER BY date ASC, id ASC",
            SELECT_COMMENT
        );
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(&sql)
                    .bind(publication_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list comments")?;
                rows.iter().map(row_to_comment_sqlite).collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(&sql)
                    .bind(publication_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list comments")?;
                rows.iter().map(row_to_comment_mysql).collect()
            }
        }
    }

    async fn update(&self, id: i64, text: &str) -> Result<Option<Comment>> {
        const SQL: &str = "UPDATE comments SET comment = ? WHERE id = ?";
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                sqlx::query(SQL)
                    .bind(text)
                    .bind(id)
                    .execute(pool)
                    .await
                    .context("Failed to update comment")?;
                get_comment_by_id_sqlite(pool, id).await
            }
            Backend::Mysql(pool) => {
                sqlx::query(SQL)
                    .bind(text)
                    .bind(id)
                    .execute(pool)
                    .await
                    .context("Failed to update comment")?;
                get_comment_by_id_mysql(pool, id).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query("DELETE FROM comments WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete comment")?
                .rows_affected(),
            Backend::Mysql(pool) => sqlx::query("DELETE FROM comments WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete comment")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_comment_sqlite(pool: &SqlitePool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO comments (author_id, publication_id, comment, date)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(input.author_id)
    .bind(input.publication_id)
    .bind(&input.comment)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_rowid(),
        author_id: input.author_id,
        publication_id: input.publication_id,
        comment: input.comment.clone(),
        date: now,
    })
}

async fn get_comment_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COMMENT))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get comment by ID")?;

    row.as_ref().map(row_to_comment_sqlite).transpose()
}

pub(crate) fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        publication_id: row.try_get("publication_id")?,
        comment: row.try_get("comment")?,
        date: row.try_get("date")?,
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_comment_mysql(pool: &MySqlPool, input: &CreateCommentInput) -> Result<Comment> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO comments (author_id, publication_id, comment, date)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(input.author_id)
    .bind(input.publication_id)
    .bind(&input.comment)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(Comment {
        id: result.last_insert_id() as i64,
        author_id: input.author_id,
        publication_id: input.publication_id,
        comment: input.comment.clone(),
        date: now,
    })
}

async fn get_comment_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Comment>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COMMENT))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get comment by ID")?;

    row.as_ref().map(row_to_comment_mysql).transpose()
}

pub(crate) fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        publication_id: row.try_get("publication_id")?,
        comment: row.try_get("comment")?,
        date: row.try_get("date")?,
    })
}
