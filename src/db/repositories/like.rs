//! Like repository
//!
//! A like is stored with exactly one of `publication_id` / `comment_id` set.
//! The unique keys on `(author_id, publication_id)` and
//! `(author_id, comment_id)` make a second like on the same target fail; that
//! failure is reported as a [`DuplicateLikeError`] inside the returned
//! `anyhow::Error` so callers can downcast it.

use crate::db::pool::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::{DuplicateLikeError, Like, LikeTarget};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

const SELECT_LIKE: &str = "SELECT id, author_id, publication_id, comment_id, date FROM likes";

/// Like repository trait
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Record a like.
    ///
    /// Fails with [`DuplicateLikeError`] if the author already likes the target.
    async fn create(&self, author_id: i64, target: LikeTarget) -> Result<Like>;

    /// Get like by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Like>>;

    /// Delete a like
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Number of likes on a target
    async fn count(&self, target: LikeTarget) -> Result<i64>;

    /// The author's like on the target, if any
    async fn find(&self, author_id: i64, target: LikeTarget) -> Result<Option<Like>>;
}

/// SQLx-based like repository implementation
pub struct SqlxLikeRepository {
    pool: DynDatabasePool,
}

impl SqlxLikeRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn LikeRepository> {
        Arc::new(Self::new(pool))
    }
}

/// Column holding the target id
fn target_column(target: LikeTarget) -> &'static str {
    match target {
        LikeTarget::Publication(_) => "publication_id",
        LikeTarget::Comment(_) => "comment_id",
    }
}

/// Map a unique violation to [`DuplicateLikeError`], keep anything else.
fn map_insert_error(err: sqlx::Error, author_id: i64, target: LikeTarget) -> anyhow::Error {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            anyhow::Error::new(DuplicateLikeError { author_id, target })
        }
        other => anyhow::Error::new(other).context("Failed to create like"),
    }
}

#[async_trait]
impl LikeRepository for SqlxLikeRepository {
    async fn create(&self, author_id: i64, target: LikeTarget) -> Result<Like> {
        const SQL: &str =
            "INSERT INTO likes (author_id, publication_id, comment_id, date) VALUES (?, ?, ?, ?)";
        let (publication_id, comment_id) = target.columns();
        let now = Utc::now();

        let id = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query(SQL)
                .bind(author_id)
                .bind(publication_id)
                .bind(comment_id)
                .bind(now)
                .execute(pool)
                .await
                .map_err(|e| map_insert_error(e, author_id, target))?
                .last_insert_rowid(),
            Backend::Mysql(pool) => sqlx::query(SQL)
                .bind(author_id)
                .bind(publication_id)
                .bind(comment_id)
                .bind(now)
                .execute(pool)
                .await
                .map_err(|e| map_insert_error(e, author_id, target))?
                .last_insert_id() as i64,
        };

        Ok(Like {
            id,
            author_id,
            target,
            date: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Like>> {
        let sql = format!("{} WHERE id = ?", SELECT_LIKE);
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await
                    .context("Failed to get like by ID")?;
                row.as_ref().map(row_to_like_sqlite).transpose()
            }
            Backend::Mysql(pool) => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await
                    .context("Failed to get like by ID")?;
                row.as_ref().map(row_to_like_mysql).transpose()
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query("DELETE FROM likes WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete like")?
                .rows_affected(),
            Backend::Mysql(pool) => sqlx::query("DELETE FROM likes WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete like")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn count(&self, target: LikeTarget) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM likes WHERE {} = ?", target_column(target));
        let count: i64 = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query_scalar(&sql)
                .bind(target.id())
                .fetch_one(pool)
                .await
                .context("Failed to count likes")?,
            Backend::Mysql(pool) => sqlx::query_scalar(&sql)
                .bind(target.id())
                .fetch_one(pool)
                .await
                .context("Failed to count likes")?,
        };
        Ok(count)
    }

    async fn find(&self, author_id: i64, target: LikeTarget) -> Result<Option<Like>> {
        let sql = format!(
            "{} WHERE author_id = ? AND {} = ?",
            SELECT_LIKE,
            target_column(target)
        );
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let row = sqlx::query(&sql)
                    .bind(author_id)
                    .bind(target.id())
                    .fetch_optional(pool)
                    .await
                    .context("Failed to find like")?;
                row.as_ref().map(row_to_like_sqlite).transpose()
            }
            Backend::Mysql(pool) => {
                let row = sqlx::query(&sql)
                    .bind(author_id)
                    .bind(target.id())
                    .fetch_optional(pool)
                    .await
                    .context("Failed to find like")?;
                row.as_ref().map(row_to_like_mysql).transpose()
            }
        }
    }
}

fn row_to_like_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Like> {
    let id: i64 = row.try_get("id")?;
    let target = LikeTarget::from_columns(row.try_get("publication_id")?, row.try_get("comment_id")?)
        .ok_or_else(|| anyhow!("Like {} has no single target", id))?;

    Ok(Like {
        id,
        author_id: row.try_get("author_id")?,
        target,
        date: row.try_get("date")?,
    })
}

fn row_to_like_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Like> {
    let id: i64 = row.try_get("id")?;
    let target = LikeTarget::from_columns(row.try_get("publication_id")?, row.try_get("comment_id")?)
        .ok_or_else(|| anyhow!("Like {} has no single target", id))?;

    Ok(Like {
        id,
        author_id: row.try_get("author_id")?,
        target,
        date: row.try_get("date")?,
    })
}
