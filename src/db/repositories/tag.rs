//! Tag repository
//!
//! Database operations for tags and their links to publications.
//!
//! This module provides:
//! - `TagRepository` trait defining the interface for tag data access
//! - `SqlxTagRepository` implementing the trait for SQLite and MySQL

use super::publication::{row_to_publication_mysql, row_to_publication_sqlite};
use crate::db::pool::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::{Publication, Tag};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Create a new tag
    async fn create(&self, tag: &Tag) -> Result<Tag>;

    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// List all tags ordered by title
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Replace the tag title
    async fn update(&self, tag: &Tag) -> Result<Option<Tag>>;

    /// Delete a tag. Publications keep existing.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Link tag and publication. Linking twice is a no-op.
    async fn add_to_publication(&self, tag_id: i64, publication_id: i64) -> Result<()>;

    /// Remove the link between tag and publication
    async fn remove_from_publication(&self, tag_id: i64, publication_id: i64) -> Result<bool>;

    /// Tags of a publication
    async fn get_by_publication_id(&self, publication_id: i64) -> Result<Vec<Tag>>;

    /// Publications carrying a tag, newest first
    async fn get_publications(&self, tag_id: i64) -> Result<Vec<Publication>>;
}

/// SQLx-based tag repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, tag: &Tag) -> Result<Tag> {
        let id = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query("INSERT INTO tags (title) VALUES (?)")
                .bind(&tag.title)
                .execute(pool)
                .await
                .context("Failed to create tag")?
                .last_insert_rowid(),
            Backend::Mysql(pool) => sqlx::query("INSERT INTO tags (title) VALUES (?)")
                .bind(&tag.title)
                .execute(pool)
                .await
                .context("Failed to create tag")?
                .last_insert_id() as i64,
        };

        Ok(Tag {
            id,
            title: tag.title.clone(),
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => get_tag_by_id_sqlite(pool, id).await,
            Backend::Mysql(pool) => get_tag_by_id_mysql(pool, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        const SQL: &str = "SELECT id, title FROM tags ORDER BY title, id";
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(SQL)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list tags")?;
                rows.iter().map(row_to_tag_sqlite).collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(SQL)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list tags")?;
                rows.iter().map(row_to_tag_mysql).collect()
            }
        }
    }

    async fn update(&self, tag: &Tag) -> Result<Option<Tag>> {
        const SQL: &str = "UPDATE tags SET title = ? WHERE id = ?";
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                sqlx::query(SQL)
                    .bind(&tag.title)
                    .bind(tag.id)
                    .execute(pool)
                    .await
                    .context("Failed to update tag")?;
                get_tag_by_id_sqlite(pool, tag.id).await
            }
            Backend::Mysql(pool) => {
                sqlx::query(SQL)
                    .bind(&tag.title)
                    .bind(tag.id)
                    .execute(pool)
                    .await
                    .context("Failed to update tag")?;
                get_tag_by_id_mysql(pool, tag.id).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        // publication_tags rows go with it (ON DELETE CASCADE)
        let affected = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query("DELETE FROM tags WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete tag")?
                .rows_affected(),
            Backend::Mysql(pool) => sqlx::query("DELETE FROM tags WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete tag")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn add_to_publication(&self, tag_id: i64, publication_id: i64) -> Result<()> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                sqlx::query(
                    "INSERT OR IGNORE INTO publication_tags (publication_id, tag_id) VALUES (?, ?)",
                )
                .bind(publication_id)
                .bind(tag_id)
                .execute(pool)
                .await
                .context("Failed to add tag to publication")?;
            }
            Backend::Mysql(pool) => {
                // INSERT IGNORE would also swallow foreign key failures
                sqlx::query(
                    r#"
                    INSERT INTO publication_tags (publication_id, tag_id) VALUES (?, ?)
                    ON DUPLICATE KEY UPDATE tag_id = tag_id
                    "#,
                )
                .bind(publication_id)
                .bind(tag_id)
                .execute(pool)
                .await
                .context("Failed to add tag to publication")?;
            }
        }
        Ok(())
    }

    async fn remove_from_publication(&self, tag_id: i64, publication_id: i64) -> Result<bool> {
        const SQL: &str = "DELETE FROM publication_tags WHERE publication_id = ? AND tag_id = ?";
        let affected = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query(SQL)
                .bind(publication_id)
                .bind(tag_id)
                .execute(pool)
                .await
                .context("Failed to remove tag from publication")?
                .rows_affected(),
            Backend::Mysql(pool) => sqlx::query(SQL)
                .bind(publication_id)
                .bind(tag_id)
                .execute(pool)
                .await
                .context("Failed to remove tag from publication")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn get_by_publication_id(&self, publication_id: i64) -> Result<Vec<Tag>> {
        const SQL: &str = r#"
            SELECT t.id, t.title
            FROM tags t
            INNER JOIN publication_tags pt ON t.id = pt.tag_id
            WHERE pt.publication_id = ?
            ORDER BY t.title, t.id
        "#;
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(SQL)
                    .bind(publication_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to get tags by publication")?;
                rows.iter().map(row_to_tag_sqlite).collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(SQL)
                    .bind(publication_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to get tags by publication")?;
                rows.iter().map(row_to_tag_mysql).collect()
            }
        }
    }

    async fn get_publications(&self, tag_id: i64) -> Result<Vec<Publication>> {
        const SQL: &str = r#"
            SELECT p.id, p.author_id, p.title, p.description, p.date
            FROM publications p
            INNER JOIN publication_tags pt ON p.id = pt.publication_id
            WHERE pt.tag_id = ?
            ORDER BY p.date DESC, p.id DESC
        "#;
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(SQL)
                    .bind(tag_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to get publications by tag")?;
                rows.iter().map(row_to_publication_sqlite).collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(SQL)
                    .bind(tag_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to get publications by tag")?;
                rows.iter().map(row_to_publication_mysql).collect()
            }
        }
    }
}

async fn get_tag_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, title FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by ID")?;

    row.as_ref().map(row_to_tag_sqlite).transpose()
}

fn row_to_tag_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
    })
}

async fn get_tag_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, title FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get tag by ID")?;

    row.as_ref().map(row_to_tag_mysql).transpose()
}

fn row_to_tag_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
    })
}
