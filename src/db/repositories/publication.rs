//! Publication repository
//!
//! Database operations for publications. Deleting a publication relies on
//! the schema to drop its comments, pictures, likes and tag links.

use crate::db::pool::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::{Publication, PublicationInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_PUBLICATION: &str = r#"
    SELECT id, author_id, title, description, date
    FROM publications
"#;

/// Publication repository trait
#[async_trait]
pub trait PublicationRepository: Send + Sync {
    /// Create a new publication dated now
    async fn create(&self, input: &PublicationInput) -> Result<Publication>;

    /// Get publication by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Publication>>;

    /// List all publications, newest first
    async fn list(&self) -> Result<Vec<Publication>>;

    /// List publications by one author, newest first
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Publication>>;

    /// Replace author, title and description. The date is kept.
    async fn update(&self, id: i64, input: &PublicationInput) -> Result<Option<Publication>>;

    /// Delete a publication
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based publication repository implementation
pub struct SqlxPublicationRepository {
    pool: DynDatabasePool,
}

impl SqlxPublicationRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PublicationRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PublicationRepository for SqlxPublicationRepository {
    async fn create(&self, input: &PublicationInput) -> Result<Publication> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => create_publication_sqlite(pool, input).await,
            Backend::Mysql(pool) => create_publication_mysql(pool, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Publication>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => get_publication_by_id_sqlite(pool, id).await,
            Backend::Mysql(pool) => get_publication_by_id_mysql(pool, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Publication>> {
        let sql = format!("{} ORDER BY date DESC, id DESC", SELECT_PUBLICATION);
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(&sql)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list publications")?;
                rows.iter().map(row_to_publication_sqlite).collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(&sql)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list publications")?;
                rows.iter().map(row_to_publication_mysql).collect()
            }
        }
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Publication>> {
        let sql = format!(
            "{} WHERE author_id = ? ORDER BY date DESC, id DESC",
            SELECT_PUBLICATION
        );
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(&sql)
                    .bind(author_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list publications by author")?;
                rows.iter().map(row_to_publication_sqlite).collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(&sql)
                    .bind(author_id)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list publications by author")?;
                rows.iter().map(row_to_publication_mysql).collect()
            }
        }
    }

    async fn update(&self, id: i64, input: &PublicationInput) -> Result<Option<Publication>> {
        const SQL: &str =
            "UPDATE publications SET author_id = ?, title = ?, description = ? WHERE id = ?";
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                sqlx::query(SQL)
                    .bind(input.author_id)
                    .bind(&input.title)
                    .bind(&input.description)
                    .bind(id)
                    .execute(pool)
                    .await
                    .context("Failed to update publication")?;
                get_publication_by_id_sqlite(pool, id).await
            }
            Backend::Mysql(pool) => {
                sqlx::query(SQL)
                    .bind(input.author_id)
                    .bind(&input.title)
                    .bind(&input.description)
                    .bind(id)
                    .execute(pool)
                    .await
                    .context("Failed to update publication")?;
                get_publication_by_id_mysql(pool, id).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query("DELETE FROM publications WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete publication")?
                .rows_affected(),
            Backend::Mysql(pool) => sqlx::query("DELETE FROM publications WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete publication")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_publication_sqlite(
    pool: &SqlitePool,
    input: &PublicationInput,
) -> Result<Publication> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO publications (author_id, title, description, date)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(input.author_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create publication")?;

    Ok(Publication {
        id: result.last_insert_rowid(),
        author_id: input.author_id,
        title: input.title.clone(),
        description: input.description.clone(),
        date: now,
    })
}

async fn get_publication_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Publication>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_PUBLICATION))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get publication by ID")?;

    row.as_ref().map(row_to_publication_sqlite).transpose()
}

pub(crate) fn row_to_publication_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Publication> {
    Ok(Publication {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        date: row.try_get("date")?,
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_publication_mysql(
    pool: &MySqlPool,
    input: &PublicationInput,
) -> Result<Publication> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO publications (author_id, title, description, date)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(input.author_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create publication")?;

    Ok(Publication {
        id: result.last_insert_id() as i64,
        author_id: input.author_id,
        title: input.title.clone(),
        description: input.description.clone(),
        date: now,
    })
}

async fn get_publication_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Publication>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_PUBLICATION))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get publication by ID")?;

    row.as_ref().map(row_to_publication_mysql).transpose()
}

pub(crate) fn row_to_publication_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Publication> {
    Ok(Publication {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        date: row.try_get("date")?,
    })
}
