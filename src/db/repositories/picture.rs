//! Picture repository
//!
//! Stores photo references only. No file I/O happens here.

use crate::db::pool::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::Picture;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_PICTURE: &str = "SELECT id, author_id, publication_id, photo FROM pictures";

/// Picture repository trait
#[async_trait]
pub trait PictureRepository: Send + Sync {
    /// Store a new photo reference
    async fn create(
        &self,
        author_id: i64,
        publication_id: Option<i64>,
        photo: &str,
    ) -> Result<Picture>;

    /// Get picture by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Picture>>;

    /// Pictures attached to a publication
    async fn list_by_publication(&self, publication_id: i64) -> Result<Vec<Picture>>;

    /// Pictures uploaded by a user
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Picture>>;

    /// Delete a picture. Users using it as avatar keep a NULL avatar.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based picture repository implementation
pub struct SqlxPictureRepository {
    pool: DynDatabasePool,
}

impl SqlxPictureRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PictureRepository> {
        Arc::new(Self::new(pool))
    }

    async fn list_where(&self, column: &str, value: i64) -> Result<Vec<Picture>> {
        let sql = format!("{} WHERE {} = ? ORDER BY id", SELECT_PICTURE, column);
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(&sql)
                    .bind(value)
                    .fetch_all(pool)
                    .await
                    .with_context(|| format!("Failed to list pictures by {}", column))?;
                rows.iter().map(row_to_picture_sqlite).collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(&sql)
                    .bind(value)
                    .fetch_all(pool)
                    .await
                    .with_context(|| format!("Failed to list pictures by {}", column))?;
                rows.iter().map(row_to_picture_mysql).collect()
            }
        }
    }
}

#[async_trait]
impl PictureRepository for SqlxPictureRepository {
    async fn create(
        &self,
        author_id: i64,
        publication_id: Option<i64>,
        photo: &str,
    ) -> Result<Picture> {
        const SQL: &str = "INSERT INTO pictures (author_id, publication_id, photo) VALUES (?, ?, ?)";
        let id = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query(SQL)
                .bind(author_id)
                .bind(publication_id)
                .bind(photo)
                .execute(pool)
                .await
                .context("Failed to create picture")?
                .last_insert_rowid(),
            Backend::Mysql(pool) => sqlx::query(SQL)
                .bind(author_id)
                .bind(publication_id)
                .bind(photo)
                .execute(pool)
                .await
                .context("Failed to create picture")?
                .last_insert_id() as i64,
        };

        Ok(Picture {
            id,
            author_id,
            publication_id,
            photo: photo.to_string(),
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Picture>> {
        let sql = format!("{} WHERE id = ?", SELECT_PICTURE);
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => get_picture_sqlite(pool, &sql, id).await,
            Backend::Mysql(pool) => get_picture_mysql(pool, &sql, id).await,
        }
    }

    async fn list_by_publication(&self, publication_id: i64) -> Result<Vec<Picture>> {
        self.list_where("publication_id", publication_id).await
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Picture>> {
        self.list_where("author_id", author_id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query("DELETE FROM pictures WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete picture")?
                .rows_affected(),
            Backend::Mysql(pool) => sqlx::query("DELETE FROM pictures WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete picture")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }
}

async fn get_picture_sqlite(pool: &SqlitePool, sql: &str, id: i64) -> Result<Option<Picture>> {
    let row = sqlx::query(sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get picture by ID")?;

    row.as_ref().map(row_to_picture_sqlite).transpose()
}

fn row_to_picture_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Picture> {
    Ok(Picture {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        publication_id: row.try_get("publication_id")?,
        photo: row.try_get("photo")?,
    })
}

async fn get_picture_mysql(pool: &MySqlPool, sql: &str, id: i64) -> Result<Option<Picture>> {
    let row = sqlx::query(sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get picture by ID")?;

    row.as_ref().map(row_to_picture_mysql).transpose()
}

fn row_to_picture_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Picture> {
    Ok(Picture {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        publication_id: row.try_get("publication_id")?,
        photo: row.try_get("photo")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_publication, insert_user, setup_pool};

    #[tokio::test]
    async fn test_create_standalone_picture() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let repo = SqlxPictureRepository::new(pool.clone());

        let picture = repo.create(alice.id, None, "photo/me.jpg").await.unwrap();

        let found = repo.get_by_id(picture.id).await.unwrap().unwrap();
        assert_eq!(found.photo, "photo/me.jpg");
        assert!(found.publication_id.is_none());
    }

    #[tokio::test]
    async fn test_list_by_publication_and_author() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let publication = insert_publication(&pool, alice.id, "trip").await;
        let repo = SqlxPictureRepository::new(pool.clone());

        repo.create(alice.id, Some(publication.id), "photo/1.jpg")
            .await
            .unwrap();
        repo.create(alice.id, Some(publication.id), "photo/2.jpg")
            .await
            .unwrap();
        repo.create(alice.id, None, "photo/avatar.jpg").await.unwrap();

        let attached = repo.list_by_publication(publication.id).await.unwrap();
        assert_eq!(attached.len(), 2);
        assert_eq!(attached[0].photo, "photo/1.jpg");
        assert_eq!(repo.list_by_author(alice.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_picture() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let repo = SqlxPictureRepository::new(pool.clone());
        let picture = repo.create(alice.id, None, "photo/x.jpg").await.unwrap();

        assert!(repo.delete(picture.id).await.unwrap());
        assert!(repo.get_by_id(picture.id).await.unwrap().is_none());
        assert!(!repo.delete(picture.id).await.unwrap());
    }
}
