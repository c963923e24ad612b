//! User repository
//!
//! Database operations for users.
//!
//! This module provides:
//! - `UserRepository` trait defining the interface for user data access
//! - `SqlxUserRepository` implementing the trait for SQLite and MySQL

use crate::db::pool::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_USER: &str = r#"
    SELECT id, name, birthday, registration_date, email, avatar_id, description
    FROM users
"#;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// List all users ordered by name
    async fn list(&self) -> Result<Vec<User>>;

    /// Replace every stored field of the user with the given record.
    ///
    /// Returns `None` if the user does not exist.
    async fn update(&self, user: &User) -> Result<Option<User>>;

    /// Delete a user and everything they authored.
    ///
    /// Returns `false` if no such user existed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based user repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => create_user_sqlite(pool, user).await,
            Backend::Mysql(pool) => create_user_mysql(pool, user).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => get_user_by_id_sqlite(pool, id).await,
            Backend::Mysql(pool) => get_user_by_id_mysql(pool, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<User>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => list_users_sqlite(pool).await,
            Backend::Mysql(pool) => list_users_mysql(pool).await,
        }
    }

    async fn update(&self, user: &User) -> Result<Option<User>> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => update_user_sqlite(pool, user).await,
            Backend::Mysql(pool) => update_user_mysql(pool, user).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => delete_user_sqlite(pool, id).await,
            Backend::Mysql(pool) => delete_user_mysql(pool, id).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_user_sqlite(pool: &SqlitePool, user: &User) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (name, birthday, registration_date, email, avatar_id, description)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.name)
    .bind(user.birthday)
    .bind(user.registration_date)
    .bind(&user.email)
    .bind(user.avatar_id)
    .bind(&user.description)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_rowid(),
        ..user.clone()
    })
}

async fn get_user_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_USER))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by ID")?;

    row.as_ref().map(row_to_user_sqlite).transpose()
}

async fn list_users_sqlite(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("{} ORDER BY name, id", SELECT_USER))
        .fetch_all(pool)
        .await
        .context("Failed to list users")?;

    rows.iter().map(row_to_user_sqlite).collect()
}

async fn update_user_sqlite(pool: &SqlitePool, user: &User) -> Result<Option<User>> {
    sqlx::query(
        r#"
        UPDATE users
        SET name = ?, birthday = ?, registration_date = ?, email = ?, avatar_id = ?, description = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.name)
    .bind(user.birthday)
    .bind(user.registration_date)
    .bind(&user.email)
    .bind(user.avatar_id)
    .bind(&user.description)
    .bind(user.id)
    .execute(pool)
    .await
    .context("Failed to update user")?;

    get_user_by_id_sqlite(pool, user.id).await
}

async fn delete_user_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete user")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_user_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        birthday: row.try_get("birthday")?,
        registration_date: row.try_get("registration_date")?,
        email: row.try_get("email")?,
        avatar_id: row.try_get("avatar_id")?,
        description: row.try_get("description")?,
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_user_mysql(pool: &MySqlPool, user: &User) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (name, birthday, registration_date, email, avatar_id, description)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.name)
    .bind(user.birthday)
    .bind(user.registration_date)
    .bind(&user.email)
    .bind(user.avatar_id)
    .bind(&user.description)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_id() as i64,
        ..user.clone()
    })
}

async fn get_user_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_USER))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user by ID")?;

    row.as_ref().map(row_to_user_mysql).transpose()
}

async fn list_users_mysql(pool: &MySqlPool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("{} ORDER BY name, id", SELECT_USER))
        .fetch_all(pool)
        .await
        .context("Failed to list users")?;

    rows.iter().map(row_to_user_mysql).collect()
}

async fn update_user_mysql(pool: &MySqlPool, user: &User) -> Result<Option<User>> {
    sqlx::query(
        r#"
        UPDATE users
        SET name = ?, birthday = ?, registration_date = ?, email = ?, avatar_id = ?, description = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.name)
    .bind(user.birthday)
    .bind(user.registration_date)
    .bind(&user.email)
    .bind(user.avatar_id)
    .bind(&user.description)
    .bind(user.id)
    .execute(pool)
    .await
    .context("Failed to update user")?;

    get_user_by_id_mysql(pool, user.id).await
}

/// InnoDB refuses a cascade that comes back around to `users` through
/// `pictures.author_id` and `users.avatar_id`, so avatars pointing at the
/// pictures about to disappear are cleared first.
async fn delete_user_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    sqlx::query(
        r#"
        UPDATE users SET avatar_id = NULL
        WHERE avatar_id IN (
            SELECT pic.id FROM pictures pic
            LEFT JOIN publications p ON pic.publication_id = p.id
            WHERE pic.author_id = ? OR p.author_id = ?
        )
        "#,
    )
    .bind(id)
    .bind(id)
    .execute(&mut *tx)
    .await
    .context("Failed to clear avatars")?;

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete user")?;

    tx.commit().await.context("Failed to commit user deletion")?;

    Ok(result.rows_affected() > 0)
}

fn row_to_user_mysql(row: &sqlx::mysql::MySqlRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        birthday: row.try_get("birthday")?,
        registration_date: row.try_get("registration_date")?,
        email: row.try_get("email")?,
        avatar_id: row.try_get("avatar_id")?,
        description: row.try_get("description")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{
        insert_comment, insert_publication, setup_pool, user_input,
    };
    use crate::db::repositories::{
        CommentRepository, PictureRepository, PublicationRepository, SqlxCommentRepository,
        SqlxPictureRepository, SqlxPublicationRepository,
    };

    async fn setup_test_repo() -> (DynDatabasePool, SqlxUserRepository) {
        let pool = setup_pool().await;
        let repo = SqlxUserRepository::new(pool.clone());
        (pool, repo)
    }

    #[tokio::test]
    async fn test_create_user() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&User::new(user_input("alice")))
            .await
            .expect("Failed to create user");

        assert!(created.id > 0);
        assert_eq!(created.name, "alice");
        assert_eq!(created.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create(&User::new(user_input("alice"))).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let (_pool, repo) = setup_test_repo().await;

        let found = repo.get_by_id(999).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_users_ordered_by_name() {
        let (_pool, repo) = setup_test_repo().await;
        for name in ["carol", "alice", "bob"] {
            repo.create(&User::new(user_input(name))).await.unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_update_user_replaces_fields() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create(&User::new(user_input("alice"))).await.unwrap();

        let mut input = user_input("alicia");
        input.description = Some("traveller".to_string());
        let updated = repo
            .update(&created.replaced_with(input))
            .await
            .unwrap()
            .expect("User should exist");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "alicia");
        assert_eq!(updated.description.as_deref(), Some("traveller"));
        assert_eq!(updated.registration_date, created.registration_date);
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let (_pool, repo) = setup_test_repo().await;
        let mut ghost = User::new(user_input("ghost"));
        ghost.id = 42;

        assert!(repo.update(&ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create(&User::new(user_input("alice"))).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(!repo.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_user_removes_authored_content() {
        let (pool, repo) = setup_test_repo().await;
        let alice = repo.create(&User::new(user_input("alice"))).await.unwrap();
        let bob = repo.create(&User::new(user_input("bob"))).await.unwrap();

        let bobs_post = insert_publication(&pool, bob.id, "bob's post").await;
        let alices_post = insert_publication(&pool, alice.id, "alice's post").await;
        let comment = insert_comment(&pool, alice.id, bobs_post.id, "nice").await;

        repo.delete(alice.id).await.unwrap();

        let publications = SqlxPublicationRepository::new(pool.clone());
        let comments = SqlxCommentRepository::new(pool.clone());
        assert!(publications.get_by_id(alices_post.id).await.unwrap().is_none());
        assert!(publications.get_by_id(bobs_post.id).await.unwrap().is_some());
        assert!(comments.get_by_id(comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_avatar_cleared_when_picture_deleted() {
        let (pool, repo) = setup_test_repo().await;
        let alice = repo.create(&User::new(user_input("alice"))).await.unwrap();

        let pictures = SqlxPictureRepository::new(pool.clone());
        let avatar = pictures
            .create(alice.id, None, "photo/me.jpg")
            .await
            .unwrap();

        let mut with_avatar = alice.clone();
        with_avatar.avatar_id = Some(avatar.id);
        let updated = repo.update(&with_avatar).await.unwrap().unwrap();
        assert_eq!(updated.avatar_id, Some(avatar.id));

        pictures.delete(avatar.id).await.unwrap();

        let reloaded = repo.get_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(reloaded.avatar_id, None);
    }
}
