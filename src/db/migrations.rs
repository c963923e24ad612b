//! Database migrations module
//!
//! Code-based migrations for publica. Every migration is embedded as SQL
//! strings, one per backend, so the binary carries its own schema.
//!
//! # Usage
//!
//! ```ignore
//! use publica::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```
//!
//! Delete rules live in the schema as foreign key actions:
//! - everything a user authored cascades with the user
//! - comments, pictures, likes and tag links cascade with their publication
//! - likes cascade with their comment
//! - `users.avatar_id` is set to NULL when the avatar picture goes away

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::pool::{backend, Backend};
use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static str,
    /// SQL statements for MySQL
    pub up_mysql: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// All migrations, in application order.
pub const MIGRATIONS: &[Migration] = &[
    // SQLite accepts the forward reference to pictures; MySQL gets the avatar
    // constraint in migration 3 once pictures exists.
    Migration {
        version: 1,
        name: "create_users",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(128) NOT NULL,
                birthday DATE NOT NULL,
                registration_date DATE NOT NULL,
                email VARCHAR(254) NOT NULL,
                avatar_id INTEGER,
                description TEXT,
                FOREIGN KEY (avatar_id) REFERENCES pictures(id) ON DELETE SET NULL
            );
            CREATE INDEX IF NOT EXISTS idx_users_name ON users(name);
            CREATE INDEX IF NOT EXISTS idx_users_avatar_id ON users(avatar_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(128) NOT NULL,
                birthday DATE NOT NULL,
                registration_date DATE NOT NULL,
                email VARCHAR(254) NOT NULL,
                avatar_id BIGINT NULL,
                description TEXT NULL
            );
            CREATE INDEX idx_users_name ON users(name);
            CREATE INDEX idx_users_avatar_id ON users(avatar_id);
        "#,
    },
    Migration {
        version: 2,
        name: "create_publications",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS publications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL,
                title VARCHAR(1024),
                description TEXT,
                date TIMESTAMP NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_publications_author_id ON publications(author_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS publications (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                author_id BIGINT NOT NULL,
                title VARCHAR(1024) NULL,
                description TEXT NULL,
                date DATETIME(6) NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_publications_author_id ON publications(author_id);
        "#,
    },
    Migration {
        version: 3,
        name: "create_pictures",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS pictures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL,
                publication_id INTEGER,
                photo VARCHAR(255) NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (publication_id) REFERENCES publications(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_pictures_author_id ON pictures(author_id);
            CREATE INDEX IF NOT EXISTS idx_pictures_publication_id ON pictures(publication_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS pictures (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                author_id BIGINT NOT NULL,
                publication_id BIGINT NULL,
                photo VARCHAR(255) NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (publication_id) REFERENCES publications(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_pictures_author_id ON pictures(author_id);
            CREATE INDEX idx_pictures_publication_id ON pictures(publication_id);
            ALTER TABLE users ADD CONSTRAINT fk_users_avatar
                FOREIGN KEY (avatar_id) REFERENCES pictures(id) ON DELETE SET NULL;
        "#,
    },
    Migration {
        version: 4,
        name: "create_subscriptions",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL,
                subscriber_id INTEGER NOT NULL,
                date TIMESTAMP NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (subscriber_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_subscriptions_author_id ON subscriptions(author_id);
            CREATE INDEX IF NOT EXISTS idx_subscriptions_subscriber_id ON subscriptions(subscriber_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                author_id BIGINT NOT NULL,
                subscriber_id BIGINT NOT NULL,
                date DATETIME(6) NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (subscriber_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_subscriptions_author_id ON subscriptions(author_id);
            CREATE INDEX idx_subscriptions_subscriber_id ON subscriptions(subscriber_id);
        "#,
    },
    Migration {
        version: 5,
        name: "create_comments",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL,
                publication_id INTEGER NOT NULL,
                comment TEXT NOT NULL,
                date TIMESTAMP NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (publication_id) REFERENCES publications(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_comments_publication_id ON comments(publication_id);
            CREATE INDEX IF NOT EXISTS idx_comments_author_id ON comments(author_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS comments (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                author_id BIGINT NOT NULL,
                publication_id BIGINT NOT NULL,
                comment TEXT NOT NULL,
                date DATETIME(6) NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (publication_id) REFERENCES publications(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_comments_publication_id ON comments(publication_id);
            CREATE INDEX idx_comments_author_id ON comments(author_id);
        "#,
    },
    // Exactly one of publication_id / comment_id is set. MySQL rejects CHECK
    // constraints on columns with cascading foreign keys, so there the rule is
    // held by LikeTarget alone.
    Migration {
        version: 6,
        name: "create_likes",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS likes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL,
                publication_id INTEGER,
                comment_id INTEGER,
                date TIMESTAMP NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (publication_id) REFERENCES publications(id) ON DELETE CASCADE,
                FOREIGN KEY (comment_id) REFERENCES comments(id) ON DELETE CASCADE,
                CHECK ((publication_id IS NULL) <> (comment_id IS NULL)),
                UNIQUE (author_id, publication_id),
                UNIQUE (author_id, comment_id)
            );
            CREATE INDEX IF NOT EXISTS idx_likes_publication_id ON likes(publication_id);
            CREATE INDEX IF NOT EXISTS idx_likes_comment_id ON likes(comment_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS likes (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                author_id BIGINT NOT NULL,
                publication_id BIGINT NULL,
                comment_id BIGINT NULL,
                date DATETIME(6) NOT NULL,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (publication_id) REFERENCES publications(id) ON DELETE CASCADE,
                FOREIGN KEY (comment_id) REFERENCES comments(id) ON DELETE CASCADE,
                UNIQUE KEY uq_likes_author_publication (author_id, publication_id),
                UNIQUE KEY uq_likes_author_comment (author_id, comment_id)
            );
            CREATE INDEX idx_likes_publication_id ON likes(publication_id);
            CREATE INDEX idx_likes_comment_id ON likes(comment_id);
        "#,
    },
    Migration {
        version: 7,
        name: "create_tags",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(128)
            );
            CREATE TABLE IF NOT EXISTS publication_tags (
                publication_id INTEGER NOT NULL,
                tag_id INTEGER NOT NULL,
                PRIMARY KEY (publication_id, tag_id),
                FOREIGN KEY (publication_id) REFERENCES publications(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_publication_tags_tag_id ON publication_tags(tag_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS tags (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title VARCHAR(128) NULL
            );
            CREATE TABLE IF NOT EXISTS publication_tags (
                publication_id BIGINT NOT NULL,
                tag_id BIGINT NOT NULL,
                PRIMARY KEY (publication_id, tag_id),
                FOREIGN KEY (publication_id) REFERENCES publications(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
            CREATE INDEX idx_publication_tags_tag_id ON publication_tags(tag_id);
        "#,
    },
];

/// Run all pending migrations.
///
/// Returns the number of migrations applied. Already applied migrations are
/// skipped, so calling this on every startup is safe.
///
/// # Errors
///
/// Returns an error if any migration fails to apply
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

async fn get_applied_migrations(pool: &DynDatabasePool) -> Result<Vec<MigrationRecord>> {
    match backend(pool)? {
        Backend::Sqlite(pool) => get_applied_migrations_sqlite(pool).await,
        Backend::Mysql(pool) => get_applied_migrations_mysql(pool).await,
    }
}

async fn get_applied_migrations_sqlite(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;

    Ok(rows
        .iter()
        .map(|row| MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        })
        .collect())
}

async fn get_applied_migrations_mysql(pool: &MySqlPool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;

    Ok(rows
        .iter()
        .map(|row| MigrationRecord {
            version: row.get::<i32, _>("version") as i64,
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        })
        .collect())
}

async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match backend(pool)? {
        Backend::Sqlite(pool) => apply_migration_sqlite(pool, migration).await,
        Backend::Mysql(pool) => apply_migration_mysql(pool, migration).await,
    }
}

async fn apply_migration_sqlite(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_sqlite) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

async fn apply_migration_mysql(pool: &MySqlPool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_mysql) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    match sql.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &sql[..idx]),
        None => sql.to_string(),
    }
}

/// Split SQL into individual statements, skipping comment-only fragments
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty() && !is_comment_only(stmt))
        .collect()
}

/// Check if a string contains only SQL comments
fn is_comment_only(s: &str) -> bool {
    s.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

/// Check if migrations are up to date
pub async fn is_up_to_date(pool: &DynDatabasePool) -> Result<bool> {
    Ok(pending_count(pool).await? == 0)
}

/// Get pending migrations count
pub async fn pending_count(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    Ok(MIGRATIONS.len().saturating_sub(applied.len()))
}

/// Get the total number of migrations defined
pub fn total_migrations() -> usize {
    MIGRATIONS.len()
}

/// Get migration by version
pub fn get_migration(version: i32) -> Option<&'static Migration> {
    MIGRATIONS.iter().find(|m| m.version == version)
}
