//! Database layer
//!
//! Database abstraction for publica. It supports:
//! - SQLite (default, single file or in-memory)
//! - MySQL
//!
//! The driver is selected from configuration. Repositories hold a
//! [`DynDatabasePool`] and pick the SQL dialect through [`pool::backend`].
//!
//! # Usage
//!
//! ```ignore
//! use publica::config::DatabaseConfig;
//! use publica::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    backend, create_pool, create_test_pool, Backend, DatabasePool, DynDatabasePool,
    MysqlDatabase, SqliteDatabase,
};
