//! Subscription repository

use crate::db::pool::{backend, Backend};
use crate::db::DynDatabasePool;
use crate::models::Subscription;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

const SELECT_SUBSCRIPTION: &str =
    "SELECT id, author_id, subscriber_id, date FROM subscriptions";

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Subscribe `subscriber_id` to `author_id`
    async fn create(&self, author_id: i64, subscriber_id: i64) -> Result<Subscription>;

    /// Get subscription by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>>;

    /// Delete a subscription
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Subscriptions where the user is the author (their subscribers)
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Subscription>>;

    /// Subscriptions where the user is the subscriber
    async fn list_by_subscriber(&self, subscriber_id: i64) -> Result<Vec<Subscription>>;
}

/// SQLx-based subscription repository implementation
pub struct SqlxSubscriptionRepository {
    pool: DynDatabasePool,
}

impl SqlxSubscriptionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SubscriptionRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch(&self, filter: &str, value: i64) -> Result<Vec<Subscription>> {
        let sql = format!("{} WHERE {} ORDER BY date, id", SELECT_SUBSCRIPTION, filter);
        match backend(&self.pool)? {
            Backend::Sqlite(pool) => {
                let rows = sqlx::query(&sql)
                    .bind(value)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list subscriptions")?;
                rows.iter().map(row_to_subscription_sqlite).collect()
            }
            Backend::Mysql(pool) => {
                let rows = sqlx::query(&sql)
                    .bind(value)
                    .fetch_all(pool)
                    .await
                    .context("Failed to list subscriptions")?;
                rows.iter().map(row_to_subscription_mysql).collect()
            }
        }
    }
}

#[async_trait]
impl SubscriptionRepository for SqlxSubscriptionRepository {
    async fn create(&self, author_id: i64, subscriber_id: i64) -> Result<Subscription> {
        const SQL: &str =
            "INSERT INTO subscriptions (author_id, subscriber_id, date) VALUES (?, ?, ?)";
        let now = Utc::now();

        let id = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query(SQL)
                .bind(author_id)
                .bind(subscriber_id)
                .bind(now)
                .execute(pool)
                .await
                .context("Failed to create subscription")?
                .last_insert_rowid(),
            Backend::Mysql(pool) => sqlx::query(SQL)
                .bind(author_id)
                .bind(subscriber_id)
                .bind(now)
                .execute(pool)
                .await
                .context("Failed to create subscription")?
                .last_insert_id() as i64,
        };

        Ok(Subscription {
            id,
            author_id,
            subscriber_id,
            date: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>> {
        Ok(self.fetch("id = ?", id).await?.into_iter().next())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match backend(&self.pool)? {
            Backend::Sqlite(pool) => sqlx::query("DELETE FROM subscriptions WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete subscription")?
                .rows_affected(),
            Backend::Mysql(pool) => sqlx::query("DELETE FROM subscriptions WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await
                .context("Failed to delete subscription")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Subscription>> {
        self.fetch("author_id = ?", author_id).await
    }

    async fn list_by_subscriber(&self, subscriber_id: i64) -> Result<Vec<Subscription>> {
        self.fetch("subscriber_id = ?", subscriber_id).await
    }
}

fn row_to_subscription_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Subscription> {
    Ok(Subscription {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        subscriber_id: row.try_get("subscriber_id")?,
        date: row.try_get("date")?,
    })
}

fn row_to_subscription_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Subscription> {
    Ok(Subscription {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        subscriber_id: row.try_get("subscriber_id")?,
        date: row.try_get("date")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_user, setup_pool};
    use crate::db::repositories::{SqlxUserRepository, UserRepository};

    #[tokio::test]
    async fn test_subscribe_and_list_both_directions() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let carol = insert_user(&pool, "carol").await;
        let repo = SqlxSubscriptionRepository::new(pool.clone());

        let sub = repo.create(alice.id, bob.id).await.unwrap();
        repo.create(alice.id, carol.id).await.unwrap();
        repo.create(bob.id, carol.id).await.unwrap();

        assert_eq!(sub.to_string(), format!("{}-{}", alice.id, bob.id));
        assert_eq!(repo.list_by_author(alice.id).await.unwrap().len(), 2);
        assert_eq!(repo.list_by_subscriber(carol.id).await.unwrap().len(), 2);
        assert_eq!(repo.get_by_id(sub.id).await.unwrap(), Some(sub));
    }

    #[tokio::test]
    async fn test_self_subscription_allowed() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let repo = SqlxSubscriptionRepository::new(pool.clone());

        assert!(repo.create(alice.id, alice.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let repo = SqlxSubscriptionRepository::new(pool.clone());
        let sub = repo.create(alice.id, bob.id).await.unwrap();

        assert!(repo.delete(sub.id).await.unwrap());
        assert!(repo.get_by_id(sub.id).await.unwrap().is_none());
        assert!(!repo.delete(sub.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_deleting_either_user_removes_subscription() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let carol = insert_user(&pool, "carol").await;
        let repo = SqlxSubscriptionRepository::new(pool.clone());
        let as_author = repo.create(alice.id, bob.id).await.unwrap();
        let as_subscriber = repo.create(carol.id, alice.id).await.unwrap();

        SqlxUserRepository::new(pool.clone())
            .delete(alice.id)
            .await
            .unwrap();

        assert!(repo.get_by_id(as_author.id).await.unwrap().is_none());
        assert!(repo.get_by_id(as_subscriber.id).await.unwrap().is_none());
    }
}
