//! Subscription service

use crate::db::repositories::SubscriptionRepository;
use crate::models::{Subscription, SubscriptionInput};
use crate::services::is_missing_reference;
use anyhow::Context;
use std::sync::Arc;

/// Error types for subscription service operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Subscription service
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repo }
    }

    /// Subscribe a user to an author.
    ///
    /// Subscribing to oneself is allowed.
    pub async fn subscribe(
        &self,
        input: SubscriptionInput,
    ) -> Result<Subscription, SubscriptionServiceError> {
        let subscription = self
            .repo
            .create(input.author_id, input.subscriber_id)
            .await
            .map_err(|e| {
                if is_missing_reference(&e) {
                    SubscriptionServiceError::NotFound(format!(
                        "User {} or {}",
                        input.author_id, input.subscriber_id
                    ))
                } else {
                    SubscriptionServiceError::InternalError(e)
                }
            })?;

        tracing::info!("User {} subscribed to {}", input.subscriber_id, input.author_id);
        Ok(subscription)
    }

    /// Remove a subscription
    pub async fn unsubscribe(&self, id: i64) -> Result<(), SubscriptionServiceError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete subscription")?;

        if !deleted {
            return Err(SubscriptionServiceError::NotFound(format!("Subscription {}", id)));
        }
        Ok(())
    }

    pub async fn get(&self, id: i64) -> Result<Subscription, SubscriptionServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get subscription")?
            .ok_or_else(|| SubscriptionServiceError::NotFound(format!("Subscription {}", id)))
    }

    /// Who follows `author_id`
    pub async fn subscribers_of(
        &self,
        author_id: i64,
    ) -> Result<Vec<Subscription>, SubscriptionServiceError> {
        Ok(self
            .repo
            .list_by_author(author_id)
            .await
            .context("Failed to list subscribers")?)
    }

    /// Whom `subscriber_id` follows
    pub async fn subscriptions_of(
        &self,
        subscriber_id: i64,
    ) -> Result<Vec<Subscription>, SubscriptionServiceError> {
        Ok(self
            .repo
            .list_by_subscriber(subscriber_id)
            .await
            .context("Failed to list subscriptions")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{insert_user, setup_pool};
    use crate::db::repositories::SqlxSubscriptionRepository;

    #[tokio::test]
    async fn test_subscribe_and_query() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let service = SubscriptionService::new(SqlxSubscriptionRepository::boxed(pool.clone()));

        let sub = service
            .subscribe(SubscriptionInput {
                author_id: alice.id,
                subscriber_id: bob.id,
            })
            .await
            .unwrap();

        assert_eq!(service.get(sub.id).await.unwrap(), sub);
        assert_eq!(service.subscribers_of(alice.id).await.unwrap(), vec![sub.clone()]);
        assert_eq!(service.subscriptions_of(bob.id).await.unwrap(), vec![sub]);
        assert!(service.subscribers_of(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_to_missing_user() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let service = SubscriptionService::new(SqlxSubscriptionRepository::boxed(pool.clone()));

        let result = service
            .subscribe(SubscriptionInput {
                author_id: 777,
                subscriber_id: alice.id,
            })
            .await;
        assert!(matches!(result, Err(SubscriptionServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unsubscribe_twice() {
        let pool = setup_pool().await;
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let service = SubscriptionService::new(SqlxSubscriptionRepository::boxed(pool.clone()));
        let sub = service
            .subscribe(SubscriptionInput {
                author_id: alice.id,
                subscriber_id: bob.id,
            })
            .await
            .unwrap();

        service.unsubscribe(sub.id).await.unwrap();
        let again = service.unsubscribe(sub.id).await;
        assert!(matches!(again, Err(SubscriptionServiceError::NotFound(_))));
    }
}
