//! Subscription model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A subscriber following an author. Removed when either user is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub author_id: i64,
    pub subscriber_id: i64,
    pub date: DateTime<Utc>,
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.author_id, self.subscriber_id)
    }
}

/// Input for creating a subscription
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionInput {
    pub author_id: i64,
    pub subscriber_id: i64,
}
