//! User model
//!
//! A user owns publications, pictures, comments, likes and subscriptions;
//! deleting the user removes all of them.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a user name
pub const USER_NAME_MAX_LEN: usize = 128;

/// Maximum length of an email address
pub const EMAIL_MAX_LEN: usize = 254;

/// User entity.
///
/// Listings of users are ordered by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Display name (non-empty)
    pub name: String,
    /// Date of birth
    pub birthday: NaiveDate,
    /// Date the account was registered
    pub registration_date: NaiveDate,
    /// Email address
    pub email: String,
    /// Picture used as avatar. Cleared when that picture is deleted.
    pub avatar_id: Option<i64>,
    /// Free-form profile text
    pub description: Option<String>,
}

impl User {
    /// Build a user from input. The id is assigned by the database.
    pub fn new(input: UserInput) -> Self {
        Self {
            id: 0,
            name: input.name,
            birthday: input.birthday,
            registration_date: input
                .registration_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            email: input.email,
            avatar_id: input.avatar_id,
            description: input.description,
        }
    }

    /// Replace every mutable field with the given input, keeping the id.
    pub fn replaced_with(&self, input: UserInput) -> Self {
        Self {
            id: self.id,
            registration_date: input.registration_date.unwrap_or(self.registration_date),
            ..Self::new(input)
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Input for creating or replacing a user
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub birthday: NaiveDate,
    /// Defaults to today on create, and to the stored value on replace
    #[serde(default)]
    pub registration_date: Option<NaiveDate>,
    pub email: String,
    #[serde(default)]
    pub avatar_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}
