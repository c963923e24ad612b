//! Publication model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a publication title
pub const PUBLICATION_TITLE_MAX_LEN: usize = 1024;

/// A user-authored post.
///
/// Deleting a publication removes its comments, pictures, likes and tag
/// links; the tags themselves are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// Unique identifier
    pub id: i64,
    /// Author (users.id)
    pub author_id: i64,
    /// Optional title
    pub title: Option<String>,
    /// Optional body text
    pub description: Option<String>,
    /// Creation timestamp, set once on insert
    pub date: DateTime<Utc>,
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title.as_deref().unwrap_or_default())
    }
}

/// Input for creating or replacing a publication
#[derive(Debug, Clone, Deserialize)]
pub struct PublicationInput {
    pub author_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Publication together with the number of likes it received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationWithLikes {
    #[serde(flatten)]
    pub publication: Publication,
    pub like_count: i64,
}

impl PublicationWithLikes {
    pub fn new(publication: Publication, like_count: i64) -> Self {
        Self {
            publication,
            like_count,
        }
    }
}
