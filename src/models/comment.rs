//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comment entity. Always attached to a publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    pub publication_id: i64,
    pub comment: String,
    pub date: DateTime<Utc>,
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.comment)
    }
}

/// Input for creating a comment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentInput {
    pub author_id: i64,
    pub publication_id: i64,
    pub comment: String,
}

/// Input for replacing a comment's text
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentInput {
    pub comment: String,
}

/// Comment with its like count, as produced by the comment ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentWithLikes {
    #[serde(flatten)]
    pub comment: Comment,
    pub like_count: i64,
}

impl CommentWithLikes {
    pub fn new(comment: Comment, like_count: i64) -> Self {
        Self {
            comment,
            like_count,
        }
    }
}
