//! Like model
//!
//! A like points at exactly one target, either a publication or a comment.
//! In the store this is two nullable columns of which exactly one is set;
//! in code it is the [`LikeTarget`] enum so the "exactly one" rule cannot be
//! broken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum LikeTarget {
    Publication(i64),
    Comment(i64),
}

impl LikeTarget {
    /// Rebuild a target from the two storage columns.
    ///
    /// Returns `None` unless exactly one of them is set.
    pub fn from_columns(publication_id: Option<i64>, comment_id: Option<i64>) -> Option<Self> {
        match (publication_id, comment_id) {
            (Some(id), None) => Some(Self::Publication(id)),
            (None, Some(id)) => Some(Self::Comment(id)),
            _ => None,
        }
    }

    /// Split into `(publication_id, comment_id)` storage columns.
    pub fn columns(&self) -> (Option<i64>, Option<i64>) {
        match *self {
            Self::Publication(id) => (Some(id), None),
            Self::Comment(id) => (None, Some(id)),
        }
    }

    /// Lowercase name of the target kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Publication(_) => "publication",
            Self::Comment(_) => "comment",
        }
    }

    pub fn id(&self) -> i64 {
        match *self {
            Self::Publication(id) | Self::Comment(id) => id,
        }
    }
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Like entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub id: i64,
    pub author_id: i64,
    pub target: LikeTarget,
    pub date: DateTime<Utc>,
}

impl fmt::Display for Like {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "like on {}", self.target)
    }
}

/// Input for creating a like
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLikeInput {
    pub author_id: i64,
    pub target: LikeTarget,
}

/// The author already likes this target
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("user {author_id} already likes {target}")]
pub struct DuplicateLikeError {
    pub author_id: i64,
    pub target: LikeTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_columns_roundtrip() {
        let publication = LikeTarget::Publication(4);
        let comment = LikeTarget::Comment(9);

        assert_eq!(publication.columns(), (Some(4), None));
        assert_eq!(comment.columns(), (None, Some(9)));
        assert_eq!(LikeTarget::from_columns(Some(4), None), Some(publication));
        assert_eq!(LikeTarget::from_columns(None, Some(9)), Some(comment));
    }

    #[test]
    fn test_target_from_invalid_columns() {
        assert_eq!(LikeTarget::from_columns(None, None), None);
        assert_eq!(LikeTarget::from_columns(Some(1), Some(2)), None);
    }

    #[test]
    fn test_like_display() {
        let like = Like {
            id: 1,
            author_id: 2,
            target: LikeTarget::Comment(5),
            date: Utc::now(),
        };
        assert_eq!(like.to_string(), "like on comment 5");
    }

    #[test]
    fn test_target_json_shape() {
        let json = serde_json::to_value(LikeTarget::Publication(3)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "publication", "id": 3}));

        let parsed: LikeTarget =
            serde_json::from_value(serde_json::json!({"type": "comment", "id": 8})).unwrap();
        assert_eq!(parsed, LikeTarget::Comment(8));
    }

    #[test]
    fn test_duplicate_error_message() {
        let err = DuplicateLikeError {
            author_id: 1,
            target: LikeTarget::Publication(2),
        };
        assert_eq!(err.to_string(), "user 1 already likes publication 2");
    }
}
