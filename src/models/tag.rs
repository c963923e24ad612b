//! Tag model
//!
//! Tags are linked to publications many-to-many through `publication_tags`.
//! Deleting either side removes only the link.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a tag title
pub const TAG_TITLE_MAX_LEN: usize = 128;

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Optional title
    pub title: Option<String>,
}

impl Tag {
    /// Create a new Tag.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(title: Option<String>) -> Self {
        Self {
            id: 0, // Will be set by the database
            title,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title.as_deref().unwrap_or_default())
    }
}

/// Input for creating or replacing a tag
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagInput {
    #[serde(default)]
    pub title: Option<String>,
}
