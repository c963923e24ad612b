//! Picture model
//!
//! A picture is a reference to a stored photo file. Pictures may belong to a
//! publication or stand alone (e.g. an avatar).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directory prefix under which photo references are stored
pub const PHOTO_PREFIX: &str = "photo/";

/// Maximum length of a stored photo reference, prefix included
pub const PHOTO_MAX_LEN: usize = 255;

/// Picture entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub id: i64,
    pub author_id: i64,
    pub publication_id: Option<i64>,
    /// Stored file reference, e.g. `photo/beach.jpg`
    pub photo: String,
}

impl fmt::Display for Picture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.photo)
    }
}

/// Input for creating a picture
#[derive(Debug, Clone, Deserialize)]
pub struct PictureInput {
    pub author_id: i64,
    #[serde(default)]
    pub publication_id: Option<i64>,
    pub photo: String,
}

/// Normalize a photo reference so it always lives under [`PHOTO_PREFIX`].
pub fn photo_path(photo: &str) -> String {
    let photo = photo.trim().trim_start_matches('/');
    if photo.starts_with(PHOTO_PREFIX) {
        photo.to_string()
    } else {
        format!("{}{}", PHOTO_PREFIX, photo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_path_adds_prefix() {
        assert_eq!(photo_path("beach.jpg"), "photo/beach.jpg");
        assert_eq!(photo_path("/beach.jpg"), "photo/beach.jpg");
    }

    #[test]
    fn test_photo_path_keeps_existing_prefix() {
        assert_eq!(photo_path("photo/beach.jpg"), "photo/beach.jpg");
    }
}
