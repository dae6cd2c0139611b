//! Tag model
//!
//! Tags group posts across the blog. A tag's title is unique and is the key
//! of the tag filter page.

use serde::{Deserialize, Serialize};

/// Tag entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Unique tag title
    pub title: String,
}

/// Tag together with the number of posts carrying it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagWithCount {
    /// The tag itself
    #[serde(flatten)]
    pub tag: Tag,
    /// Number of posts with this tag
    pub posts_count: i64,
}

impl TagWithCount {
    /// Create a new TagWithCount
    pub fn new(tag: Tag, posts_count: i64) -> Self {
        Self { tag, posts_count }
    }
}
