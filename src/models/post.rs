//! Post model
//!
//! A `Post` is loaded as an aggregate: the row itself, its author, the
//! comment and like counts, and, when the query asked for them, the post's
//! tags and comments. Everything a page needs is resident once a post has
//! been returned by the repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, Comment, TagWithCount};

/// Blog post with its resolved relations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// Full post text
    pub text: String,
    /// Unique URL-safe identifier, key of the detail page
    pub slug: String,
    /// Image path relative to the media root
    pub image: Option<String>,
    /// Publication timestamp
    pub published_at: DateTime<Utc>,
    /// Post author
    pub author: Author,
    /// Number of comments under the post
    pub comments_count: i64,
    /// Number of likes the post received
    pub likes_count: i64,
    /// Tags ordered by title; empty unless the query requested tags
    #[serde(default)]
    pub tags: Vec<TagWithCount>,
    /// Comments, oldest first; empty unless the query requested comments
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// First tag of the post, if it has any
    pub fn first_tag(&self) -> Option<&TagWithCount> {
        self.tags.first()
    }

    /// Whether the post carries the tag with this id
    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tags.iter().any(|t| t.tag.id == tag_id)
    }
}
