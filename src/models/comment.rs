//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Author;

/// Comment left under a post, loaded together with its author
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: Author,
}
