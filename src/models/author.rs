//! Author model
//!
//! Authors are the site's users as seen by the read side: only the display
//! name is ever shown.

use serde::{Deserialize, Serialize};

/// User that wrote a post, a comment or left a like
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub username: String,
}
