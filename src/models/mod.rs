//! Data models
//!
//! Entities of the blog as the read side loads them: posts with their
//! authors, tags, comments and counts.

mod author;
mod comment;
mod post;
mod tag;

pub use author::Author;
pub use comment::Comment;
pub use post::Post;
pub use tag::{Tag, TagWithCount};
