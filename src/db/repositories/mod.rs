//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository compiles query specifications for one aggregate and maps
//! the rows back into models.

pub mod post;
pub mod tag;

pub use post::{PostRepository, SqlxPostRepository};
pub use tag::{SqlxTagRepository, TagRepository};
