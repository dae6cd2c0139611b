//! Services layer - Business logic
//!
//! This module contains the read-side services of the Sensive blog.
//! Services are responsible for:
//! - Describing listings as query specifications (`content`)
//! - Mapping loaded entities into template views (`projection`)
//! - Assembling the four public pages (`pages`)

pub mod content;
pub mod pages;
pub mod projection;

pub use content::{ContentService, ContentServiceError};
pub use pages::{ContactsPage, IndexPage, PageContext, PageService, PostDetailPage, TagFilterPage};
pub use projection::{teaser, CommentView, PostDetailView, PostView, Projector, TagView};
