//! Content service
//!
//! Query operations the pages are built from. Each operation describes its
//! listing with a `PostQuery` or `TagQuery` and leaves execution to the
//! repositories, so the number of store round-trips stays constant no matter
//! how many posts are listed.

use crate::db::query::{PostQuery, TagQuery};
use crate::db::repositories::{PostRepository, TagRepository};
use crate::models::{Post, TagWithCount};
use std::sync::Arc;

/// Error types for content service operations
#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    /// Post or tag not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Content service for reading posts and tags
pub struct ContentService {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
}

impl ContentService {
    /// Create a new content service
    pub fn new(posts: Arc<dyn PostRepository>, tags: Arc<dyn TagRepository>) -> Self {
        Self { posts, tags }
    }

    /// Most liked posts, ties by ascending id
    pub async fn top_by_likes(&self, limit: u32) -> Result<Vec<Post>, ContentServiceError> {
        Ok(self.posts.find(&PostQuery::top_by_likes(limit)).await?)
    }

    /// Newest posts first
    pub async fn most_recent(&self, limit: u32) -> Result<Vec<Post>, ContentServiceError> {
        Ok(self.posts.find(&PostQuery::most_recent(limit)).await?)
    }

    /// Most used tags, each with the number of posts carrying it
    pub async fn top_tags(&self, limit: u32) -> Result<Vec<TagWithCount>, ContentServiceError> {
        Ok(self.tags.find(&TagQuery::popular(limit)).await?)
    }

    /// The post with this slug, comments and tags included
    ///
    /// # Errors
    /// - `NotFound` if no post has this slug
    pub async fn post_by_slug(&self, slug: &str) -> Result<Post, ContentServiceError> {
        self.posts
            .find_one(&PostQuery::by_slug(slug))
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("post '{}'", slug)))
    }

    /// Newest posts carrying the tag with this exact title
    ///
    /// # Errors
    /// - `NotFound` if no tag has this title
    pub async fn posts_for_tag(
        &self,
        title: &str,
        limit: u32,
    ) -> Result<(TagWithCount, Vec<Post>), ContentServiceError> {
        let tag = self
            .tags
            .get_by_title(title)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("tag '{}'", title)))?;

        let posts = self
            .posts
            .find(&PostQuery::for_tag(tag.tag.id, limit))
            .await?;

        Ok((tag, posts))
    }
}
