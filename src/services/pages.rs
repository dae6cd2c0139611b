//! Page assembly
//!
//! One entry point per page. Each gathers the listings its template needs
//! from the `ContentService`, projects them into views and returns a page
//! context naming the template it renders with.

use crate::config::ListingConfig;
use crate::services::content::{ContentService, ContentServiceError};
use crate::services::projection::{PostDetailView, PostView, Projector, TagView};
use serde::Serialize;
use std::sync::Arc;

/// Render-ready data of one page
pub trait PageContext: Serialize {
    /// Template the page renders with
    fn template_name(&self) -> &'static str;

    /// Tera context built from the page's fields
    fn to_context(&self) -> Result<tera::Context, tera::Error> {
        tera::Context::from_serialize(self)
    }
}

/// Home page
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub most_popular_posts: Vec<PostView>,
    pub page_posts: Vec<PostView>,
    pub popular_tags: Vec<TagView>,
}

impl PageContext for IndexPage {
    fn template_name(&self) -> &'static str {
        "index.html"
    }
}

/// Single post with its comments
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailPage {
    pub post: PostDetailView,
    pub popular_tags: Vec<TagView>,
    pub most_popular_posts: Vec<PostView>,
}

impl PageContext for PostDetailPage {
    fn template_name(&self) -> &'static str {
        "post-details.html"
    }
}

/// Posts carrying one tag
#[derive(Debug, Clone, Serialize)]
pub struct TagFilterPage {
    pub tag: TagView,
    pub popular_tags: Vec<TagView>,
    pub posts: Vec<PostView>,
    pub most_popular_posts: Vec<PostView>,
}

impl PageContext for TagFilterPage {
    fn template_name(&self) -> &'static str {
        "posts-list.html"
    }
}

/// Static contacts page
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactsPage {}

impl PageContext for ContactsPage {
    fn template_name(&self) -> &'static str {
        "contacts.html"
    }
}

/// Page service assembling the four public pages
pub struct PageService {
    content: Arc<ContentService>,
    projector: Projector,
    listing: ListingConfig,
}

impl PageService {
    /// Create a new page service
    pub fn new(content: Arc<ContentService>, projector: Projector, listing: ListingConfig) -> Self {
        Self {
            content,
            projector,
            listing,
        }
    }

    /// Most liked posts, freshest posts and popular tags
    pub async fn list_index_page(&self) -> Result<IndexPage, ContentServiceError> {
        let most_popular = self.content.top_by_likes(self.listing.popular_posts).await?;
        let fresh = self.content.most_recent(self.listing.fresh_posts).await?;
        let tags = self.content.top_tags(self.listing.popular_tags).await?;

        Ok(IndexPage {
            most_popular_posts: self.projector.posts(&most_popular),
            page_posts: self.projector.posts(&fresh),
            popular_tags: self.projector.tags(&tags),
        })
    }

    /// Post with the given slug
    ///
    /// # Errors
    /// - `NotFound` if no post has this slug
    pub async fn get_post_detail(&self, slug: &str) -> Result<PostDetailPage, ContentServiceError> {
        let post = self.content.post_by_slug(slug).await?;
        let tags = self.content.top_tags(self.listing.popular_tags).await?;
        let most_popular = self.content.top_by_likes(self.listing.popular_posts).await?;

        Ok(PostDetailPage {
            post: self.projector.post_full(&post),
            popular_tags: self.projector.tags(&tags),
            most_popular_posts: self.projector.posts(&most_popular),
        })
    }

    /// Posts carrying the tag with the given title
    ///
    /// # Errors
    /// - `NotFound` if no tag has this title
    pub async fn filter_by_tag(&self, tag_title: &str) -> Result<TagFilterPage, ContentServiceError> {
        let (tag, posts) = self
            .content
            .posts_for_tag(tag_title, self.listing.tag_posts)
            .await?;
        let tags = self.content.top_tags(self.listing.popular_tags).await?;
        let most_popular = self.content.top_by_likes(self.listing.popular_posts).await?;

        Ok(TagFilterPage {
            tag: self.projector.tag(&tag),
            popular_tags: self.projector.tags(&tags),
            posts: self.projector.posts(&posts),
            most_popular_posts: self.projector.posts(&most_popular),
        })
    }

    /// Contacts page, no data needed
    pub async fn get_contacts_page(&self) -> Result<ContactsPage, ContentServiceError> {
        Ok(ContactsPage {})
    }
}
