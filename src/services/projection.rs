//! Projection of loaded entities into view models
//!
//! Views are what the templates see. Building them is pure: everything a
//! view needs was loaded with the post, so nothing here reaches the store.

use crate::config::{ListingConfig, MediaConfig};
use crate::models::{Comment, Post, TagWithCount};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Tag as shown in tag blocks and on post cards
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagView {
    pub title: String,
    pub posts_with_tag: i64,
}

/// Post card in a listing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostView {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagView>,
    pub first_tag_title: Option<String>,
}

/// Comment under a post
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommentView {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

/// Post on its detail page
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostDetailView {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentView>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagView>,
}

/// Maps models to views
#[derive(Debug, Clone)]
pub struct Projector {
    media_url: String,
    teaser_length: usize,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(&MediaConfig::default(), &ListingConfig::default())
    }
}

impl Projector {
    /// Create a projector from the media and listing settings
    pub fn new(media: &MediaConfig, listing: &ListingConfig) -> Self {
        Self {
            media_url: media.url.clone(),
            teaser_length: listing.teaser_length,
        }
    }

    /// Card view of a post
    pub fn post(&self, post: &Post) -> PostView {
        PostView {
            title: post.title.clone(),
            teaser_text: teaser(&post.text, self.teaser_length),
            author: post.author.username.clone(),
            comments_amount: post.comments_count,
            image_url: self.image_url(post),
            published_at: post.published_at,
            slug: post.slug.clone(),
            tags: post.tags.iter().map(|t| self.tag(t)).collect(),
            first_tag_title: post.first_tag().map(|t| t.tag.title.clone()),
        }
    }

    /// Full view of a post, comments included
    pub fn post_full(&self, post: &Post) -> PostDetailView {
        PostDetailView {
            title: post.title.clone(),
            text: post.text.clone(),
            author: post.author.username.clone(),
            comments: post.comments.iter().map(comment).collect(),
            likes_amount: post.likes_count,
            image_url: self.image_url(post),
            published_at: post.published_at,
            slug: post.slug.clone(),
            tags: post.tags.iter().map(|t| self.tag(t)).collect(),
        }
    }

    pub fn tag(&self, tag: &TagWithCount) -> TagView {
        TagView {
            title: tag.tag.title.clone(),
            posts_with_tag: tag.posts_count,
        }
    }

    pub fn posts(&self, posts: &[Post]) -> Vec<PostView> {
        posts.iter().map(|p| self.post(p)).collect()
    }

    pub fn tags(&self, tags: &[TagWithCount]) -> Vec<TagView> {
        tags.iter().map(|t| self.tag(t)).collect()
    }

    fn image_url(&self, post: &Post) -> Option<String> {
        post.image
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", self.media_url, path))
    }
}

fn comment(comment: &Comment) -> CommentView {
    CommentView {
        text: comment.text.clone(),
        published_at: comment.published_at,
        author: comment.author.username.clone(),
    }
}

/// First `length` characters of `text`
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
pub fn teaser(text: &str, length: usize) -> String {
    text.chars().take(length).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Tag};
    use chrono::TimeZone;

    fn sample_post() -> Post {
        Post {
            id: 7,
            title: "Morning in Lisbon".to_string(),
            text: "x".repeat(500),
            slug: "morning-in-lisbon".to_string(),
            image: Some("posts/lisbon.jpg".to_string()),
            published_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            author: Author { id: 1, username: "alice".to_string() },
            comments_count: 2,
            likes_count: 11,
            tags: vec![
                TagWithCount::new(Tag { id: 1, title: "city".to_string() }, 4),
                TagWithCount::new(Tag { id: 2, title: "travel".to_string() }, 9),
            ],
            comments: vec![Comment {
                id: 3,
                post_id: 7,
                text: "Lovely".to_string(),
                published_at: Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(),
                author: Author { id: 2, username: "bob".to_string() },
            }],
        }
    }

    #[test]
    fn test_post_view() {
        let view = Projector::default().post(&sample_post());

        assert_eq!(view.title, "Morning in Lisbon");
        assert_eq!(view.teaser_text.chars().count(), 200);
        assert_eq!(view.author, "alice");
        assert_eq!(view.comments_amount, 2);
        assert_eq!(view.image_url.as_deref(), Some("/media/posts/lisbon.jpg"));
        assert_eq!(view.first_tag_title.as_deref(), Some("city"));
        assert_eq!(
            view.tags,
            vec![
                TagView { title: "city".to_string(), posts_with_tag: 4 },
                TagView { title: "travel".to_string(), posts_with_tag: 9 },
            ]
        );
    }

    #[test]
    fn test_post_without_tags_or_image() {
        let post = Post {
            image: None,
            tags: Vec::new(),
            ..sample_post()
        };

        let view = Projector::default().post(&post);

        assert_eq!(view.first_tag_title, None);
        assert_eq!(view.image_url, None);
        assert!(view.tags.is_empty());
    }

    #[test]
    fn test_empty_image_path_has_no_url() {
        let post = Post {
            image: Some(String::new()),
            ..sample_post()
        };

        assert_eq!(Projector::default().post(&post).image_url, None);
        assert_eq!(Projector::default().post_full(&post).image_url, None);
    }

    #[test]
    fn test_post_full_view() {
        let view = Projector::default().post_full(&sample_post());

        assert_eq!(view.text.len(), 500);
        assert_eq!(view.likes_amount, 11);
        assert_eq!(view.comments.len(), 1);
        assert_eq!(view.comments[0].author, "bob");
        assert_eq!(view.comments[0].text, "Lovely");
    }

    #[test]
    fn test_post_full_view_has_no_first_tag() {
        let json = serde_json::to_value(Projector::default().post_full(&sample_post())).unwrap();

        assert!(json.get("first_tag_title").is_none());
        assert!(json.get("likes_amount").is_some());
    }

    #[test]
    fn test_custom_media_url_and_teaser_length() {
        let media = MediaConfig { url: "https://cdn.example.com/".to_string() };
        let listing = ListingConfig { teaser_length: 10, ..ListingConfig::default() };
        let view = Projector::new(&media, &listing).post(&sample_post());

        assert_eq!(
            view.image_url.as_deref(),
            Some("https://cdn.example.com/posts/lisbon.jpg")
        );
        assert_eq!(view.teaser_text, "x".repeat(10));
    }

    #[test]
    fn test_teaser_keeps_short_text() {
        assert_eq!(teaser("short", 200), "short");
        assert_eq!(teaser("", 200), "");
    }

    #[test]
    fn test_teaser_counts_characters_not_bytes() {
        let text = "Привет, мир! ".repeat(30);

        let cut = teaser(&text, 200);

        assert_eq!(cut.chars().count(), 200);
        assert!(text.starts_with(&cut));
    }

    #[test]
    fn test_teaser_with_emoji() {
        assert_eq!(teaser("🦀🦀🦀", 2), "🦀🦀");
    }
}
