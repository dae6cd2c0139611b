//! Post repository
//!
//! Read access to posts.
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite and MySQL
//!
//! A listing costs one statement for the posts (author, comment count and
//! like count included), plus one statement per relation the `PostQuery`
//! requests, whatever the number of posts returned.

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql_pool, sqlite_pool};
use crate::db::query::{comments_for_posts_sql, tags_for_posts_sql, PostQuery, Relation, SqlStatement};
use crate::db::DynDatabasePool;
use crate::models::{Author, Comment, Post, Tag, TagWithCount};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::collections::HashMap;
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// List posts matching the specification, relations resolved
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>>;

    /// First post matching the specification
    async fn find_one(&self, query: &PostQuery) -> Result<Option<Post>> {
        Ok(self.find(query).await?.into_iter().next())
    }
}

/// SQLx-based post repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch_posts(&self, stmt: &SqlStatement) -> Result<Vec<Post>> {
        self.pool.round_trips().record();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = stmt
                    .sqlite_query()
                    .fetch_all(sqlite_pool(&self.pool)?)
                    .await
                    .context("Failed to list posts")?;
                rows.iter().map(row_to_post_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = stmt
                    .mysql_query()
                    .fetch_all(mysql_pool(&self.pool)?)
                    .await
                    .context("Failed to list posts")?;
                rows.iter().map(row_to_post_mysql).collect()
            }
        }
    }

    /// Tags of all given posts, keyed by post id
    async fn fetch_tags(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<TagWithCount>>> {
        let stmt = tags_for_posts_sql(post_ids);
        self.pool.round_trips().record();
        let pairs = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = stmt
                    .sqlite_query()
                    .fetch_all(sqlite_pool(&self.pool)?)
                    .await
                    .context("Failed to fetch tags for posts")?;
                rows.iter().map(row_to_post_tag_sqlite).collect::<Vec<_>>()
            }
            DatabaseDriver::Mysql => {
                let rows = stmt
                    .mysql_query()
                    .fetch_all(mysql_pool(&self.pool)?)
                    .await
                    .context("Failed to fetch tags for posts")?;
                rows.iter().map(row_to_post_tag_mysql).collect::<Vec<_>>()
            }
        };

        Ok(group_by_post(pairs))
    }

    /// Comments of all given posts, keyed by post id
    async fn fetch_comments(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<Comment>>> {
        let stmt = comments_for_posts_sql(post_ids);
        self.pool.round_trips().record();
        let comments = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = stmt
                    .sqlite_query()
                    .fetch_all(sqlite_pool(&self.pool)?)
                    .await
                    .context("Failed to fetch comments for posts")?;
                rows.iter().map(row_to_comment_sqlite).collect::<Vec<_>>()
            }
            DatabaseDriver::Mysql => {
                let rows = stmt
                    .mysql_query()
                    .fetch_all(mysql_pool(&self.pool)?)
                    .await
                    .context("Failed to fetch comments for posts")?;
                rows.iter().map(row_to_comment_mysql).collect::<Vec<_>>()
            }
        };

        Ok(group_by_post(comments.into_iter().map(|c| (c.post_id, c))))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let mut posts = self.fetch_posts(&query.to_sql()).await?;
        if posts.is_empty() {
            return Ok(posts);
        }

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        if query.includes(Relation::Tags) {
            let mut tags = self.fetch_tags(&ids).await?;
            for post in &mut posts {
                post.tags = tags.remove(&post.id).unwrap_or_default();
            }
        }

        if query.includes(Relation::Comments) {
            let mut comments = self.fetch_comments(&ids).await?;
            for post in &mut posts {
                post.comments = comments.remove(&post.id).unwrap_or_default();
            }
        }

        tracing::debug!(
            posts = posts.len(),
            relations = ?query.relations,
            round_trips = self.pool.round_trips().total(),
            "Loaded post listing"
        );

        Ok(posts)
    }
}

/// Group rows by post id, keeping the statement's order inside each group
fn group_by_post<T>(rows: impl IntoIterator<Item = (i64, T)>) -> HashMap<i64, Vec<T>> {
    let mut grouped: HashMap<i64, Vec<T>> = HashMap::new();
    for (post_id, item) in rows {
        grouped.entry(post_id).or_default().push(item);
    }
    grouped
}

// ============================================================================
// SQLite row mapping
// ============================================================================

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        text: row.try_get("text")?,
        slug: row.try_get("slug")?,
        image: row.try_get("image")?,
        published_at: row.try_get("published_at")?,
        author: Author {
            id: row.try_get("author_id")?,
            username: row.try_get("author_username")?,
        },
        comments_count: row.try_get("comments_count")?,
        likes_count: row.try_get("likes_count")?,
        tags: Vec::new(),
        comments: Vec::new(),
    })
}

fn row_to_post_tag_sqlite(row: &sqlx::sqlite::SqliteRow) -> (i64, TagWithCount) {
    let tag = Tag {
        id: row.get("id"),
        title: row.get("title"),
    };
    (row.get("post_id"), TagWithCount::new(tag, row.get("posts_count")))
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        post_id: row.get("post_id"),
        text: row.get("text"),
        published_at: row.get("published_at"),
        author: Author {
            id: row.get("author_id"),
            username: row.get("author_username"),
        },
    }
}

// ============================================================================
// MySQL row mapping
// ============================================================================

fn row_to_post_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        text: row.try_get("text")?,
        slug: row.try_get("slug")?,
        image: row.try_get("image")?,
        published_at: row.try_get("published_at")?,
        author: Author {
            id: row.try_get("author_id")?,
            username: row.try_get("author_username")?,
        },
        comments_count: row.try_get("comments_count")?,
        likes_count: row.try_get("likes_count")?,
        tags: Vec::new(),
        comments: Vec::new(),
    })
}

fn row_to_post_tag_mysql(row: &sqlx::mysql::MySqlRow) -> (i64, TagWithCount) {
    let tag = Tag {
        id: row.get("id"),
        title: row.get("title"),
    };
    (row.get("post_id"), TagWithCount::new(tag, row.get("posts_count")))
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Comment {
    Comment {
        id: row.get("id"),
        post_id: row.get("post_id"),
        text: row.get("text"),
        published_at: row.get("published_at"),
        author: Author {
            id: row.get("author_id"),
            username: row.get("author_username"),
        },
    }
}
