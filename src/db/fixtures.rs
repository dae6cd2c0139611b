//! Test fixtures
//!
//! Seeds an in-memory SQLite database with users, posts, tags, comments and
//! likes. Inserts go straight through sqlx and are not counted as
//! repository round trips.

use crate::db::{create_test_pool, migrations, sqlite_pool, DynDatabasePool};
use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;

/// Timestamp `minutes` after a fixed origin
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + minutes * 60, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Migrated in-memory database
pub struct Fixture {
    pub pool: DynDatabasePool,
}

impl Fixture {
    pub async fn new() -> Self {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        Self { pool }
    }

    fn sqlite(&self) -> &SqlitePool {
        sqlite_pool(&self.pool).expect("test pool is SQLite")
    }

    pub async fn user(&self, username: &str) -> i64 {
        sqlx::query("INSERT INTO users (username) VALUES (?)")
            .bind(username)
            .execute(self.sqlite())
            .await
            .expect("Failed to create test user")
            .last_insert_rowid()
    }

    pub async fn post(&self, author_id: i64, slug: &str, published_at: DateTime<Utc>) -> i64 {
        sqlx::query(
            "INSERT INTO posts (title, text, slug, published_at, author_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(format!("Title for {}", slug))
        .bind(format!("Text of {}", slug))
        .bind(slug)
        .bind(published_at)
        .bind(author_id)
        .execute(self.sqlite())
        .await
        .expect("Failed to create test post")
        .last_insert_rowid()
    }

    pub async fn set_image(&self, post_id: i64, image: &str) {
        sqlx::query("UPDATE posts SET image = ? WHERE id = ?")
            .bind(image)
            .bind(post_id)
            .execute(self.sqlite())
            .await
            .expect("Failed to update post image");
    }

    pub async fn tag(&self, title: &str) -> i64 {
        sqlx::query("INSERT INTO tags (title) VALUES (?)")
            .bind(title)
            .execute(self.sqlite())
            .await
            .expect("Failed to create test tag")
            .last_insert_rowid()
    }

    pub async fn attach_tag(&self, post_id: i64, tag_id: i64) {
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(self.sqlite())
            .await
            .expect("Failed to tag test post");
    }

    pub async fn comment(
        &self,
        post_id: i64,
        author_id: i64,
        text: &str,
        published_at: DateTime<Utc>,
    ) -> i64 {
        sqlx::query(
            "INSERT INTO comments (post_id, author_id, text, published_at) VALUES (?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .bind(published_at)
        .execute(self.sqlite())
        .await
        .expect("Failed to create test comment")
        .last_insert_rowid()
    }

    pub async fn like(&self, post_id: i64, author_id: i64) {
        sqlx::query("INSERT INTO likes (post_id, author_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(author_id)
            .execute(self.sqlite())
            .await
            .expect("Failed to like test post");
    }

    /// Give a post `count` likes from fresh users
    pub async fn likes(&self, post_id: i64, count: usize) {
        for i in 0..count {
            let fan = self.user(&format!("fan-{}-{}", post_id, i)).await;
            self.like(post_id, fan).await;
        }
    }
}
