//! Tag repository
//!
//! Read access to tags and their usage counts.
//!
//! This module provides:
//! - `TagRepository` trait defining the interface for tag data access
//! - `SqlxTagRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql_pool, sqlite_pool};
use crate::db::query::{tag_by_title_sql, TagQuery};
use crate::db::DynDatabasePool;
use crate::models::{Tag, TagWithCount};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List tags with their post counts
    async fn find(&self, query: &TagQuery) -> Result<Vec<TagWithCount>>;

    /// Get a tag by its exact title, with the number of posts carrying it
    async fn get_by_title(&self, title: &str) -> Result<Option<TagWithCount>>;
}

/// SQLx-based tag repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn find(&self, query: &TagQuery) -> Result<Vec<TagWithCount>> {
        let stmt = query.to_sql();
        self.pool.round_trips().record();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = stmt
                    .sqlite_query()
                    .fetch_all(sqlite_pool(&self.pool)?)
                    .await
                    .context("Failed to list tags")?;
                Ok(rows.iter().map(row_to_tag_with_count_sqlite).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = stmt
                    .mysql_query()
                    .fetch_all(mysql_pool(&self.pool)?)
                    .await
                    .context("Failed to list tags")?;
                Ok(rows.iter().map(row_to_tag_with_count_mysql).collect())
            }
        }
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<TagWithCount>> {
        let stmt = tag_by_title_sql(title);
        self.pool.round_trips().record();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = stmt
                    .sqlite_query()
                    .fetch_optional(sqlite_pool(&self.pool)?)
                    .await
                    .context("Failed to get tag by title")?;
                Ok(row.as_ref().map(row_to_tag_with_count_sqlite))
            }
            DatabaseDriver::Mysql => {
                let row = stmt
                    .mysql_query()
                    .fetch_optional(mysql_pool(&self.pool)?)
                    .await
                    .context("Failed to get tag by title")?;
                Ok(row.as_ref().map(row_to_tag_with_count_mysql))
            }
        }
    }
}

fn row_to_tag_with_count_sqlite(row: &sqlx::sqlite::SqliteRow) -> TagWithCount {
    let tag = Tag {
        id: row.get("id"),
        title: row.get("title"),
    };
    TagWithCount::new(tag, row.get("posts_count"))
}

fn row_to_tag_with_count_mysql(row: &sqlx::mysql::MySqlRow) -> TagWithCount {
    let tag = Tag {
        id: row.get("id"),
        title: row.get("title"),
    };
    TagWithCount::new(tag, row.get("posts_count"))
}
