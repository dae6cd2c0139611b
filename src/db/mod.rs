//! Database layer
//!
//! This module provides database abstraction for the Sensive blog.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The database driver is selected based on configuration.
//!
//! # Architecture
//!
//! The database layer uses a trait-based abstraction (`DatabasePool`) that
//! allows the application to work with either SQLite or MySQL without
//! knowing the specific backend. Listings are described by the query
//! specifications in [`query`] and executed by the [`repositories`], which
//! count every statement they send on the pool's [`RoundTripCounter`].
//!
//! # Usage
//!
//! ```ignore
//! use sensive::config::DatabaseConfig;
//! use sensive::db::{create_pool, migrations, query::PostQuery};
//! use sensive::db::repositories::{PostRepository, SqlxPostRepository};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//!
//! let posts = SqlxPostRepository::new(pool.clone())
//!     .find(&PostQuery::most_recent(5))
//!     .await?;
//! println!("{} posts in {} round trips", posts.len(), pool.round_trips().total());
//! ```

pub mod migrations;
pub mod pool;
pub mod query;
pub mod repositories;
pub mod stats;

#[cfg(test)]
pub(crate) mod fixtures;

pub use pool::{
    create_pool, create_test_pool, mysql_pool, sqlite_pool, DatabasePool, DynDatabasePool,
    MysqlDatabase, SqliteDatabase,
};
pub use stats::RoundTripCounter;
