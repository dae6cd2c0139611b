//! Sensive - read side of a small blog
//!
//! This library loads posts, tags, comments and likes from SQLite or MySQL
//! with a constant number of queries per page, projects them into views and
//! renders the four public pages through a Tera theme.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod theme;
