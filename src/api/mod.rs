//! HTTP layer - handlers and routing
//!
//! Serves the four public pages of the blog:
//! - `/` front page
//! - `/post/{slug}` post detail
//! - `/tag/{tag_title}` posts carrying a tag
//! - `/contacts` contacts page
//!
//! Any other path gets the theme's 404 page.

pub mod error;
pub mod pages;

use axum::{routing::get, Router};
use std::sync::{Arc, RwLock};
use tower_http::trace::TraceLayer;

use crate::services::PageService;
use crate::theme::ThemeEngine;

pub use error::PageError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub page_service: Arc<PageService>,
    pub theme_engine: Arc<RwLock<ThemeEngine>>,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/post/{slug}", get(pages::post_detail))
        .route("/tag/{tag_title}", get(pages::tag_filter))
        .route("/contacts", get(pages::contacts))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reload the active theme's templates from disk
///
/// A theme that no longer loads leaves the current templates in place.
pub fn reload_theme(state: &AppState) -> anyhow::Result<()> {
    let mut engine = state
        .theme_engine
        .write()
        .map_err(|e| anyhow::anyhow!("Theme engine lock poisoned: {}", e))?;
    engine.reload_templates()
}
