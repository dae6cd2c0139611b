//! Page handlers
//!
//! Each handler asks the `PageService` for its page and renders it with the
//! template the page names.

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{Html, IntoResponse, Response};

use super::{AppState, PageError};
use crate::services::{ContentServiceError, PageContext};

/// GET /
pub async fn index(State(state): State<AppState>) -> Response {
    let page = state.page_service.list_index_page().await;
    respond(&state, page)
}

/// GET /post/{slug}
pub async fn post_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let page = state.page_service.get_post_detail(&slug).await;
    respond(&state, page)
}

/// GET /tag/{tag_title}
pub async fn tag_filter(State(state): State<AppState>, Path(tag_title): Path<String>) -> Response {
    let page = state.page_service.filter_by_tag(&tag_title).await;
    respond(&state, page)
}

/// GET /contacts
pub async fn contacts(State(state): State<AppState>) -> Response {
    let page = state.page_service.get_contacts_page().await;
    respond(&state, page)
}

/// Fallback for paths no route matches
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    let error = PageError::NotFound(format!("path '{}'", uri.path()));
    match state.theme_engine.read() {
        Ok(engine) => error.render(&engine),
        Err(_) => error.into_response(),
    }
}

/// Render a page, or the error page matching its failure
fn respond<P: PageContext>(state: &AppState, page: Result<P, ContentServiceError>) -> Response {
    let engine = match state.theme_engine.read() {
        Ok(engine) => engine,
        Err(e) => {
            return PageError::Internal(anyhow::anyhow!("Theme engine lock poisoned: {}", e))
                .into_response()
        }
    };

    let rendered = page.map_err(PageError::from).and_then(|page| {
        let context = page.to_context().map_err(anyhow::Error::from)?;
        engine
            .render(page.template_name(), &context)
            .map_err(|e| PageError::Internal(e.into()))
    });

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => e.render(&engine),
    }
}
