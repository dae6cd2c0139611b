//! Page errors at the HTTP edge

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::services::ContentServiceError;
use crate::theme::{ThemeEngine, ERROR_TEMPLATE};

/// Failure to serve a page
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Unknown post slug or tag title
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store, context or template failure
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ContentServiceError> for PageError {
    fn from(err: ContentServiceError) -> Self {
        match err {
            ContentServiceError::NotFound(what) => PageError::NotFound(what),
            ContentServiceError::InternalError(e) => PageError::Internal(e),
        }
    }
}

impl PageError {
    /// HTTP status of the error
    pub fn status(&self) -> StatusCode {
        match self {
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the theme's error page
    ///
    /// Internal errors are logged; the visitor only sees a generic message.
    pub fn render(self, theme: &ThemeEngine) -> Response {
        let message = match &self {
            PageError::NotFound(what) => {
                tracing::debug!("Page not found: {}", what);
                "The page you are looking for does not exist."
            }
            PageError::Internal(e) => {
                tracing::error!("Failed to serve page: {:#}", e);
                "Something went wrong on our side. Please try again later."
            }
        };

        let status = self.status();
        let mut context = tera::Context::new();
        context.insert("status", &status.as_u16());
        context.insert("message", message);

        (status, Html(theme.render_with_fallback(ERROR_TEMPLATE, &context))).into_response()
    }
}

impl IntoResponse for PageError {
    /// Plain response for when no theme engine is at hand
    fn into_response(self) -> Response {
        if let PageError::Internal(e) = &self {
            tracing::error!("Failed to serve page: {:#}", e);
        }
        let status = self.status();
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}
