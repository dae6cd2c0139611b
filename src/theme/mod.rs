//! Theme engine
//!
//! This module provides template rendering using Tera.
//! Features:
//! - Loading every template of the active theme, base templates first
//! - Template hot-reload
//! - Fallback to the theme's error page, then to a built-in page

use anyhow::{Context, Result};
use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context as TeraContext, Tera};

mod error;

pub use error::ThemeError;

/// Template rendered when a page fails to render
pub const ERROR_TEMPLATE: &str = "error.html";

/// Theme engine for rendering templates
pub struct ThemeEngine {
    /// Tera template engine instance
    tera: Tera,
    /// Path to themes directory
    themes_path: PathBuf,
    /// Currently active theme name
    current_theme: String,
}

impl ThemeEngine {
    /// Create a new theme engine
    ///
    /// # Arguments
    /// * `themes_path` - Path to the themes directory
    /// * `active_theme` - Name of the theme to render with
    ///
    /// # Errors
    /// Returns an error if the theme directory does not exist or one of its
    /// templates does not parse.
    pub fn new(themes_path: &Path, active_theme: &str) -> Result<Self> {
        let mut engine = Self {
            tera: Tera::default(),
            themes_path: themes_path.to_path_buf(),
            current_theme: active_theme.to_string(),
        };

        engine.load_theme_templates(active_theme)?;

        tracing::info!(
            "Loaded theme '{}' with {} templates",
            active_theme,
            engine.tera.get_template_names().count()
        );

        Ok(engine)
    }

    /// Load templates for a specific theme
    fn load_theme_templates(&mut self, theme_name: &str) -> Result<()> {
        let theme_path = self.themes_path.join(theme_name);

        if !theme_path.is_dir() {
            return Err(ThemeError::NotFound(theme_name.to_string()).into());
        }

        let mut templates: Vec<(String, String)> = Vec::new();
        collect_templates_from_dir(&theme_path, &theme_path, &mut templates)?;

        // Base templates first so children can resolve their parents
        templates.sort_by(|a, b| {
            let a_is_base = a.0 == "base.html" || a.0.ends_with("/base.html");
            let b_is_base = b.0 == "base.html" || b.0.ends_with("/base.html");
            b_is_base.cmp(&a_is_base).then_with(|| a.0.cmp(&b.0))
        });

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| ThemeError::TemplateError(error_chain(&e)))?;

        self.tera = tera;
        Ok(())
    }

    /// Render a template
    ///
    /// # Errors
    /// `ThemeError::TemplateError` with the whole Tera error chain.
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String, ThemeError> {
        self.tera.render(template, context).map_err(|e| {
            ThemeError::TemplateError(format!("Failed to render '{}': {}", template, error_chain(&e)))
        })
    }

    /// Render a template, falling back to an error page
    ///
    /// If the requested template fails, `error.html` is rendered with the
    /// same context. If that fails too, a built-in page is returned.
    pub fn render_with_fallback(&self, template: &str, context: &TeraContext) -> String {
        match self.render(template, context) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("{}, trying error template", e);

                let mut error_context = context.clone();
                error_context.insert("status", &500);
                error_context.insert("message", "The page could not be displayed.");

                match self.render(ERROR_TEMPLATE, &error_context) {
                    Ok(html) => html,
                    Err(error_template_err) => {
                        tracing::warn!(
                            "{}, returning built-in error page",
                            error_template_err
                        );
                        simple_error_page()
                    }
                }
            }
        }
    }

    /// Reload templates (for hot-reload)
    ///
    /// On failure the previously loaded templates stay in place.
    pub fn reload_templates(&mut self) -> Result<()> {
        let theme = self.current_theme.clone();
        self.load_theme_templates(&theme)?;
        tracing::info!("Reloaded templates of theme '{}'", theme);
        Ok(())
    }

    /// Check if a template is loaded
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }

    /// Get the active theme name
    pub fn current_theme(&self) -> &str {
        &self.current_theme
    }
}

/// Collect `*.html` files under `current_path`, named relative to `base_path`
fn collect_templates_from_dir(
    base_path: &Path,
    current_path: &Path,
    templates: &mut Vec<(String, String)>,
) -> Result<()> {
    let entries = fs::read_dir(current_path).map_err(ThemeError::IoError)?;

    for entry in entries {
        let path = entry.map_err(ThemeError::IoError)?.path();

        if path.is_dir() {
            collect_templates_from_dir(base_path, &path, templates)?;
        } else if path.extension().map_or(false, |ext| ext == "html") {
            let relative_path = path
                .strip_prefix(base_path)
                .map_err(|_| ThemeError::TemplateError("Failed to get relative path".to_string()))?;

            let template_name = relative_path.to_string_lossy().replace('\\', "/");

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;

            templates.push((template_name, content));
        }
    }

    Ok(())
}

/// Flatten a Tera error and its sources into one message
fn error_chain(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        message.push_str(&format!("\n  Caused by: {}", s));
        source = s.source();
    }
    message
}

/// Minimal page used when even the theme's error template fails
fn simple_error_page() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Error</title>
</head>
<body>
    <h1>Something went wrong</h1>
    <p>The page could not be displayed. Please try again later.</p>
</body>
</html>"#
        .to_string()
}

#[cfg(test)]
mod tests;
