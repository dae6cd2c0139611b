//! Tests for the theme engine

use super::*;
use crate::services::pages::{ContactsPage, IndexPage, PageContext, PostDetailPage, TagFilterPage};
use crate::services::projection::{CommentView, PostDetailView, PostView, TagView};
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::TempDir;

/// Helper to create a test theme directory with templates
fn create_test_theme(themes_dir: &Path, theme_name: &str) -> PathBuf {
    let theme_path = themes_dir.join(theme_name);
    fs::create_dir_all(theme_path.join("partials")).unwrap();

    let base_html = r#"<html><body>{% block content %}{% endblock %}</body></html>"#;
    fs::write(theme_path.join("base.html"), base_html).unwrap();

    let index_html = r#"{% extends "base.html" %}
{% block content %}{% include "partials/tags.html" %}{% endblock %}"#;
    fs::write(theme_path.join("index.html"), index_html).unwrap();

    let tags_html = r#"{% for tag in popular_tags %}<a>{{ tag.title }} ({{ tag.posts_with_tag }})</a>{% endfor %}"#;
    fs::write(theme_path.join("partials").join("tags.html"), tags_html).unwrap();

    let error_html = r#"{% extends "base.html" %}
{% block content %}<h1>{{ status }}</h1><p>{{ message }}</p>{% endblock %}"#;
    fs::write(theme_path.join("error.html"), error_html).unwrap();

    // Not a template
    fs::write(theme_path.join("style.css"), "body {}").unwrap();

    theme_path
}

fn shipped_engine() -> ThemeEngine {
    let themes = Path::new(env!("CARGO_MANIFEST_DIR")).join("themes");
    ThemeEngine::new(&themes, "default").expect("Failed to load shipped theme")
}

fn sample_post_view(slug: &str, first_tag: Option<&str>) -> PostView {
    PostView {
        title: format!("Title of {}", slug),
        teaser_text: "Teaser".to_string(),
        author: "alice".to_string(),
        comments_amount: 3,
        image_url: None,
        published_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        slug: slug.to_string(),
        tags: first_tag
            .map(|t| vec![TagView { title: t.to_string(), posts_with_tag: 2 }])
            .unwrap_or_default(),
        first_tag_title: first_tag.map(str::to_string),
    }
}

fn sample_tags() -> Vec<TagView> {
    vec![
        TagView { title: "travel".to_string(), posts_with_tag: 4 },
        TagView { title: "food".to_string(), posts_with_tag: 1 },
    ]
}

#[test]
fn test_theme_engine_loads_templates_recursively() {
    let temp_dir = TempDir::new().unwrap();
    create_test_theme(temp_dir.path(), "plain");

    let engine = ThemeEngine::new(temp_dir.path(), "plain").unwrap();

    assert_eq!(engine.current_theme(), "plain");
    assert!(engine.has_template("base.html"));
    assert!(engine.has_template("index.html"));
    assert!(engine.has_template("partials/tags.html"));
    assert!(!engine.has_template("style.css"));
}

#[test]
fn test_missing_theme_fails() {
    let temp_dir = TempDir::new().unwrap();

    let result = ThemeEngine::new(temp_dir.path(), "nonexistent");

    let err = result.err().expect("missing theme should fail");
    assert!(matches!(err.downcast_ref::<ThemeError>(), Some(ThemeError::NotFound(_))));
}

#[test]
fn test_invalid_template_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let theme_path = create_test_theme(temp_dir.path(), "broken");
    fs::write(theme_path.join("bad.html"), "{% if %}").unwrap();

    assert!(ThemeEngine::new(temp_dir.path(), "broken").is_err());
}

#[test]
fn test_render_with_context() {
    let temp_dir = TempDir::new().unwrap();
    create_test_theme(temp_dir.path(), "plain");
    let engine = ThemeEngine::new(temp_dir.path(), "plain").unwrap();

    let mut context = TeraContext::new();
    context.insert("popular_tags", &sample_tags());
    let html = engine.render("index.html", &context).unwrap();

    assert!(html.contains("<a>travel (4)</a>"));
    assert!(html.starts_with("<html>"));
}

#[test]
fn test_render_unknown_template_is_template_error() {
    let temp_dir = TempDir::new().unwrap();
    create_test_theme(temp_dir.path(), "plain");
    let engine = ThemeEngine::new(temp_dir.path(), "plain").unwrap();

    let result = engine.render("missing.html", &TeraContext::new());

    assert!(matches!(result, Err(ThemeError::TemplateError(_))));
}

#[test]
fn test_render_with_fallback_uses_error_template() {
    let temp_dir = TempDir::new().unwrap();
    create_test_theme(temp_dir.path(), "plain");
    let engine = ThemeEngine::new(temp_dir.path(), "plain").unwrap();

    // index.html needs popular_tags
    let html = engine.render_with_fallback("index.html", &TeraContext::new());

    assert!(html.contains("<h1>500</h1>"));
    assert!(html.contains("could not be displayed"));
}

#[test]
fn test_render_with_fallback_without_error_template() {
    let temp_dir = TempDir::new().unwrap();
    let theme_path = create_test_theme(temp_dir.path(), "plain");
    fs::remove_file(theme_path.join("error.html")).unwrap();
    let engine = ThemeEngine::new(temp_dir.path(), "plain").unwrap();

    let html = engine.render_with_fallback("missing.html", &TeraContext::new());

    assert!(html.contains("Something went wrong"));
}

#[test]
fn test_reload_templates_picks_up_changes() {
    let temp_dir = TempDir::new().unwrap();
    let theme_path = create_test_theme(temp_dir.path(), "plain");
    let mut engine = ThemeEngine::new(temp_dir.path(), "plain").unwrap();
    assert!(!engine.has_template("contacts.html"));

    fs::write(theme_path.join("contacts.html"), "Write to us").unwrap();
    engine.reload_templates().unwrap();

    assert!(engine.has_template("contacts.html"));
    assert_eq!(
        engine.render("contacts.html", &TeraContext::new()).unwrap(),
        "Write to us"
    );
}

#[test]
fn test_failed_reload_keeps_previous_templates() {
    let temp_dir = TempDir::new().unwrap();
    let theme_path = create_test_theme(temp_dir.path(), "plain");
    let mut engine = ThemeEngine::new(temp_dir.path(), "plain").unwrap();

    fs::write(theme_path.join("bad.html"), "{% for %}").unwrap();

    assert!(engine.reload_templates().is_err());
    assert!(engine.has_template("index.html"));
}

// ============================================================================
// Shipped default theme
// ============================================================================

#[test]
fn test_shipped_theme_renders_index_page() {
    let engine = shipped_engine();
    let page = IndexPage {
        most_popular_posts: vec![sample_post_view("liked", Some("travel"))],
        page_posts: vec![
            sample_post_view("fresh", Some("food")),
            sample_post_view("untagged", None),
        ],
        popular_tags: sample_tags(),
    };

    let html = engine
        .render(page.template_name(), &page.to_context().unwrap())
        .unwrap();

    assert!(html.contains("/post/fresh"));
    assert!(html.contains("/post/untagged"));
    assert!(html.contains("/tag/travel"));
    assert!(html.contains("Title of liked"));
}

#[test]
fn test_shipped_theme_renders_post_detail_page() {
    let engine = shipped_engine();
    let page = PostDetailPage {
        post: PostDetailView {
            title: "Morning in Lisbon".to_string(),
            text: "Full text".to_string(),
            author: "alice".to_string(),
            comments: vec![CommentView {
                text: "Lovely <b>place</b>".to_string(),
                published_at: Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(),
                author: "bob".to_string(),
            }],
            likes_amount: 11,
            image_url: Some("/media/lisbon.jpg".to_string()),
            published_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            slug: "morning-in-lisbon".to_string(),
            tags: sample_tags(),
        },
        popular_tags: sample_tags(),
        most_popular_posts: vec![sample_post_view("liked", None)],
    };

    let html = engine
        .render(page.template_name(), &page.to_context().unwrap())
        .unwrap();

    assert!(html.contains("Morning in Lisbon"));
    assert!(html.contains("lisbon.jpg"));
    assert!(html.contains("bob"));
    // Comment text is escaped
    assert!(html.contains("Lovely &lt;b&gt;place&lt;&#x2F;b&gt;"));
}

#[test]
fn test_shipped_theme_renders_tag_and_contacts_pages() {
    let engine = shipped_engine();
    let tag_page = TagFilterPage {
        tag: TagView { title: "travel".to_string(), posts_with_tag: 1 },
        popular_tags: sample_tags(),
        posts: vec![sample_post_view("tagged", Some("travel"))],
        most_popular_posts: Vec::new(),
    };
    let contacts = ContactsPage {};

    let tag_html = engine
        .render(tag_page.template_name(), &tag_page.to_context().unwrap())
        .unwrap();
    let contacts_html = engine
        .render(contacts.template_name(), &contacts.to_context().unwrap())
        .unwrap();

    assert!(tag_html.contains("/post/tagged"));
    assert!(contacts_html.contains("Contacts"));
}

#[test]
fn test_shipped_theme_renders_error_page() {
    let engine = shipped_engine();
    let mut context = TeraContext::new();
    context.insert("status", &404);
    context.insert("message", "Post not found");

    let html = engine.render(ERROR_TEMPLATE, &context).unwrap();

    assert!(html.contains("404"));
    assert!(html.contains("Post not found"));
}
