//! Sensive - read side of a small blog

use anyhow::Result;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sensive::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxPostRepository, SqlxTagRepository},
    },
    services::{ContentService, PageService, Projector},
    theme::ThemeEngine,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensive=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sensive...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    let applied = db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed ({} applied)", applied);

    // Create repositories and services
    let content = Arc::new(ContentService::new(
        SqlxPostRepository::boxed(pool.clone()),
        SqlxTagRepository::boxed(pool.clone()),
    ));
    let projector = Projector::new(&config.media, &config.listing);
    let page_service = Arc::new(PageService::new(content, projector, config.listing.clone()));

    // Initialize theme engine
    let theme_engine = ThemeEngine::new(&config.theme.path, &config.theme.active)?;
    tracing::info!("Theme engine initialized: {}", config.theme.active);

    let state = AppState {
        page_service,
        theme_engine: Arc::new(RwLock::new(theme_engine)),
    };

    #[cfg(unix)]
    tokio::spawn(reload_on_hangup(state.clone()));

    // Build router
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!(
        "Server stopped after {} database round-trips",
        pool.round_trips().total()
    );

    Ok(())
}

/// Resolve on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Reload the theme's templates on every SIGHUP
#[cfg(unix)]
async fn reload_on_hangup(state: AppState) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            tracing::warn!("Failed to listen for SIGHUP, theme reload disabled: {}", e);
            return;
        }
    };

    while hangup.recv().await.is_some() {
        if let Err(e) = api::reload_theme(&state) {
            tracing::error!("Theme reload failed, keeping current templates: {:#}", e);
        }
    }
}
