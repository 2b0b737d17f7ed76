mod classify;
mod config;
mod fetcher;
mod model;
mod parser;
mod routes;
mod sources;

use std::sync::Arc;

use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::routes::AppState;
use crate::sources::FeedTable;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kiosk_news=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("KIOSK_NEWS_CONFIG").unwrap_or_else(|_| "feeds.toml".to_string());
    let config = Config::load_or_default(&config_path)?;
    info!(
        "Configuration loaded from {} ({} feed overrides)",
        config_path,
        config.feeds.len()
    );

    // Assemble the feed table
    let mut table = FeedTable::builtin();
    table.apply_overrides(&config.feeds);

    // Create fetcher and shared state
    let fetcher = Arc::new(Fetcher::new(&config, table));
    let state = Arc::new(AppState {
        fetcher,
        default_max: config.default_max_items,
    });

    // Build router: the JSON API plus the static kiosk client
    let app = routes::router(state)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Server starting on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
