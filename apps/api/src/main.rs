mod config;
mod db;
mod errors;
mod extract;
mod matching;
mod models;
mod notify;
mod routes;
mod sources;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::matching::service::MatchingService;
use crate::notify::NotificationDispatcher;
use crate::routes::build_router;
use crate::sources::database::PgRecordStore;
use crate::sources::inbox::DisabledInbox;
use crate::sources::SourceAggregator;
use crate::state::AppState;

const INBOX_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const FETCH_DEDUP_WINDOW: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.database_max_connections).await?;

    // Wire the resume sources. The inbox transport is pluggable; this build
    // ships without one, so the email source contributes no resumes.
    let store = Arc::new(PgRecordStore::new(db));
    let inbox = Arc::new(DisabledInbox);
    info!("No inbox transport wired; email source disabled");

    let aggregator = Arc::new(SourceAggregator::new(
        store,
        inbox,
        config.subject_filter.clone(),
        config.allowed_extensions.clone(),
        config.max_inbox_messages,
        INBOX_FETCH_TIMEOUT,
        FETCH_DEDUP_WINDOW,
    ));

    let notifier = Arc::new(NotificationDispatcher::new(config.notification_url.clone())?);
    match &config.notification_url {
        Some(url) => info!("Notification webhook: {url}"),
        None => info!("No notification webhook configured"),
    }

    let matching = Arc::new(MatchingService::new(aggregator, notifier));

    // Build app state
    let state = AppState { matching };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
