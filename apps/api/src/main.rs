mod collaborators;
mod config;
mod editor;
mod errors;
mod export;
mod gallery;
mod layout;
mod models;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::collaborators::CollaboratorClient;
use crate::config::Config;
use crate::editor::store::SessionStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Studio API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client backs every collaborator role
    let collaborators = Arc::new(CollaboratorClient::new(
        &config.collaborator_url,
        Duration::from_secs(config.collaborator_timeout_secs),
    )?);
    info!(
        "Collaborator client initialized ({}, timeout {}s)",
        config.collaborator_url, config.collaborator_timeout_secs
    );

    let idle = Duration::from_secs(config.session_idle_secs.max(1));
    let sessions = SessionStore::new(config.max_sessions, idle);
    sessions.spawn_sweeper(idle.min(Duration::from_secs(60)));
    info!(
        "Session store initialized (max {} sessions, idle timeout {}s)",
        config.max_sessions,
        idle.as_secs()
    );

    // Build app state
    let state = AppState {
        sessions,
        config: config.clone(),
        parser: collaborators.clone(),
        store: collaborators.clone(),
        suggestions: collaborators.clone(),
        job_matcher: collaborators,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
