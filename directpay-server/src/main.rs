use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod attachments;
pub mod config;
pub mod db;
pub mod repository;
pub mod service;

#[cfg(test)]
mod test_support;

use config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "directpay_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting direct payments server...");

    let config = ServerConfig::from_env().context("Invalid configuration")?;

    tracing::info!("Connecting to database...");

    // Create database connection pool
    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Database connection pool created");

    // Run migrations
    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let addr = config.bind_addr.clone();
    let state = api::AppState::new(pool, config);

    tokio::fs::create_dir_all(state.attachments.root())
        .await
        .context("Failed to create attachment directory")?;
    tracing::info!(
        "Storing attachments under {}",
        state.attachments.root().display()
    );

    // Build router with all API endpoints
    let app = api::create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
