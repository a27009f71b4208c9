//! Truck Stop API - Main Application Entry Point
//!
//! REST API behind the truck stop website: public fuel prices, amenities,
//! store inventory and parking reservations, plus the admin back-office and
//! the customer portal.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: bcrypt passwords, HS256 JWT bearer tokens, role allow-lists
//! - **Format**: JSON requests/responses, multipart for image uploads
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Seed default rows into empty tables
//! 5. Build HTTP router with routes and middleware
//! 6. Serve until Ctrl-C / SIGTERM

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod validation;

use axum::http::HeaderValue;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    db::seed_defaults(&pool, &config).await?;
    tracing::info!("Default data seeded");

    let cors_origin = HeaderValue::from_str(&config.cors_origin)?;
    let state = state::AppState::new(pool, &config)?;
    let app = routes::build_router(state, cors_origin);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
