//! Database connection pool, migration and seed management.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - Running database migrations automatically
//! - Seeding default rows into empty tables at startup

use sqlx::{Pool, Postgres};

use crate::{
    config::Config,
    error::AppError,
    services::{amenity_service, fuel_service, inventory_service, user_service},
};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// # Configuration
///
/// - Maximum connections: 5
/// - Connections are created lazily as needed
///
/// # Errors
///
/// Returns an error if the connection string is invalid or the server
/// cannot be reached.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each migration runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Insert default rows into every table that starts out empty.
///
/// Each seeder checks its own table, so rerunning this on a populated
/// database is a no-op.
pub async fn seed_defaults(pool: &DbPool, config: &Config) -> Result<(), AppError> {
    user_service::seed_admin(
        pool,
        &config.init_admin_email,
        &config.init_admin_password,
        config.bcrypt_cost,
    )
    .await?;
    fuel_service::seed_if_empty(pool).await?;
    amenity_service::seed_if_empty(pool).await?;
    inventory_service::seed_if_empty(pool).await?;

    Ok(())
}
