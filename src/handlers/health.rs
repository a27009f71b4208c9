//! Health check endpoints for service monitoring.

use crate::{db::DbPool, error::AppError};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "buena-truck-stop-api";

/// Health check response.
///
/// Returns service status and database connectivity.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Liveness probe: answers without touching the database.
///
/// # Response (200 OK)
///
/// ```json
/// { "status": "ok", "service": "buena-truck-stop-api" }
/// ```
pub async fn root() -> Json<Value> {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

/// Readiness probe.
///
/// # Checks
///
/// - Database connectivity (executes simple query)
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "connected",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// # Response (500 Internal Server Error)
///
/// If database is unreachable, returns standard error response.
pub async fn health_check(State(pool): State<DbPool>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        timestamp: Utc::now(),
    }))
}
