//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Infrastructure Errors**: database, password hashing, token signing, file I/O
/// - **Authentication Errors**: missing or invalid tokens, bad credentials
/// - **Authorization Errors**: role not in the route's allow-list
/// - **Resource Errors**: requested record not found, unique value taken
/// - **Validation Errors**: invalid request data or uploads
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// bcrypt failed to hash or parse a stored hash.
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// Signing an access token failed.
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// A blocking task (password hashing) panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Writing an uploaded file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credentials or bearer token missing or rejected.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Authenticated, but the role is not allowed on this route.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Insufficient permissions")]
    Forbidden,

    /// Requested record does not exist.
    ///
    /// Returns HTTP 404 Not Found. The string names the resource.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A unique column already holds the submitted value.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("{0}")]
    Conflict(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// Uploaded file exceeds the size limit.
    ///
    /// Returns HTTP 413 Payload Too Large.
    #[error("File too large")]
    PayloadTooLarge,
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidRequest(message.into())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Unauthorized` → 401 Unauthorized
/// - `Forbidden` → 403 Forbidden
/// - `NotFound` → 404 Not Found
/// - `Conflict` → 409 Conflict
/// - `InvalidRequest` → 400 Bad Request
/// - `PayloadTooLarge` → 413 Payload Too Large
/// - `Database`, `PasswordHash`, `Token`, `Task`, `Io` → 500 Internal Server Error
///   (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.to_string())
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                self.to_string(),
            ),
            AppError::Database(_)
            | AppError::PasswordHash(_)
            | AppError::Token(_)
            | AppError::Task(_)
            | AppError::Io(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Map a unique-constraint violation to `Conflict`, pass everything else through.
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}
