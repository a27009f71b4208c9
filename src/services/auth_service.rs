//! Password hashing and access token management.
//!
//! Passwords are hashed with bcrypt. Access tokens are HS256 JWTs carrying
//! the account id, email and role; they are verified by the auth middleware
//! on every protected request.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, models::user::Role};

/// Claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the user or customer the token was issued to
    pub sub: i32,

    pub email: String,

    pub role: Role,

    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// Signing and verification keys plus the configured token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Sign a token for the given account.
    pub fn issue(&self, sub: i32, email: &str, role: Role) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);

        let claims = Claims {
            sub,
            email: email.to_string(),
            role,
            iat,
            exp: iat.saturating_add(lifetime),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Check signature and expiry, returning the embedded claims.
    ///
    /// Every failure collapses into a 401 "Invalid token".
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected access token: {}", e);
                AppError::Unauthorized("Invalid token")
            })
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// Hash a plaintext password with the given bcrypt cost.
///
/// bcrypt is CPU-bound, so the work runs on the blocking thread pool.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await??;
    Ok(hash)
}

/// Compare a plaintext password against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch rather than an error, so a
/// corrupted row cannot be told apart from a wrong password.
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await?
        .unwrap_or_else(|e| {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        });
    Ok(verified)
}
