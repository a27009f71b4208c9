//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `JWT_SECRET` (required): HMAC secret used to sign access tokens
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 4000
/// - `JWT_EXPIRES_IN` (optional): token lifetime such as `7d`, `12h` or `3600`, defaults to `7d`
/// - `CORS_ORIGIN` (optional): browser origin allowed to call the API
/// - `UPLOAD_DIR` (optional): root directory for uploaded files, defaults to `uploads`
/// - `INIT_ADMIN_EMAIL` / `INIT_ADMIN_PASSWORD` (optional): first admin account, seeded once
/// - `BCRYPT_COST` (optional): bcrypt work factor, defaults to 10
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    pub jwt_secret: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_jwt_expires_in")]
    pub jwt_expires_in: String,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_admin_email")]
    pub init_admin_email: String,

    #[serde(default = "default_admin_password")]
    pub init_admin_password: String,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

/// Password used for the seeded admin when `INIT_ADMIN_PASSWORD` is unset.
pub const DEFAULT_ADMIN_PASSWORD: &str = "ChangeMe123!";

fn default_port() -> u16 {
    4000
}

fn default_jwt_expires_in() -> String {
    "7d".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_admin_email() -> String {
    "admin@buena.local".to_string()
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

fn default_bcrypt_cost() -> u32 {
    10
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] envy::Error),

    #[error("JWT_SECRET must not be empty")]
    EmptyJwtSecret,

    #[error("invalid JWT_EXPIRES_IN value: {0}")]
    InvalidTokenLifetime(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL, JWT_SECRET)
    /// - Environment variable values cannot be parsed into expected types
    /// - `JWT_EXPIRES_IN` is not a recognised duration
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::EmptyJwtSecret);
        }
        self.token_lifetime()?;
        Ok(())
    }

    /// Lifetime of issued access tokens.
    pub fn token_lifetime(&self) -> Result<Duration, ConfigError> {
        parse_lifetime(&self.jwt_expires_in)
            .ok_or_else(|| ConfigError::InvalidTokenLifetime(self.jwt_expires_in.clone()))
    }
}

/// Parse a lifetime like `90`, `90s`, `15m`, `12h` or `7d`.
///
/// A bare number is read as seconds.
pub fn parse_lifetime(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last()? {
        (idx, c) if c.is_ascii_alphabetic() => (&raw[..idx], c.to_ascii_lowercase()),
        _ => (raw, 's'),
    };

    let amount: u64 = digits.parse().ok()?;
    let seconds = match unit {
        's' => amount,
        'm' => amount.checked_mul(60)?,
        'h' => amount.checked_mul(60 * 60)?,
        'd' => amount.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };

    if seconds == 0 {
        return None;
    }
    Some(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lifetime_units() {
        assert_eq!(parse_lifetime("7d"), Some(Duration::from_secs(7 * 86_400)));
        assert_eq!(parse_lifetime("12h"), Some(Duration::from_secs(12 * 3_600)));
        assert_eq!(parse_lifetime("15m"), Some(Duration::from_secs(900)));
        assert_eq!(parse_lifetime("45s"), Some(Duration::from_secs(45)));
        assert_eq!(parse_lifetime("3600"), Some(Duration::from_secs(3_600)));
        assert_eq!(
            parse_lifetime(" 2D "),
            Some(Duration::from_secs(2 * 86_400))
        );
    }

    #[test]
    fn rejects_bad_lifetimes() {
        assert_eq!(parse_lifetime(""), None);
        assert_eq!(parse_lifetime("d"), None);
        assert_eq!(parse_lifetime("7w"), None);
        assert_eq!(parse_lifetime("-5m"), None);
        assert_eq!(parse_lifetime("0"), None);
        assert_eq!(parse_lifetime("abc"), None);
    }
}
