//! Request validation and the validating JSON extractor.
//!
//! Every request body type implements [`Validate`]. Handlers take
//! [`ValidJson<T>`] instead of `Json<T>`, so a body that fails to parse or
//! fails validation is rejected with a 400 before any handler code runs.

use std::sync::LazyLock;

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Field-level checks for a deserialized request body.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

/// JSON body extractor that also runs [`Validate::validate`].
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Require a non-blank string of at most `max` characters.
pub fn required(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(format!("{field} is required")));
    }
    max_len(field, value, max)
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::invalid(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub fn optional_max_len(field: &str, value: Option<&str>, max: usize) -> Result<(), AppError> {
    match value {
        Some(value) => max_len(field, value, max),
        None => Ok(()),
    }
}

pub fn length_between(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::invalid(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

/// Local part and domain made of word characters, inner `.`, `_`, `%`,
/// `+` and `-`, ending in an alphabetic TLD of two or more letters.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$",
    )
    .expect("valid email pattern")
});

/// Money amounts travel as strings with exactly two decimals, e.g. `3.47`.
static MONEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\d{2}$").expect("valid money pattern"));

pub fn email(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    max_len(field, value, max)?;

    if !EMAIL_PATTERN.is_match(value) || value.contains("..") {
        return Err(AppError::invalid(format!("{field} must be an email")));
    }
    Ok(())
}

/// Check an optional money amount against a `NUMERIC(p, 2)` column, where
/// `whole_digits` is `p - 2`.
pub fn money(field: &str, value: Option<&str>, whole_digits: usize) -> Result<(), AppError> {
    let Some(value) = value else {
        return Ok(());
    };

    let whole = MONEY_PATTERN
        .captures(value)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| AppError::invalid(format!("{field} must look like 3.47")))?;

    let significant = whole.as_str().trim_start_matches('0');
    if significant.len() > whole_digits {
        return Err(AppError::invalid(format!(
            "{field} must be at most {}.99",
            "9".repeat(whole_digits)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_format() {
        assert!(money("price", Some("3.47"), 6).is_ok());
        assert!(money("price", Some("0.00"), 6).is_ok());
        assert!(money("price", Some("120.50"), 6).is_ok());

        assert!(money("price", Some("3"), 6).is_err());
        assert!(money("price", Some("3.4"), 6).is_err());
        assert!(money("price", Some("3.470"), 6).is_err());
        assert!(money("price", Some(".47"), 6).is_err());
        assert!(money("price", Some("-3.47"), 6).is_err());
        assert!(money("price", Some("3,47"), 6).is_err());
        assert!(money("price", Some("a.bc"), 6).is_err());
    }

    #[test]
    fn email_format() {
        assert!(email("email", "driver@example.com", 120).is_ok());
        assert!(email("email", "a.b+c@sub.example.org", 120).is_ok());

        assert!(email("email", "driver", 120).is_err());
        assert!(email("email", "@example.com", 120).is_err());
        assert!(email("email", "driver@localhost", 120).is_err());
        assert!(email("email", "driver@@example.com", 120).is_err());
        assert!(email("email", "dri ver@example.com", 120).is_err());
        assert!(email("email", "driver@example..com", 120).is_err());
        assert!(email("email", "a@b.c", 120).is_err());
        assert!(email("email", "<x>@y.zz", 120).is_err());
        assert!(email("email", "a;b@c.d", 120).is_err());
        assert!(email("email", "\"@x.co", 120).is_err());
        assert!(email("email", ".a..@b.co", 120).is_err());
        assert!(email("email", "a..b@example.com", 120).is_err());
    }

    #[test]
    fn lengths_count_characters() {
        assert!(max_len("name", "ééé", 3).is_ok());
        assert!(max_len("name", "éééé", 3).is_err());
        assert!(required("name", "   ", 10).is_err());
        assert!(length_between("password", "12345", 6, 120).is_err());
        assert!(length_between("password", "123456", 6, 120).is_ok());
    }

    #[test]
    fn error_message_names_field() {
        match money("price", Some("abc"), 4) {
            Err(AppError::InvalidRequest(msg)) => assert_eq!(msg, "price must look like 3.47"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn money_fits_column_precision() {
        assert!(money("price", None, 4).is_ok());
        assert!(money("price", Some("9999.99"), 4).is_ok());
        assert!(money("price", Some("0009.99"), 4).is_ok());
        assert!(money("price", Some("999999.99"), 6).is_ok());

        assert!(money("price", Some("10000.00"), 4).is_err());
        assert!(money("price", Some("123456.78"), 4).is_err());
        assert!(money("price", Some("1000000.00"), 6).is_err());
        assert!(money("price", Some("12345678901.00"), 6).is_err());

        match money("price", Some("10000.00"), 4) {
            Err(AppError::InvalidRequest(msg)) => assert_eq!(msg, "price must be at most 9999.99"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
