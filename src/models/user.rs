//! Back-office user model and login payloads.
//!
//! Users are the truck stop's own staff. They are stored with bcrypt
//! password hashes and sign in through `POST /auth/login`.

use serde::{Deserialize, Serialize};

use super::text_enum;
use crate::{
    error::AppError,
    validation::{self, Validate},
};

text_enum! {
    /// Role carried in access tokens.
    ///
    /// `admin` and `staff` are stored in the `users` table; `customer` is
    /// only ever issued to customer portal logins.
    Role("role") {
        Admin => "admin",
        Staff => "staff",
        Customer => "customer",
    }
}

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. Email is unique and stored lower-case.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,

    pub email: String,

    /// bcrypt hash, never serialized
    pub password_hash: String,

    #[sqlx(try_from = "String")]
    pub role: Role,

    /// Disabled users cannot sign in
    pub enabled: bool,
}

/// Request body for `POST /auth/login` and `POST /customers/login`.
///
/// # JSON Example
///
/// ```json
/// { "email": "admin@buena.local", "password": "ChangeMe123!" }
/// ```
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AppError> {
        validation::email("email", &self.email, 120)?;
        validation::required("password", &self.password, 120)
    }
}

/// Response body for successful logins.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}
