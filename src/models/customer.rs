//! Customer data models and API request/response types.
//!
//! This module defines:
//! - `Customer`: Database entity for a customer portal account
//! - `CreateCustomerRequest` / `UpdateCustomerRequest`: admin request bodies
//! - `CustomerResponse`: Response body returned to clients (no password hash)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::nullable;
use crate::{
    error::AppError,
    validation::{self, Validate},
};

/// Represents a customer record from the database.
///
/// # Database Table
///
/// Maps to the `customers` table. Email is unique and always lower-case.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Customer {
    pub id: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    pub name: String,

    pub email: String,

    pub phone: Option<String>,

    pub address: Option<String>,

    /// bcrypt hash of the portal password
    pub password_hash: String,

    /// Receipt references kept for the customer (JSONB string array)
    pub receipts: Option<Json<Vec<String>>>,

    /// Disabled customers cannot sign in
    pub enabled: bool,
}

/// Request body for creating a customer.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Jane Driver",
///   "email": "jane@example.com",
///   "phone": "555-0100",
///   "password": "secret1",
///   "receipts": ["R-1001"]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: String,
    pub receipts: Option<Vec<String>>,
}

impl Validate for CreateCustomerRequest {
    fn validate(&self) -> Result<(), AppError> {
        validation::required("name", &self.name, 120)?;
        validation::email("email", &self.email, 120)?;
        validation::optional_max_len("phone", self.phone.as_deref(), 30)?;
        validation::optional_max_len("address", self.address.as_deref(), 240)?;
        validation::length_between("password", &self.password, 6, 120)
    }
}

/// Request body for `PATCH /customers/{id}`.
///
/// Absent fields are left untouched. For `phone`, `address` and `receipts`
/// an explicit `null` clears the stored value. An empty `password` is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub receipts: Option<Option<Vec<String>>>,
    pub enabled: Option<bool>,
}

impl UpdateCustomerRequest {
    /// The new password, if one was supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

impl Validate for UpdateCustomerRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validation::required("name", name, 120)?;
        }
        if let Some(email) = &self.email {
            validation::email("email", email, 120)?;
        }
        if let Some(Some(phone)) = &self.phone {
            validation::max_len("phone", phone, 30)?;
        }
        if let Some(Some(address)) = &self.address {
            validation::max_len("address", address, 240)?;
        }
        if let Some(password) = self.new_password() {
            validation::length_between("password", password, 6, 120)?;
        }
        Ok(())
    }
}

/// Response body for customer endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 3,
///   "createdAt": "2025-12-20T10:00:00Z",
///   "updatedAt": "2025-12-20T10:00:00Z",
///   "name": "Jane Driver",
///   "email": "jane@example.com",
///   "phone": "555-0100",
///   "address": null,
///   "receipts": ["R-1001"],
///   "enabled": true
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub receipts: Option<Vec<String>>,
    pub enabled: bool,
}

/// Drops `password_hash` on the way out.
impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            receipts: customer.receipts.map(|Json(receipts)| receipts),
            enabled: customer.enabled,
        }
    }
}
