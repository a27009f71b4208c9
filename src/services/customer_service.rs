//! Customer service - portal accounts managed by admins.
//!
//! This service handles:
//! - Creating customers with hashed passwords
//! - Partial updates under a row lock
//! - Customer login and token issuance

use sqlx::types::Json;

use crate::{
    db::DbPool,
    error::{AppError, conflict_on_unique},
    models::{
        customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest},
        user::Role,
    },
    services::auth_service::{self, TokenKeys},
};

const CUSTOMER_COLUMNS: &str = "id, created_at, updated_at, name, email, phone, address, \
                                password_hash, receipts, enabled";

const DUPLICATE_EMAIL: &str = "A customer with this email already exists";

/// Create a customer. Email is stored lower-case.
///
/// # Errors
///
/// - `Conflict`: email already registered
pub async fn create(
    pool: &DbPool,
    request: CreateCustomerRequest,
    bcrypt_cost: u32,
) -> Result<Customer, AppError> {
    let password_hash = auth_service::hash_password(&request.password, bcrypt_cost)
        .await?;

    let customer = sqlx::query_as::<_, Customer>(&format!(
        r#"
        INSERT INTO customers (name, email, phone, address, password_hash, receipts, enabled)
        VALUES ($1, $2, $3, $4, $5, $6, true)
        RETURNING {CUSTOMER_COLUMNS}
        "#
    ))
    .bind(request.name.trim())
    .bind(request.email.trim().to_lowercase())
    .bind(request.phone)
    .bind(request.address)
    .bind(password_hash)
    .bind(request.receipts.map(Json))
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_unique(e, DUPLICATE_EMAIL))?;

    tracing::info!("Created customer {}", customer.id);
    Ok(customer)
}

/// All customers, newest first.
pub async fn list(pool: &DbPool) -> Result<Vec<Customer>, AppError> {
    let customers = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(customers)
}

pub async fn find_by_id(pool: &DbPool, id: i32) -> Result<Option<Customer>, AppError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<Customer>, AppError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = $1"
    ))
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

/// Apply a partial update.
///
/// # Process
///
/// 1. Hash the new password, if any (outside the transaction)
/// 2. Lock the row with `FOR UPDATE`
/// 3. Merge the present fields into the stored row
/// 4. Write the merged row back and commit
///
/// # Errors
///
/// - `NotFound`: no customer with this id
/// - `Conflict`: new email belongs to another customer
pub async fn update(
    pool: &DbPool,
    id: i32,
    patch: UpdateCustomerRequest,
    bcrypt_cost: u32,
) -> Result<Customer, AppError> {
    let new_hash = match patch.new_password() {
        Some(password) => Some(auth_service::hash_password(password, bcrypt_cost).await?),
        None => None,
    };

    let mut tx = pool.begin().await?;

    let mut customer = sqlx::query_as::<_, Customer>(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Customer"))?;

    apply_patch(&mut customer, patch, new_hash);

    let customer = sqlx::query_as::<_, Customer>(&format!(
        r#"
        UPDATE customers
        SET name = $1,
            email = $2,
            phone = $3,
            address = $4,
            password_hash = $5,
            receipts = $6,
            enabled = $7,
            updated_at = NOW()
        WHERE id = $8
        RETURNING {CUSTOMER_COLUMNS}
        "#
    ))
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.phone)
    .bind(&customer.address)
    .bind(&customer.password_hash)
    .bind(&customer.receipts)
    .bind(customer.enabled)
    .bind(id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, DUPLICATE_EMAIL))?;

    tx.commit().await?;

    Ok(customer)
}

/// Merge the fields present in `patch` into `customer`.
fn apply_patch(customer: &mut Customer, patch: UpdateCustomerRequest, new_hash: Option<String>) {
    if let Some(name) = patch.name {
        customer.name = name.trim().to_string();
    }
    if let Some(email) = patch.email {
        customer.email = email.trim().to_lowercase();
    }
    if let Some(phone) = patch.phone {
        customer.phone = phone;
    }
    if let Some(address) = patch.address {
        customer.address = address;
    }
    if let Some(receipts) = patch.receipts {
        customer.receipts = receipts.map(Json);
    }
    if let Some(enabled) = patch.enabled {
        customer.enabled = enabled;
    }
    if let Some(hash) = new_hash {
        customer.password_hash = hash;
    }
}

/// Check customer credentials and issue a `customer` token.
///
/// # Errors
///
/// - `Unauthorized("Invalid credentials")`: unknown email, disabled account, wrong password
pub async fn login(
    pool: &DbPool,
    tokens: &TokenKeys,
    email: &str,
    password: &str,
) -> Result<String, AppError> {
    let candidate = find_by_email(pool, email).await?;
    let customer = check_credentials(candidate, email, password).await?;

    tokens.issue(customer.id, &customer.email, Role::Customer)
}

async fn check_credentials(
    candidate: Option<Customer>,
    email: &str,
    password: &str,
) -> Result<Customer, AppError> {
    let candidate = candidate.filter(|customer| customer.enabled);
    let verified = match &candidate {
        Some(customer) => {
            auth_service::verify_password(password, &customer.password_hash)
                .await?
        }
        None => false,
    };
    let customer = candidate.filter(|_| verified).ok_or_else(|| {
        tracing::info!("Failed customer login for {}", email);
        AppError::Unauthorized("Invalid credentials")
    })?;

    tracing::info!("Customer login for {}", customer.email);
    Ok(customer)
}
