//! Customer portal HTTP handlers.
//!
//! This module implements the customer-related API endpoints:
//! - POST /customers/login - Customer sign-in (public)
//! - GET /customers/me - Own profile (customer token)
//! - GET /customers - List all customers (admin)
//! - GET /customers/{id} - Get customer by ID (admin)
//! - POST /customers - Create customer (admin)
//! - PATCH /customers/{id} - Update customer (admin)

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    db::DbPool,
    error::AppError,
    middleware::auth::AuthContext,
    models::{
        customer::{CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest},
        user::{LoginRequest, LoginResponse},
    },
    services::customer_service,
    state::AppState,
    validation::ValidJson,
};

/// Sign in a customer.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "accessToken": "<jwt>" }` with role `customer`
/// - **Error (401)**: Invalid credentials (unknown, disabled or wrong password)
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let access_token = customer_service::login(
        &state.pool,
        &state.tokens,
        &request.email,
        &request.password,
    )
    .await?;

    Ok(Json(LoginResponse { access_token }))
}

/// Profile of the signed-in customer.
///
/// The id comes from the token's `sub` claim, so customers can only ever
/// read their own record.
pub async fn me(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = customer_service::find_by_id(&pool, auth.subject_id)
        .await?
        .ok_or(AppError::NotFound("Customer"))?;

    Ok(Json(customer.into()))
}

/// All customers, newest first.
pub async fn list_customers(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let customers = customer_service::list(&pool).await?;

    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

pub async fn get_customer(
    State(pool): State<DbPool>,
    Path(customer_id): Path<i32>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = customer_service::find_by_id(&pool, customer_id)
        .await?
        .ok_or(AppError::NotFound("Customer"))?;

    Ok(Json(customer.into()))
}

/// Create a customer account.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Jane Driver",
///   "email": "jane@example.com",
///   "password": "secret1",
///   "receipts": ["R-1001"]
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the customer, without password hash
/// - **Error (400)**: validation failure
/// - **Error (409)**: email already registered
pub async fn create_customer(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let customer = customer_service::create(&state.pool, request, state.bcrypt_cost).await?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// Partially update a customer.
///
/// Absent fields stay as they are; `null` clears `phone`, `address` and
/// `receipts`; a non-empty `password` is re-hashed.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
    ValidJson(patch): ValidJson<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer =
        customer_service::update(&state.pool, customer_id, patch, state.bcrypt_cost).await?;

    Ok(Json(customer.into()))
}
