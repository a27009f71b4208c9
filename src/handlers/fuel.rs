//! Fuel price board endpoints:
//! - GET /fuel - public price board
//! - PATCH /fuel - admin upsert of one fuel type

use axum::{Json, extract::State};

use crate::{
    db::DbPool,
    error::AppError,
    models::fuel::{FuelPrice, UpdateFuelRequest},
    services::fuel_service,
    validation::ValidJson,
};

pub async fn list_fuel(State(pool): State<DbPool>) -> Result<Json<Vec<FuelPrice>>, AppError> {
    Ok(Json(fuel_service::list(&pool).await?))
}

/// Update (or create) the price row for one fuel type.
///
/// # Request Body
///
/// ```json
/// { "type": "diesel", "price": "3.59", "available": true }
/// ```
///
/// `price` must have exactly two decimals; `null` clears it.
pub async fn update_fuel(
    State(pool): State<DbPool>,
    ValidJson(request): ValidJson<UpdateFuelRequest>,
) -> Result<Json<FuelPrice>, AppError> {
    Ok(Json(fuel_service::upsert(&pool, request).await?))
}
