//! GET /services - amenities shown on the home page.

use axum::{Json, extract::State};

use crate::{db::DbPool, error::AppError, models::amenity::Amenity, services::amenity_service};

pub async fn list_amenities(State(pool): State<DbPool>) -> Result<Json<Vec<Amenity>>, AppError> {
    Ok(Json(amenity_service::list(&pool).await?))
}
