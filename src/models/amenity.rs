//! Amenity model (the `services` table shown on the home page).

use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Amenity {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
}
