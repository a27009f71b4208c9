//! Store inventory data models and API request/response types.
//!
//! This module defines:
//! - `InventoryItem`: Database entity for one store item
//! - `CreateInventoryRequest` / `UpdateInventoryRequest`: admin request bodies
//! - `InventoryQuery` / `FeaturedQuery`: public listing filters
//! - `UploadResponse`: result of an image upload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{nullable, text_enum};
use crate::{
    error::AppError,
    validation::{self, Validate},
};

/// Featured items returned when no `limit` is given.
pub const DEFAULT_FEATURED_LIMIT: i64 = 6;

/// Upper bound on `limit` for featured items.
pub const MAX_FEATURED_LIMIT: i64 = 24;

text_enum! {
    /// Shelf status shown next to an item.
    InventoryStatus("inventory status") {
        InStock => "in_stock",
        Limited => "limited",
        OutOfStock => "out_of_stock",
    }
}

impl Default for InventoryStatus {
    fn default() -> Self {
        InventoryStatus::InStock
    }
}

/// Represents an inventory item record from the database.
///
/// # Database Table
///
/// Maps to the `inventory_items` table. `price` is `NUMERIC(8,2)` read back
/// as text; `None` means "ask in store".
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: i32,

    pub name: String,

    pub category: String,

    pub price: Option<String>,

    #[sqlx(try_from = "String")]
    pub status: InventoryStatus,

    pub description: Option<String>,

    pub image_url: Option<String>,

    /// Shown in the home page carousel
    pub featured: bool,

    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /inventory`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Beef Jerky",
///   "category": "Snacks",
///   "price": "6.99",
///   "status": "in_stock",
///   "featured": true
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    pub name: String,

    pub category: String,

    pub price: Option<String>,

    #[serde(default)]
    pub status: InventoryStatus,

    pub description: Option<String>,

    pub image_url: Option<String>,

    #[serde(default)]
    pub featured: bool,
}

/// `inventory_items.price` is `NUMERIC(8, 2)`.
const PRICE_DIGITS: usize = 6;

impl Validate for CreateInventoryRequest {
    fn validate(&self) -> Result<(), AppError> {
        validation::required("name", &self.name, 160)?;
        validation::required("category", &self.category, 80)?;
        validation::money("price", self.price.as_deref(), PRICE_DIGITS)?;
        validation::optional_max_len("description", self.description.as_deref(), 400)?;
        validation::optional_max_len("imageUrl", self.image_url.as_deref(), 400)
    }
}

/// Request body for `PATCH /inventory/{id}`.
///
/// Absent fields are left untouched; `null` clears `price`, `description`
/// and `imageUrl`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryRequest {
    pub name: Option<String>,

    pub category: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub price: Option<Option<String>>,

    pub status: Option<InventoryStatus>,

    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub image_url: Option<Option<String>>,

    pub featured: Option<bool>,
}

impl Validate for UpdateInventoryRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validation::required("name", name, 160)?;
        }
        if let Some(category) = &self.category {
            validation::required("category", category, 80)?;
        }
        if let Some(price) = &self.price {
            validation::money("price", price.as_deref(), PRICE_DIGITS)?;
        }
        if let Some(description) = &self.description {
            validation::optional_max_len("description", description.as_deref(), 400)?;
        }
        if let Some(image_url) = &self.image_url {
            validation::optional_max_len("imageUrl", image_url.as_deref(), 400)?;
        }
        Ok(())
    }
}

/// Query string for `GET /inventory`.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub category: Option<String>,
}

impl InventoryQuery {
    /// The category filter, treating `?category=` as no filter.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

/// Query string for `GET /inventory/featured`.
///
/// `limit` is kept as text so a malformed value falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<String>,
}

impl FeaturedQuery {
    /// Number of featured items to return: 6 by default, at most 24.
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_FEATURED_LIMIT)
            .min(MAX_FEATURED_LIMIT)
    }
}

/// Response body for `POST /inventory/upload`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Public URL of the stored file
    pub url: String,

    /// Generated file name under `uploads/inventory/`
    pub filename: String,

    /// Size in bytes
    pub size: usize,
}
