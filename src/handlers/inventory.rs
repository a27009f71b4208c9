//! Store inventory HTTP handlers.
//!
//! Public:
//! - GET /inventory?category=Snacks
//! - GET /inventory/categories
//! - GET /inventory/featured?limit=6
//!
//! Admin:
//! - POST /inventory
//! - PATCH /inventory/{id}
//! - POST /inventory/upload (multipart, field `file`)

use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::{HeaderMap, StatusCode},
};

use crate::{
    db::DbPool,
    error::AppError,
    models::inventory::{
        CreateInventoryRequest, FeaturedQuery, InventoryItem, InventoryQuery,
        UpdateInventoryRequest, UploadResponse,
    },
    services::{inventory_service, upload_service},
    state::AppState,
    validation::ValidJson,
};

/// List items, optionally filtered by `?category=`.
pub async fn list_items(
    State(pool): State<DbPool>,
    Query(query): Query<InventoryQuery>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    Ok(Json(inventory_service::list(&pool, query.category()).await?))
}

pub async fn list_categories(State(pool): State<DbPool>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(inventory_service::categories(&pool).await?))
}

/// Featured items for the home page (default 6, at most 24).
pub async fn list_featured(
    State(pool): State<DbPool>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    Ok(Json(inventory_service::featured(&pool, query.limit()).await?))
}

/// Create an item.
///
/// # Request Body
///
/// ```json
/// { "name": "Beef Jerky", "category": "Snacks", "price": "6.99", "featured": true }
/// ```
pub async fn create_item(
    State(pool): State<DbPool>,
    ValidJson(request): ValidJson<CreateInventoryRequest>,
) -> Result<(StatusCode, Json<InventoryItem>), AppError> {
    let item = inventory_service::create(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Partially update an item; 404 if it does not exist.
pub async fn update_item(
    State(pool): State<DbPool>,
    Path(item_id): Path<i32>,
    ValidJson(patch): ValidJson<UpdateInventoryRequest>,
) -> Result<Json<InventoryItem>, AppError> {
    Ok(Json(inventory_service::update(&pool, item_id, patch).await?))
}

/// Store an item image and return its public URL.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "url": "http://localhost:4000/uploads/inventory/1735689600000-482913377.png",
///   "filename": "1735689600000-482913377.png",
///   "size": 48213
/// }
/// ```
///
/// # Errors
///
/// - **400**: no `file` field, or not an `image/*` upload
/// - **413**: file larger than 5 MiB
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let filename = upload_service::save_inventory_image(
            &state.upload_dir,
            original_name.as_deref(),
            content_type.as_deref(),
            &bytes,
        )
        .await?;

        return Ok(Json(UploadResponse {
            url: upload_service::public_url(&headers, &filename),
            size: bytes.len(),
            filename,
        }));
    }

    Err(AppError::invalid("No file uploaded"))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::invalid(err.body_text())
    }
}
