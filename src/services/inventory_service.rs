//! Store inventory service.
//!
//! This service handles:
//! - Public listings (all, by category, featured)
//! - Admin create and partial update
//! - Seeding a starter catalogue into an empty table

use crate::{
    db::DbPool,
    error::AppError,
    models::inventory::{
        CreateInventoryRequest, InventoryItem, InventoryStatus, UpdateInventoryRequest,
    },
};

const ITEM_COLUMNS: &str = "id, name, category, price::TEXT AS price, status, description, \
                            image_url, featured, updated_at";

const DEFAULT_ITEMS: [(&str, &str, InventoryStatus); 6] = [
    ("Bottled Water", "Drinks", InventoryStatus::InStock),
    ("Energy Drink", "Drinks", InventoryStatus::InStock),
    ("Chips", "Snacks", InventoryStatus::InStock),
    ("Candy", "Snacks", InventoryStatus::InStock),
    ("Windshield Washer Fluid", "Automotive", InventoryStatus::Limited),
    ("Motor Oil (select types)", "Automotive", InventoryStatus::InStock),
];

/// List items, optionally restricted to one category.
///
/// # Ordering
///
/// - No category: by category, then name
/// - With category: by name
pub async fn list(pool: &DbPool, category: Option<&str>) -> Result<Vec<InventoryItem>, AppError> {
    let items = match category {
        Some(category) => {
            sqlx::query_as::<_, InventoryItem>(&format!(
                "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE category = $1 ORDER BY name ASC"
            ))
            .bind(category)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, InventoryItem>(&format!(
                "SELECT {ITEM_COLUMNS} FROM inventory_items ORDER BY category ASC, name ASC"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(items)
}

/// Distinct categories in ascending order.
pub async fn categories(pool: &DbPool) -> Result<Vec<String>, AppError> {
    let categories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT category FROM inventory_items ORDER BY category ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Featured items, most recently updated first.
pub async fn featured(pool: &DbPool, limit: i64) -> Result<Vec<InventoryItem>, AppError> {
    let items = sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE featured = true \
         ORDER BY updated_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn create(
    pool: &DbPool,
    request: CreateInventoryRequest,
) -> Result<InventoryItem, AppError> {
    let item = sqlx::query_as::<_, InventoryItem>(&format!(
        r#"
        INSERT INTO inventory_items (name, category, price, status, description, image_url, featured)
        VALUES ($1, $2, $3::NUMERIC, $4, $5, $6, $7)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(request.name.trim())
    .bind(request.category.trim())
    .bind(request.price)
    .bind(request.status.as_str())
    .bind(request.description)
    .bind(request.image_url)
    .bind(request.featured)
    .fetch_one(pool)
    .await?;

    tracing::info!("Created inventory item {} ({})", item.id, item.name);
    Ok(item)
}

/// Apply a partial update to one item and bump `updated_at`.
///
/// # Errors
///
/// - `NotFound`: no item with this id
pub async fn update(
    pool: &DbPool,
    id: i32,
    patch: UpdateInventoryRequest,
) -> Result<InventoryItem, AppError> {
    let mut tx = pool.begin().await?;

    let mut item = sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Inventory item"))?;

    apply_patch(&mut item, patch);

    let item = sqlx::query_as::<_, InventoryItem>(&format!(
        r#"
        UPDATE inventory_items
        SET name = $1,
            category = $2,
            price = $3::NUMERIC,
            status = $4,
            description = $5,
            image_url = $6,
            featured = $7,
            updated_at = NOW()
        WHERE id = $8
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(&item.name)
    .bind(&item.category)
    .bind(&item.price)
    .bind(item.status.as_str())
    .bind(&item.description)
    .bind(&item.image_url)
    .bind(item.featured)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(item)
}

fn apply_patch(item: &mut InventoryItem, patch: UpdateInventoryRequest) {
    if let Some(name) = patch.name {
        item.name = name.trim().to_string();
    }
    if let Some(category) = patch.category {
        item.category = category.trim().to_string();
    }
    if let Some(price) = patch.price {
        item.price = price;
    }
    if let Some(status) = patch.status {
        item.status = status;
    }
    if let Some(description) = patch.description {
        item.description = description;
    }
    if let Some(image_url) = patch.image_url {
        item.image_url = image_url;
    }
    if let Some(featured) = patch.featured {
        item.featured = featured;
    }
}

pub async fn seed_if_empty(pool: &DbPool) -> Result<(), AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for (name, category, status) in DEFAULT_ITEMS {
        sqlx::query("INSERT INTO inventory_items (name, category, status) VALUES ($1, $2, $3)")
            .bind(name)
            .bind(category)
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!("Seeded {} inventory items", DEFAULT_ITEMS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item() -> InventoryItem {
        InventoryItem {
            id: 4,
            name: "Chips".to_string(),
            category: "Snacks".to_string(),
            price: Some("1.99".to_string()),
            status: InventoryStatus::InStock,
            description: Some("Salted".to_string()),
            image_url: None,
            featured: false,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn patch_merges_present_fields() {
        let mut stored = item();
        let patch: UpdateInventoryRequest = serde_json::from_str(
            r#"{"status": "out_of_stock", "price": null, "featured": true, "imageUrl": "http://x/a.png"}"#,
        )
        .unwrap();

        apply_patch(&mut stored, patch);

        assert_eq!(stored.status, InventoryStatus::OutOfStock);
        assert_eq!(stored.price, None);
        assert!(stored.featured);
        assert_eq!(stored.image_url.as_deref(), Some("http://x/a.png"));
        assert_eq!(stored.description.as_deref(), Some("Salted"));
        assert_eq!(stored.name, "Chips");
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut stored = item();
        apply_patch(&mut stored, UpdateInventoryRequest::default());

        assert_eq!(stored.price.as_deref(), Some("1.99"));
        assert_eq!(stored.category, "Snacks");
        assert!(!stored.featured);
    }
}
