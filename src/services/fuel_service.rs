//! Fuel price board service.

use crate::{
    db::DbPool,
    error::AppError,
    models::fuel::{FuelPrice, FuelType, UpdateFuelRequest},
};

const FUEL_COLUMNS: &str = "id, fuel_type, price::TEXT AS price, available, updated_at";

/// Rows inserted into an empty board.
const DEFAULT_PRICES: [(FuelType, Option<&str>); 5] = [
    (FuelType::Diesel, Some("3.47")),
    (FuelType::Gas, Some("2.69")),
    (FuelType::Premium, Some("3.49")),
    (FuelType::OffRoadDiesel, None),
    (FuelType::Propane, None),
];

/// Every fuel row in board order.
pub async fn list(pool: &DbPool) -> Result<Vec<FuelPrice>, AppError> {
    let prices = sqlx::query_as::<_, FuelPrice>(&format!(
        "SELECT {FUEL_COLUMNS} FROM fuel_prices ORDER BY id ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(prices)
}

pub async fn seed_if_empty(pool: &DbPool) -> Result<(), AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fuel_prices")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for (fuel_type, price) in DEFAULT_PRICES {
        sqlx::query(
            "INSERT INTO fuel_prices (fuel_type, price, available) VALUES ($1, $2::NUMERIC, true)",
        )
        .bind(fuel_type.as_str())
        .bind(price)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!("Seeded {} fuel prices", DEFAULT_PRICES.len());
    Ok(())
}

/// Create or update the row for one fuel type.
///
/// # Behaviour
///
/// - Missing row: inserted with the given price (or none) and availability
///   (default available)
/// - Existing row: only the fields present in the request change
/// - `updated_at` is bumped either way
pub async fn upsert(pool: &DbPool, request: UpdateFuelRequest) -> Result<FuelPrice, AppError> {
    let price_given = request.price.is_some();
    let price = request.price.flatten();

    let row = sqlx::query_as::<_, FuelPrice>(&format!(
        r#"
        INSERT INTO fuel_prices (fuel_type, price, available, updated_at)
        VALUES ($1, $2::NUMERIC, COALESCE($3, true), NOW())
        ON CONFLICT (fuel_type) DO UPDATE
        SET price = CASE WHEN $4 THEN EXCLUDED.price ELSE fuel_prices.price END,
            available = COALESCE($3, fuel_prices.available),
            updated_at = NOW()
        RETURNING {FUEL_COLUMNS}
        "#
    ))
    .bind(request.fuel_type.as_str())
    .bind(price)
    .bind(request.available)
    .bind(price_given)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        "Fuel {} updated: price={:?} available={}",
        row.fuel_type,
        row.price,
        row.available
    );
    Ok(row)
}
