//! Amenity listing (`services` table).

use crate::{db::DbPool, error::AppError, models::amenity::Amenity};

const DEFAULT_AMENITIES: [(&str, Option<&str>); 3] = [
    ("ATM", None),
    ("Truck Overnight Parking", None),
    (
        "Convenience Store",
        Some("All basic convenience store items."),
    ),
];

pub async fn list(pool: &DbPool) -> Result<Vec<Amenity>, AppError> {
    let amenities = sqlx::query_as::<_, Amenity>(
        "SELECT id, name, description, enabled FROM services ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(amenities)
}

pub async fn seed_if_empty(pool: &DbPool) -> Result<(), AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for (name, description) in DEFAULT_AMENITIES {
        sqlx::query("INSERT INTO services (name, description, enabled) VALUES ($1, $2, true)")
            .bind(name)
            .bind(description)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!("Seeded {} amenities", DEFAULT_AMENITIES.len());
    Ok(())
}
