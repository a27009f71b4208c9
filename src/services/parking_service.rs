//! Parking reservation service - booking and tracking-id lookups.
//!
//! # Tracking IDs
//!
//! Each reservation gets a public tracking id `BTS-XXXXXX` where `XXXXXX`
//! is six random upper-case base-36 characters. Candidates are checked
//! against the table; after five collisions the id falls back to the
//! current Unix time in milliseconds, in upper-case base 36.

use std::future::Future;

use chrono::Utc;
use rand::Rng;

use crate::{
    db::DbPool,
    error::AppError,
    models::parking::{CreateReservationRequest, ParkingReservation},
};

/// Nightly rate in cents.
pub const DAILY_RATE_CENTS: i64 = 1_500;

const TRACKING_PREFIX: &str = "BTS";
const TRACKING_CODE_LEN: usize = 6;
const MAX_TRACKING_ATTEMPTS: usize = 5;
const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const RESERVATION_COLUMNS: &str = "tracking_id, name, phone, arrival_date, days, \
                                   truck_number, payment_method, payment_status, \
                                   daily_rate::TEXT AS daily_rate, \
                                   total_cost::TEXT AS total_cost";

/// Book a spot.
///
/// # Process
///
/// 1. Generate a tracking id not yet in the table
/// 2. Price the stay at the daily rate × days
/// 3. Derive the initial payment status from the payment method
/// 4. Insert and return the stored row
pub async fn create_reservation(
    pool: &DbPool,
    request: CreateReservationRequest,
) -> Result<ParkingReservation, AppError> {
    let tracking_id = generate_tracking_id(|candidate| tracking_id_taken(pool, candidate)).await?;
    let total_cents = DAILY_RATE_CENTS * i64::from(request.days);

    let reservation = sqlx::query_as::<_, ParkingReservation>(&format!(
        r#"
        INSERT INTO parking_reservations (
            tracking_id,
            name,
            phone,
            arrival_date,
            days,
            truck_number,
            payment_method,
            payment_status,
            daily_rate,
            total_cost
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9::NUMERIC, $10::NUMERIC)
        RETURNING {RESERVATION_COLUMNS}
        "#
    ))
    .bind(&tracking_id)
    .bind(request.name.trim())
    .bind(request.phone.trim())
    .bind(request.arrival_date)
    .bind(request.days)
    .bind(request.truck_number)
    .bind(request.payment_method.as_str())
    .bind(request.payment_method.initial_status().as_str())
    .bind(format_cents(DAILY_RATE_CENTS))
    .bind(format_cents(total_cents))
    .fetch_one(pool)
    .await?;

    tracing::info!(
        "Parking reservation {} for {} day(s) from {}",
        reservation.tracking_id,
        reservation.days,
        reservation.arrival_date
    );
    Ok(reservation)
}

pub async fn find_by_tracking_id(
    pool: &DbPool,
    tracking_id: &str,
) -> Result<Option<ParkingReservation>, AppError> {
    let reservation = sqlx::query_as::<_, ParkingReservation>(&format!(
        "SELECT {RESERVATION_COLUMNS} FROM parking_reservations WHERE tracking_id = $1"
    ))
    .bind(tracking_id)
    .fetch_optional(pool)
    .await?;

    Ok(reservation)
}

async fn tracking_id_taken(pool: &DbPool, candidate: String) -> Result<bool, AppError> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM parking_reservations WHERE tracking_id = $1)",
    )
    .bind(candidate)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

/// Draw random tracking ids until `is_taken` reports a free one.
///
/// Gives up after five attempts and returns the timestamp-based fallback.
pub async fn generate_tracking_id<F, Fut>(mut is_taken: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    for attempt in 1..=MAX_TRACKING_ATTEMPTS {
        let candidate = random_tracking_id();
        if !is_taken(candidate.clone()).await? {
            return Ok(candidate);
        }
        tracing::debug!("Tracking id {} taken (attempt {})", candidate, attempt);
    }

    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let fallback = fallback_tracking_id(millis);
    tracing::warn!("Tracking id collisions exhausted, using {}", fallback);
    Ok(fallback)
}

fn random_tracking_id() -> String {
    let mut rng = rand::rng();
    let code: String = (0..TRACKING_CODE_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{TRACKING_PREFIX}-{code}")
}

fn fallback_tracking_id(millis: u64) -> String {
    format!("{TRACKING_PREFIX}-{}", to_base36(millis))
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Render cents as a two-decimal amount, e.g. `4500` → `"45.00"`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}
