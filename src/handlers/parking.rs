//! Parking reservation endpoints (public):
//! - POST /parking/reservations - book a spot
//! - GET /parking/reservations/{trackingId} - look up a booking

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    db::DbPool,
    error::AppError,
    models::parking::{CreateReservationRequest, ReservationReceipt, ReservationResponse},
    services::parking_service,
    validation::ValidJson,
};

/// Book a parking spot.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Sam Hauler",
///   "phone": "555-0199",
///   "arrivalDate": "2025-07-04",
///   "days": 3,
///   "truckNumber": "TX-4821",
///   "paymentMethod": "pay_on_arrival"
/// }
/// ```
///
/// # Response (201 Created)
///
/// ```json
/// {
///   "trackingId": "BTS-4F7K2Q",
///   "dailyRate": "15.00",
///   "totalCost": "45.00",
///   "paymentStatus": "unpaid",
///   "paymentMethod": "pay_on_arrival",
///   "arrivalDate": "2025-07-04",
///   "days": 3,
///   "truckNumber": "TX-4821"
/// }
/// ```
pub async fn create_reservation(
    State(pool): State<DbPool>,
    ValidJson(request): ValidJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationReceipt>), AppError> {
    let reservation = parking_service::create_reservation(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

/// Look up a reservation by tracking id. Unknown ids answer 404.
pub async fn get_reservation(
    State(pool): State<DbPool>,
    Path(tracking_id): Path<String>,
) -> Result<Json<ReservationResponse>, AppError> {
    let reservation = parking_service::find_by_tracking_id(&pool, tracking_id.trim())
        .await?
        .ok_or(AppError::NotFound("Reservation"))?;

    Ok(Json(reservation.into()))
}
