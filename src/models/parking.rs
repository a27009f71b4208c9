//! Parking reservation data models and API request/response types.
//!
//! This module defines:
//! - `ParkingReservation`: Database entity for a reserved truck spot
//! - `CreateReservationRequest`: Request body for booking
//! - `ReservationReceipt`: Response body right after booking
//! - `ReservationResponse`: Response body for tracking-id lookups

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use super::text_enum;
use crate::{
    error::AppError,
    validation::{self, Validate},
};

/// Longest stay that can be booked at once.
pub const MAX_DAYS: i32 = 30;

text_enum! {
    /// How the driver intends to pay.
    PaymentMethod("payment method") {
        PayOnArrival => "pay_on_arrival",
        OnlinePending => "online_pending",
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::PayOnArrival
    }
}

text_enum! {
    PaymentStatus("payment status") {
        Unpaid => "unpaid",
        Paid => "paid",
        Pending => "pending",
    }
}

impl PaymentMethod {
    /// Status a fresh reservation starts in for this payment method.
    pub fn initial_status(self) -> PaymentStatus {
        match self {
            PaymentMethod::OnlinePending => PaymentStatus::Pending,
            PaymentMethod::PayOnArrival => PaymentStatus::Unpaid,
        }
    }
}

/// Represents a parking reservation record from the database.
///
/// # Database Table
///
/// Maps to the `parking_reservations` table. `tracking_id` is unique and is
/// the only handle the public API exposes. Money columns are read as text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParkingReservation {
    /// Public handle like `BTS-4F7K2Q`
    pub tracking_id: String,

    pub name: String,

    pub phone: String,

    pub arrival_date: NaiveDate,

    pub days: i32,

    pub truck_number: Option<String>,

    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,

    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,

    pub daily_rate: String,

    pub total_cost: String,
}

/// Request body for `POST /parking/reservations`.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Sam Hauler",
///   "phone": "555-0199",
///   "arrivalDate": "2025-07-04",
///   "days": 3,
///   "truckNumber": "TX-4821",
///   "paymentMethod": "online_pending"
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub name: String,

    pub phone: String,

    #[serde(deserialize_with = "arrival_date")]
    pub arrival_date: NaiveDate,

    pub days: i32,

    pub truck_number: Option<String>,

    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl Validate for CreateReservationRequest {
    fn validate(&self) -> Result<(), AppError> {
        validation::required("name", &self.name, 120)?;
        validation::required("phone", &self.phone, 40)?;
        if !(1..=MAX_DAYS).contains(&self.days) {
            return Err(AppError::invalid(format!(
                "days must be between 1 and {MAX_DAYS}"
            )));
        }
        validation::optional_max_len("truckNumber", self.truck_number.as_deref(), 40)
    }
}

/// Accept either a calendar date or a full RFC 3339 timestamp.
fn arrival_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_arrival_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("arrivalDate must be an ISO 8601 date, got {raw:?}"))
    })
}

pub fn parse_arrival_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive()))
}

/// Response body returned right after a reservation is created.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationReceipt {
    pub tracking_id: String,
    pub daily_rate: String,
    pub total_cost: String,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub arrival_date: NaiveDate,
    pub days: i32,
    pub truck_number: Option<String>,
}

impl From<ParkingReservation> for ReservationReceipt {
    fn from(reservation: ParkingReservation) -> Self {
        Self {
            tracking_id: reservation.tracking_id,
            daily_rate: reservation.daily_rate,
            total_cost: reservation.total_cost,
            payment_status: reservation.payment_status,
            payment_method: reservation.payment_method,
            arrival_date: reservation.arrival_date,
            days: reservation.days,
            truck_number: reservation.truck_number,
        }
    }
}

/// Response body for `GET /parking/reservations/{trackingId}`.
///
/// The row carries no internal id or timestamps; the tracking id is the
/// only handle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub tracking_id: String,
    pub name: String,
    pub phone: String,
    pub arrival_date: NaiveDate,
    pub days: i32,
    pub truck_number: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub daily_rate: String,
    pub total_cost: String,
}

impl From<ParkingReservation> for ReservationResponse {
    fn from(reservation: ParkingReservation) -> Self {
        Self {
            tracking_id: reservation.tracking_id,
            name: reservation.name,
            phone: reservation.phone,
            arrival_date: reservation.arrival_date,
            days: reservation.days,
            truck_number: reservation.truck_number,
            payment_method: reservation.payment_method,
            payment_status: reservation.payment_status,
            daily_rate: reservation.daily_rate,
            total_cost: reservation.total_cost,
        }
    }
}
