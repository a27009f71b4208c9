//! Fuel price board model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{nullable, text_enum};
use crate::{
    error::AppError,
    validation::{self, Validate},
};

text_enum! {
    /// Kinds of fuel sold at the pumps. Each kind has at most one row.
    FuelType("fuel type") {
        Diesel => "diesel",
        Gas => "gas",
        Premium => "premium",
        OffRoadDiesel => "off_road_diesel",
        Propane => "propane",
    }
}

/// Represents a row of the `fuel_prices` table.
///
/// `price` is a `NUMERIC(6,2)` read back as text (`"3.47"`); `None` means
/// the price is not posted.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelPrice {
    pub id: i32,

    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub fuel_type: FuelType,

    pub price: Option<String>,

    pub available: bool,

    pub updated_at: DateTime<Utc>,
}

/// Request body for `PATCH /fuel`.
///
/// `price` left out keeps the posted price; `null` takes it down.
///
/// # JSON Example
///
/// ```json
/// { "type": "diesel", "price": "3.59", "available": true }
/// ```
#[derive(Debug, Deserialize)]
pub struct UpdateFuelRequest {
    #[serde(rename = "type")]
    pub fuel_type: FuelType,

    #[serde(default, deserialize_with = "nullable")]
    pub price: Option<Option<String>>,

    pub available: Option<bool>,
}

/// `fuel_prices.price` is `NUMERIC(6, 2)`.
const PRICE_DIGITS: usize = 4;

impl Validate for UpdateFuelRequest {
    fn validate(&self) -> Result<(), AppError> {
        match &self.price {
            Some(price) => validation::money("price", price.as_deref(), PRICE_DIGITS),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_parses_type() {
        let request: UpdateFuelRequest =
            serde_json::from_str(r#"{"type": "off_road_diesel", "price": "4.10"}"#).unwrap();
        assert_eq!(request.fuel_type, FuelType::OffRoadDiesel);
        assert_eq!(request.price, Some(Some("4.10".to_string())));
        assert!(request.validate().is_ok());
        assert_eq!(request.available, None);
    }

    #[test]
    fn update_request_rejects_unknown_type_and_bad_price() {
        assert!(serde_json::from_str::<UpdateFuelRequest>(r#"{"type": "kerosene"}"#).is_err());

        let request: UpdateFuelRequest =
            serde_json::from_str(r#"{"type": "gas", "price": "2.6"}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn price_must_fit_the_column() {
        let fits: UpdateFuelRequest =
            serde_json::from_str(r#"{"type": "diesel", "price": "9999.99"}"#).unwrap();
        assert!(fits.validate().is_ok());

        let too_big: UpdateFuelRequest =
            serde_json::from_str(r#"{"type": "diesel", "price": "123456.78"}"#).unwrap();
        assert!(matches!(too_big.validate(), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn serializes_type_field() {
        let row = FuelPrice {
            id: 1,
            fuel_type: FuelType::Diesel,
            price: Some("3.47".to_string()),
            available: true,
            updated_at: Utc::now(),
        };
        let body = serde_json::to_value(row).unwrap();
        assert_eq!(body["type"], "diesel");
        assert_eq!(body["price"], "3.47");
        assert!(body.get("updatedAt").is_some());
    }
}
