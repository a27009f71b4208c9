//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! along with the request and response bodies of the HTTP API.

use serde::{Deserialize, Deserializer};

/// Site amenities (ATM, overnight parking, ...)
pub mod amenity;
/// Customer portal accounts
pub mod customer;
/// Fuel price board
pub mod fuel;
/// Convenience store items
pub mod inventory;
/// Truck parking reservations
pub mod parking;
/// Back-office users and login payloads
pub mod user;

/// A text column held a value outside the enum it maps to.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declare an enum stored as a lower snake_case `VARCHAR`.
///
/// Generates serde (de)serialization, `as_str` for binding, and
/// `TryFrom<String>` for `#[sqlx(try_from = "String")]` row fields.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                match value.as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err($crate::models::UnknownVariant { kind: $kind, value }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use text_enum;

/// Deserialize a PATCH field that distinguishes "absent" from `null`.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent → `None`, `null` → `Some(None)`,
/// value → `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
