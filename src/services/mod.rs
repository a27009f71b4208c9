//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They own the SQL, validation that needs the database, and seeding.

pub mod amenity_service;
pub mod auth_service;
pub mod customer_service;
pub mod fuel_service;
pub mod inventory_service;
pub mod parking_service;
pub mod upload_service;
pub mod user_service;
