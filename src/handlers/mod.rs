//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to a service
//! 3. Returns HTTP response (JSON, status code)

/// Amenity listing
pub mod amenities;
/// Staff login
pub mod auth;
/// Customer portal and admin customer management
pub mod customers;
/// Fuel price board
pub mod fuel;
/// Liveness and readiness probes
pub mod health;
/// Store inventory and image uploads
pub mod inventory;
/// Parking reservations
pub mod parking;
