//! HTTP API handlers for deciframe-api

pub mod health;
pub mod similar;

pub use health::health_routes;
pub use similar::get_similar;
