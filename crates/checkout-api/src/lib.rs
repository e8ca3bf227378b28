//! # checkout-api
//!
//! HTTP API layer for checkout-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for order processing and payment-method preview
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/orders` | Process an order, returns it with its payment URL |
//! | GET | `/api/v1/payment-methods?totalPrice=` | Eligible payment methods |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
