//! # checkout-http
//!
//! HTTP implementations of the checkout collaborators.
//!
//! 1. **HttpCouponLookup** - `GET {coupon_api_url}/{id}`
//! 2. **HttpOrderStore** - `POST {order_api_url}` with the order payload
//! 3. **LinkRedirector** - `{payment_url}?orderId={id}`, opened when a display exists
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_core::OrderProcessor;
//! use checkout_http::{HttpCouponLookup, HttpOrderStore, LinkRedirector, ServiceConfig};
//! use std::sync::Arc;
//!
//! let config = ServiceConfig::from_env()?;
//!
//! let processor = OrderProcessor::new(
//!     Arc::new(HttpCouponLookup::from_config(&config)?),
//!     Arc::new(HttpOrderStore::from_config(&config)?),
//!     Arc::new(LinkRedirector::detect(&config.payment_url)),
//! );
//!
//! let order = processor.process(draft).await?;
//! ```

pub mod config;
pub mod coupon;
pub mod redirect;
pub mod store;

// Re-exports
pub use config::ServiceConfig;
pub use coupon::HttpCouponLookup;
pub use redirect::{LinkOpener, LinkRedirector, SystemBrowserOpener};
pub use store::HttpOrderStore;
