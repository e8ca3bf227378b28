//! # Service Configuration
//!
//! Endpoints of the remote collaborators.
//! Loaded from environment variables, with a `.env` file honoured if present.

use checkout_core::{CheckoutError, CheckoutResult};
use reqwest::Client;
use std::env;
use std::time::Duration;

pub const DEFAULT_COUPON_API_URL: &str = "https://67eb7353aa794fb3222a4c0e.mockapi.io/coupons";
pub const DEFAULT_ORDER_API_URL: &str = "https://67eb7353aa794fb3222a4c0e.mockapi.io/order";
pub const DEFAULT_PAYMENT_URL: &str = "https://payment.example.com/pay";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Remote endpoint configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Coupon collection; coupons are fetched at `{coupon_api_url}/{id}`
    pub coupon_api_url: String,

    /// Order collection; orders are created by POSTing here
    pub order_api_url: String,

    /// Payment provider page; the order ID is appended as `?orderId=`
    pub payment_url: String,

    /// Per-request timeout enforced by the HTTP client
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars (defaults in parentheses):
    /// - `COUPON_API_URL` (mock coupon API)
    /// - `ORDER_API_URL` (mock order API)
    /// - `PAYMENT_URL` (`https://payment.example.com/pay`)
    /// - `HTTP_TIMEOUT_SECS` (30)
    pub fn from_env() -> CheckoutResult<Self> {
        dotenvy::dotenv().ok();

        let coupon_api_url =
            env::var("COUPON_API_URL").unwrap_or_else(|_| DEFAULT_COUPON_API_URL.to_string());
        let order_api_url =
            env::var("ORDER_API_URL").unwrap_or_else(|_| DEFAULT_ORDER_API_URL.to_string());
        let payment_url =
            env::var("PAYMENT_URL").unwrap_or_else(|_| DEFAULT_PAYMENT_URL.to_string());

        let timeout_secs = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                CheckoutError::Configuration(format!(
                    "HTTP_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        validate_url("COUPON_API_URL", &coupon_api_url)?;
        validate_url("ORDER_API_URL", &order_api_url)?;
        validate_url("PAYMENT_URL", &payment_url)?;

        Ok(Self {
            coupon_api_url,
            order_api_url,
            payment_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        coupon_api_url: impl Into<String>,
        order_api_url: impl Into<String>,
        payment_url: impl Into<String>,
    ) -> Self {
        Self {
            coupon_api_url: coupon_api_url.into(),
            order_api_url: order_api_url.into(),
            payment_url: payment_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the HTTP client shared by the coupon and order collaborators
    pub fn http_client(&self) -> CheckoutResult<Client> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("failed to build HTTP client: {}", e)))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_COUPON_API_URL,
            DEFAULT_ORDER_API_URL,
            DEFAULT_PAYMENT_URL,
        )
    }
}

fn validate_url(name: &str, url: &str) -> CheckoutResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(CheckoutError::Configuration(format!(
            "{} must start with http:// or https://",
            name
        )))
    }
}
