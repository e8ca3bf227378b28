//! # Remote Coupon Lookup
//!
//! Fetches coupons from the coupon API at `GET {base}/{coupon_id}`.
//!
//! | Response | Result |
//! |----------|--------|
//! | 200 + coupon JSON | `Some(coupon)` |
//! | 200 + `null` | `None` |
//! | 404 | `None` |
//! | other status / transport error / bad body | `ExternalService("invalid coupon")` |

use crate::config::ServiceConfig;
use async_trait::async_trait;
use checkout_core::{CheckoutError, CheckoutResult, Coupon, CouponLookup};
use reqwest::{Client, StatusCode};
use tracing::{debug, error, instrument};

/// Coupon lookup backed by the remote coupon API
pub struct HttpCouponLookup {
    client: Client,
    base_url: String,
}

impl HttpCouponLookup {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Create from service configuration
    pub fn from_config(config: &ServiceConfig) -> CheckoutResult<Self> {
        Ok(Self::new(config.http_client()?, &config.coupon_api_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn coupon_url(&self, coupon_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), coupon_id)
    }
}

#[async_trait]
impl CouponLookup for HttpCouponLookup {
    #[instrument(skip(self))]
    async fn resolve(&self, coupon_id: &str) -> CheckoutResult<Option<Coupon>> {
        let url = self.coupon_url(coupon_id);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Coupon API request failed: {}", e);
            CheckoutError::external("invalid coupon")
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Coupon not found: {}", coupon_id);
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| {
            error!("Coupon API body read failed: {}", e);
            CheckoutError::external("invalid coupon")
        })?;

        if !status.is_success() {
            error!("Coupon API error: status={}, body={}", status, body);
            return Err(CheckoutError::external("invalid coupon"));
        }

        let coupon: Option<Coupon> = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse coupon response: {}", e);
            CheckoutError::external("invalid coupon")
        })?;

        debug!("Resolved coupon {}: found={}", coupon_id, coupon.is_some());
        Ok(coupon)
    }
}
