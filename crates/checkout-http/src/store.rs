//! # Remote Order Store
//!
//! Persists orders by POSTing the JSON payload to the order API.
//! Any non-success status is treated as a failed create; the error body is
//! logged but never interpreted.

use crate::config::ServiceConfig;
use async_trait::async_trait;
use checkout_core::{CheckoutError, CheckoutResult, Order, OrderPayload, OrderStore};
use reqwest::Client;
use tracing::{error, info, instrument};

/// Order store backed by the remote order API
pub struct HttpOrderStore {
    client: Client,
    api_url: String,
}

impl HttpOrderStore {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Create from service configuration
    pub fn from_config(config: &ServiceConfig) -> CheckoutResult<Self> {
        Ok(Self::new(config.http_client()?, &config.order_api_url))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl OrderStore for HttpOrderStore {
    #[instrument(skip(self, payload), fields(total = payload.total_price))]
    async fn create(&self, payload: &OrderPayload) -> CheckoutResult<Order> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Idempotency-Key", &payload.idempotency_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!("Order API request failed: {}", e);
                CheckoutError::external("order creation failed")
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Order API body read failed: {}", e);
            CheckoutError::external("order creation failed")
        })?;

        if !status.is_success() {
            error!("Order API error: status={}, body={}", status, body);
            return Err(CheckoutError::external("order creation failed"));
        }

        let order: Order = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse order response: {}", e);
            CheckoutError::external("order creation failed")
        })?;

        info!("Created order: id={}", order.id);
        Ok(order)
    }
}
