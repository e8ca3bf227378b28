//! # Request Handlers
//!
//! Axum request handlers for the checkout API.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use checkout_core::{CheckoutError, Order, OrderDraft, PaymentMethod};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create order response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Persisted order
    pub order: Order,
    /// Payment page for the customer
    pub payment_url: String,
}

/// Payment-method preview query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsQuery {
    pub total_price: f64,
}

/// Payment-method preview response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsResponse {
    pub total_price: f64,
    /// Comma-delimited form, as stored on orders
    pub payment_method: String,
    pub methods: Vec<PaymentMethod>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if let CheckoutError::PaymentRedirect { order_id, .. } = &err {
        response = response.with_details(format!("order {} was created", order_id));
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "checkout-rs",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Validate, price and persist an order
#[instrument(skip(state, draft), fields(items = draft.items.len()))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), (StatusCode, Json<ErrorResponse>)> {
    let order = state.processor.process(draft).await.map_err(|e| {
        match &e {
            CheckoutError::Validation(_) => warn!("Rejected order: {}", e),
            _ => error!("Failed to process order: {}", e),
        }
        checkout_error_to_response(e)
    })?;

    let payment_url = state.redirector.payment_link(&order);
    info!("Order {} ready for payment: {}", order.id, payment_url);

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse { order, payment_url }),
    ))
}

/// Preview which payment methods a total qualifies for
pub async fn payment_methods(
    State(state): State<AppState>,
    Query(query): Query<PaymentMethodsQuery>,
) -> Json<PaymentMethodsResponse> {
    let methods = state.selector().build_eligible_methods(query.total_price);
    Json(PaymentMethodsResponse {
        total_price: query.total_price,
        payment_method: methods.to_string(),
        methods: methods.as_slice().to_vec(),
    })
}
