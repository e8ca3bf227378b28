//! # Checkout Error Types
//!
//! Typed error handling for the checkout orchestrator.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    /// Caller input is structurally invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// A remote collaborator failed (transport or business level)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// The payment delivery mechanism failed after the order was persisted
    #[error("Payment redirect failed for order {order_id}: {reason}")]
    PaymentRedirect { order_id: String, reason: String },

    /// Configuration errors (bad URLs, unreadable files)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CheckoutError {
    pub fn validation(reason: impl Into<String>) -> Self {
        CheckoutError::Validation(reason.into())
    }

    pub fn external(reason: impl Into<String>) -> Self {
        CheckoutError::ExternalService(reason.into())
    }

    /// The bare reason string, without the taxonomy prefix
    pub fn reason(&self) -> &str {
        match self {
            CheckoutError::Validation(reason)
            | CheckoutError::ExternalService(reason)
            | CheckoutError::Configuration(reason) => reason,
            CheckoutError::PaymentRedirect { reason, .. } => reason,
        }
    }

    /// Returns true if a caller may reasonably retry.
    /// Nothing in this workspace retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::ExternalService(_))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Validation(_) => 400,
            CheckoutError::ExternalService(_) => 502,
            CheckoutError::PaymentRedirect { .. } => 502,
            CheckoutError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
