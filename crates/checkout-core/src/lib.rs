//! # checkout-core
//!
//! Core types and orchestration for the checkout-rs order flow.
//!
//! This crate provides:
//! - `OrderProcessor`, the validate → price → persist → redirect flow
//! - `PaymentSelector` and `PaymentMethod` for price-based method eligibility
//! - `Coupon` and the fixed-amount discount rule
//! - `CouponLookup`, `OrderStore` and `PaymentRedirector` collaborator traits
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{OrderDraft, OrderItem, OrderProcessor};
//!
//! let processor = OrderProcessor::new(coupons, store, redirector);
//!
//! let draft = OrderDraft::new(vec![OrderItem::new("item1", "prod1", 100.0, 2)])
//!     .with_coupon("coupon-123");
//!
//! let order = processor.process(draft).await?;
//! println!("persisted {} with {}", order.id, order.payment_method);
//! ```

pub mod collaborators;
pub mod coupon;
pub mod error;
pub mod order;
pub mod payment;
pub mod processor;

// Re-exports for convenience
pub use collaborators::{
    BoxedCouponLookup, BoxedOrderStore, BoxedPaymentRedirector, CouponLookup, OrderStore,
    PaymentRedirector,
};
pub use coupon::{apply_discount, Coupon};
pub use error::{CheckoutError, CheckoutResult};
pub use order::{calculate_total, Order, OrderDraft, OrderItem, OrderPayload};
pub use payment::{
    PaymentLimits, PaymentMethod, PaymentMethods, PaymentSelector, AUPAY_MAX_AMOUNT,
    PAYPAY_MAX_AMOUNT,
};
pub use processor::OrderProcessor;
