//! # Collaborator Traits
//!
//! The three remote services the orchestrator talks to.
//! HTTP implementations live in `checkout-http`; tests substitute in-memory fakes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      OrderProcessor                         │
//! └─────────────────────────────────────────────────────────────┘
//!          │                    │                    │
//!  ┌───────┴───────┐    ┌───────┴───────┐    ┌───────┴────────┐
//!  │ CouponLookup  │    │  OrderStore   │    │PaymentRedirector│
//!  │  resolve()    │    │   create()    │    │   initiate()    │
//!  └───────────────┘    └───────────────┘    └────────────────┘
//! ```

use crate::coupon::Coupon;
use crate::error::CheckoutResult;
use crate::order::{Order, OrderPayload};
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves coupon identifiers to discount data.
#[async_trait]
pub trait CouponLookup: Send + Sync {
    /// Look up a coupon.
    ///
    /// `Ok(None)` means the coupon does not exist. Transport failures are
    /// `ExternalService` errors.
    async fn resolve(&self, coupon_id: &str) -> CheckoutResult<Option<Coupon>>;

    /// Apply a resolved coupon to a price.
    fn apply_discount(&self, price: f64, coupon: &Coupon) -> f64 {
        crate::coupon::apply_discount(price, coupon)
    }
}

/// Persists orders and assigns their identifiers.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Create the order. Any non-success outcome is an `ExternalService` error.
    async fn create(&self, payload: &OrderPayload) -> CheckoutResult<Order>;
}

/// Starts the external payment flow for a persisted order.
#[async_trait]
pub trait PaymentRedirector: Send + Sync {
    /// Best-effort. Must succeed as a no-op when there is no display to
    /// deliver to; only real delivery failures are errors.
    async fn initiate(&self, order: &Order) -> CheckoutResult<()>;
}

pub type BoxedCouponLookup = Arc<dyn CouponLookup>;
pub type BoxedOrderStore = Arc<dyn OrderStore>;
pub type BoxedPaymentRedirector = Arc<dyn PaymentRedirector>;
