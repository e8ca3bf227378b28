//! # Coupons
//!
//! Coupon data and the fixed-amount discount rule.

use serde::{Deserialize, Serialize};

/// A discount descriptor reducing an order's total by a fixed amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub code: String,
    /// May exceed the order total
    pub discount: f64,
}

impl Coupon {
    pub fn new(id: impl Into<String>, code: impl Into<String>, discount: f64) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            discount,
        }
    }
}

/// `max(0, price - discount)`. A NaN price stays NaN.
pub fn apply_discount(price: f64, coupon: &Coupon) -> f64 {
    let discounted = price - coupon.discount;
    // f64::max would turn NaN into 0.0
    if discounted.is_nan() {
        discounted
    } else {
        discounted.max(0.0)
    }
}
