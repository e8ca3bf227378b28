//! # Order Types
//!
//! Order lifecycle types for checkout:
//! `OrderDraft` (submitted) → `OrderPayload` (sent to the store) → `Order` (persisted).
//!
//! Field names follow the order store's camelCase JSON.

use crate::error::{CheckoutError, CheckoutResult};
use crate::payment::PaymentMethods;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// A line item in an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Item ID
    pub id: String,

    /// Product reference
    pub product_id: String,

    /// Unit price
    pub price: f64,

    /// Quantity (signed so that bad input can be rejected instead of failing to parse)
    pub quantity: i64,
}

impl OrderItem {
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        price: f64,
        quantity: i64,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            price,
            quantity,
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Price and quantity are both strictly positive.
    /// Non-finite prices are rejected here as well.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0 && self.quantity > 0
    }
}

/// Sum of `price * quantity` across items, before any discount
pub fn calculate_total(items: &[OrderItem]) -> f64 {
    items.iter().map(OrderItem::total).sum()
}

/// A customer's submitted order, before validation and pricing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Line items (absent or `null` deserializes as empty)
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,

    /// Coupon to apply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<String>,
}

impl OrderDraft {
    pub fn new(items: Vec<OrderItem>) -> Self {
        Self {
            items,
            coupon_id: None,
        }
    }

    /// Builder: set coupon ID
    pub fn with_coupon(mut self, coupon_id: impl Into<String>) -> Self {
        self.coupon_id = Some(coupon_id.into());
        self
    }

    /// The coupon to resolve, treating an empty ID as no coupon
    pub fn coupon(&self) -> Option<&str> {
        self.coupon_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Check the draft can be priced and persisted; returns the pre-discount total.
    pub fn validate(&self) -> CheckoutResult<f64> {
        if self.items.is_empty() {
            return Err(CheckoutError::validation("items required"));
        }

        if self.items.iter().any(|item| !item.is_valid()) {
            return Err(CheckoutError::validation("items invalid"));
        }

        // finite prices can still overflow the sum
        let total = calculate_total(&self.items);
        if !total.is_finite() || total <= 0.0 {
            return Err(CheckoutError::validation("total must be positive"));
        }

        Ok(total)
    }
}

/// Body of the order-store create call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub items: Vec<OrderItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<String>,

    /// Total after any discount
    pub total_price: f64,

    /// Eligible methods, serialized as `"credit,paypay,aupay"`
    pub payment_method: PaymentMethods,

    /// Idempotency key for the create call (sent as a header, not in the body)
    #[serde(skip)]
    pub idempotency_key: String,
}

/// An order as persisted by the remote store.
///
/// Only the ID is required. The echoed fields are read leniently: the store
/// has already committed the order, so a `null` or oddly typed echo falls
/// back to the default instead of failing the create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned ID (string or number on the wire)
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,

    #[serde(default, deserialize_with = "or_default")]
    pub items: Vec<OrderItem>,

    #[serde(
        default,
        deserialize_with = "or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub coupon_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_price")]
    pub total_price: f64,

    #[serde(default, deserialize_with = "lenient_methods")]
    pub payment_method: PaymentMethods,
}

impl Order {
    /// Build the persisted view of a payload under an assigned ID
    pub fn from_payload(id: impl Into<String>, payload: &OrderPayload) -> Self {
        Self {
            id: id.into(),
            items: payload.items.clone(),
            coupon_id: payload.coupon_id.clone(),
            total_price: payload.total_price,
            payment_method: payload.payment_method.clone(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any value that does not decode as `T` (including `null`) reads as the default
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<V> {
        Value(V),
        Other(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(value) => value,
        Lenient::Other(IgnoredAny) => T::default(),
    })
}

fn id_from_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Unsigned(id) => id.to_string(),
        RawId::Signed(id) => id.to_string(),
        RawId::Float(id) => id.to_string(),
    })
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(price) => price,
        RawPrice::Text(price) => price.trim().parse::<f64>().unwrap_or_default(),
        RawPrice::Other(IgnoredAny) => 0.0,
    })
}

fn lenient_methods<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<PaymentMethods, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMethods {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match RawMethods::deserialize(deserializer)? {
        RawMethods::Text(methods) => PaymentMethods::parse_lenient(&methods),
        RawMethods::Other(IgnoredAny) => PaymentMethods::default(),
    })
}
