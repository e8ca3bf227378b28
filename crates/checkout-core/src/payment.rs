//! # Payment Methods
//!
//! Payment method types and the price-based eligibility selector.
//!
//! ```text
//!   total ──► [CREDIT, PAYPAY, AUPAY] ──filter(price <= cap)──► "credit,paypay"
//! ```
//!
//! CREDIT has no cap. Caps are inclusive and come from `PaymentLimits`,
//! which is read-only once the selector is built.

use crate::error::CheckoutError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Default PayPay ceiling (same unit as the order total)
pub const PAYPAY_MAX_AMOUNT: f64 = 500_000.0;

/// Default au PAY ceiling (same unit as the order total)
pub const AUPAY_MAX_AMOUNT: f64 = 300_000.0;

/// A means of payment offered at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Credit,
    PayPay,
    AuPay,
}

impl PaymentMethod {
    /// Fixed priority order used when building the eligible set
    pub const PRIORITY: [PaymentMethod; 3] =
        [PaymentMethod::Credit, PaymentMethod::PayPay, PaymentMethod::AuPay];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Credit => "credit",
            PaymentMethod::PayPay => "paypay",
            PaymentMethod::AuPay => "aupay",
        }
    }

    /// Maximum eligible total for this method, `None` when uncapped
    pub fn max_price(&self, limits: &PaymentLimits) -> Option<f64> {
        match self {
            PaymentMethod::Credit => None,
            PaymentMethod::PayPay => Some(limits.paypay_max),
            PaymentMethod::AuPay => Some(limits.aupay_max),
        }
    }

    /// Whether this method may be offered for `total_price`
    pub fn is_eligible(&self, total_price: f64, limits: &PaymentLimits) -> bool {
        match self.max_price(limits) {
            None => true,
            Some(cap) => total_price <= cap,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(PaymentMethod::Credit),
            "paypay" => Ok(PaymentMethod::PayPay),
            "aupay" => Ok(PaymentMethod::AuPay),
            other => Err(CheckoutError::validation(format!(
                "unknown payment method: {}",
                other
            ))),
        }
    }
}

/// Ordered, duplicate-free set of payment methods.
///
/// Crosses component boundaries as a comma-delimited string
/// (`"credit,paypay,aupay"`), both in `Display` and in serde.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentMethods(Vec<PaymentMethod>);

impl PaymentMethods {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a method, ignoring it if already present
    pub fn push(&mut self, method: PaymentMethod) {
        if !self.0.contains(&method) {
            self.0.push(method);
        }
    }

    pub fn contains(&self, method: PaymentMethod) -> bool {
        self.0.contains(&method)
    }

    pub fn as_slice(&self) -> &[PaymentMethod] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a comma list, skipping unknown and repeated entries
    pub fn parse_lenient(s: &str) -> Self {
        let mut methods = Self::new();
        for method in s.split(',').filter_map(|p| p.parse::<PaymentMethod>().ok()) {
            methods.push(method);
        }
        methods
    }
}

impl fmt::Display for PaymentMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(PaymentMethod::as_str)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

impl FromStr for PaymentMethods {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut methods = PaymentMethods::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            let method: PaymentMethod = part.parse()?;
            if methods.contains(method) {
                return Err(CheckoutError::validation(format!(
                    "duplicate payment method: {}",
                    method
                )));
            }
            methods.push(method);
        }
        Ok(methods)
    }
}

impl Serialize for PaymentMethods {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PaymentMethods {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Provider-imposed ceilings per payment method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentLimits {
    #[serde(default = "default_paypay_max")]
    pub paypay_max: f64,
    #[serde(default = "default_aupay_max")]
    pub aupay_max: f64,
}

fn default_paypay_max() -> f64 {
    PAYPAY_MAX_AMOUNT
}

fn default_aupay_max() -> f64 {
    AUPAY_MAX_AMOUNT
}

impl Default for PaymentLimits {
    fn default() -> Self {
        Self {
            paypay_max: PAYPAY_MAX_AMOUNT,
            aupay_max: AUPAY_MAX_AMOUNT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CheckoutSettings {
    #[serde(default)]
    limits: PaymentLimits,
}

impl PaymentLimits {
    /// Load limits from the `[limits]` table of a TOML document.
    /// Missing table or keys fall back to the built-in ceilings.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let settings: CheckoutSettings = toml::from_str(toml_str)?;
        Ok(settings.limits)
    }
}

/// Builds the eligible payment-method set for a total price.
///
/// Pure and `Copy`; safe to share between any number of concurrent orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentSelector {
    limits: PaymentLimits,
}

impl PaymentSelector {
    pub fn new(limits: PaymentLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &PaymentLimits {
        &self.limits
    }

    /// Filter the fixed priority list down to the methods eligible at
    /// `total_price`. Never reorders and never fails.
    pub fn build_eligible_methods(&self, total_price: f64) -> PaymentMethods {
        let mut methods = PaymentMethods::new();
        for method in PaymentMethod::PRIORITY {
            if method.is_eligible(total_price, &self.limits) {
                methods.push(method);
            }
        }
        methods
    }
}
