//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the order processor, the payment-link builder and server configuration.

use checkout_core::{OrderProcessor, PaymentLimits, PaymentSelector};
use checkout_http::{HttpCouponLookup, HttpOrderStore, LinkRedirector, ServiceConfig};
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout flow
    pub processor: OrderProcessor,
    /// Builds payment links returned to clients
    pub redirector: LinkRedirector,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState wired to the remote services from the environment.
    ///
    /// The server has no display, so the redirector is headless and the
    /// payment link is returned in the API response instead.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let services = ServiceConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load service config: {}", e))?;

        let limits = load_payment_limits()?;
        let redirector = LinkRedirector::new(&services.payment_url);

        let coupons = HttpCouponLookup::from_config(&services)
            .map_err(|e| anyhow::anyhow!("Failed to initialize coupon lookup: {}", e))?;
        let store = HttpOrderStore::from_config(&services)
            .map_err(|e| anyhow::anyhow!("Failed to initialize order store: {}", e))?;

        tracing::info!("Coupon API: {}", coupons.base_url());
        tracing::info!("Order API: {}", store.api_url());

        let processor = OrderProcessor::new(
            Arc::new(coupons),
            Arc::new(store),
            Arc::new(redirector.clone()),
        )
        .with_selector(PaymentSelector::new(limits));

        Ok(Self::from_parts(processor, redirector, config))
    }

    /// Assemble state from prebuilt parts
    pub fn from_parts(processor: OrderProcessor, redirector: LinkRedirector, config: AppConfig) -> Self {
        Self {
            processor,
            redirector,
            config,
        }
    }

    pub fn selector(&self) -> &PaymentSelector {
        self.processor.selector()
    }
}

/// Load payment limits from config file
fn load_payment_limits() -> anyhow::Result<PaymentLimits> {
    let config_paths = [
        "config/checkout.toml",
        "../config/checkout.toml",
        "../../config/checkout.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let limits = PaymentLimits::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!(
                "Loaded payment limits from {}: paypay_max={}, aupay_max={}",
                path,
                limits.paypay_max,
                limits.aupay_max
            );
            return Ok(limits);
        }
    }

    tracing::warn!("No checkout config found, using default payment limits");
    Ok(PaymentLimits::default())
}
