//! # Checkout RS
//!
//! Order checkout server.
//!
//! ## Usage
//!
//! ```bash
//! # Point at the remote services (defaults target the mock APIs)
//! export COUPON_API_URL=https://coupons.internal/coupons
//! export ORDER_API_URL=https://orders.internal/order
//! export PAYMENT_URL=https://payment.example.com/pay
//!
//! # Run the server
//! checkout-server
//! ```

use checkout_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment limits: {:?}", state.selector().limits());

    let app = routes::create_router(state);

    info!("Checkout server starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Orders: POST http://{}/api/v1/orders", addr);
        info!("Methods: GET http://{}/api/v1/payment-methods?totalPrice=1000", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Checkout RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  Order checkout orchestrator
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
