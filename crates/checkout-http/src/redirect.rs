//! # Payment Link Redirect
//!
//! Sends the customer to the payment provider page for a persisted order.
//!
//! The link is `{payment_url}?orderId={id}` with the ID interpolated as-is.
//! Delivery goes through a `LinkOpener`. Without one (a headless server) the
//! redirect is a successful no-op and callers hand the link out themselves
//! via [`LinkRedirector::payment_link`].

use async_trait::async_trait;
use checkout_core::{CheckoutError, CheckoutResult, Order, PaymentRedirector};
use std::env;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Delivers a payment URL to the customer.
#[async_trait]
pub trait LinkOpener: Send + Sync {
    async fn open(&self, url: &str) -> CheckoutResult<()>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Opens links with the desktop's URL handler (`xdg-open`, `open`, ...)
pub struct SystemBrowserOpener {
    program: String,
    args: Vec<String>,
}

impl SystemBrowserOpener {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Builder: arguments passed before the URL
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Pick a launcher for the current environment.
    ///
    /// `BROWSER` wins when set. On Linux and other Unixes a display
    /// (`DISPLAY` / `WAYLAND_DISPLAY`) is required; without one there is
    /// nothing to open a link on and `None` is returned.
    pub fn detect() -> Option<Self> {
        if let Some(browser) = non_empty_var("BROWSER") {
            return Some(Self::new(browser));
        }

        if cfg!(target_os = "macos") {
            Some(Self::new("open"))
        } else if cfg!(target_os = "windows") {
            // explorer.exe exits 1 on success, and cmd.exe would interpret `&` in the link
            Some(Self::new("rundll32").with_args(["url.dll,FileProtocolHandler"]))
        } else if non_empty_var("DISPLAY").is_some() || non_empty_var("WAYLAND_DISPLAY").is_some() {
            Some(Self::new("xdg-open"))
        } else {
            None
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl LinkOpener for SystemBrowserOpener {
    async fn open(&self, url: &str) -> CheckoutResult<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .status()
            .await
            .map_err(|e| CheckoutError::external(format!("failed to launch {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(CheckoutError::external(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Payment redirector that builds provider links and hands them to an opener
#[derive(Clone)]
pub struct LinkRedirector {
    payment_url: String,
    opener: Option<Arc<dyn LinkOpener>>,
}

impl LinkRedirector {
    /// Headless redirector: builds links but never opens them
    pub fn new(payment_url: impl Into<String>) -> Self {
        Self {
            payment_url: payment_url.into(),
            opener: None,
        }
    }

    /// Redirector using whatever launcher the environment offers
    pub fn detect(payment_url: impl Into<String>) -> Self {
        let redirector = Self::new(payment_url);
        match SystemBrowserOpener::detect() {
            Some(opener) => redirector.with_opener(Arc::new(opener)),
            None => redirector,
        }
    }

    /// Builder: set the link opener
    pub fn with_opener(mut self, opener: Arc<dyn LinkOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    pub fn is_headless(&self) -> bool {
        self.opener.is_none()
    }

    /// Payment page URL for an order. The ID is not escaped.
    pub fn payment_link(&self, order: &Order) -> String {
        format!("{}?orderId={}", self.payment_url, order.id)
    }
}

#[async_trait]
impl PaymentRedirector for LinkRedirector {
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn initiate(&self, order: &Order) -> CheckoutResult<()> {
        let link = self.payment_link(order);

        let Some(opener) = &self.opener else {
            debug!("No display context, skipping payment redirect: {}", link);
            return Ok(());
        };

        info!("Opening payment link with {}: {}", opener.name(), link);
        opener.open(&link).await.map_err(|e| {
            warn!("Payment link delivery failed: {}", e);
            CheckoutError::PaymentRedirect {
                order_id: order.id.clone(),
                reason: e.reason().to_string(),
            }
        })
    }
}
