//! # Order Processor
//!
//! Sequential checkout flow for a single order:
//!
//! ```text
//! validate → total → [coupon] → payment methods → persist → redirect
//! ```
//!
//! The processor holds only shared, read-only collaborators, so one instance
//! can serve any number of orders concurrently.

use crate::collaborators::{BoxedCouponLookup, BoxedOrderStore, BoxedPaymentRedirector};
use crate::error::{CheckoutError, CheckoutResult};
use crate::order::{Order, OrderDraft, OrderPayload};
use crate::payment::PaymentSelector;
use tracing::{debug, error, info, instrument, Span};
use uuid::Uuid;

/// Orchestrates coupon lookup, method selection, persistence and payment redirect.
#[derive(Clone)]
pub struct OrderProcessor {
    coupons: BoxedCouponLookup,
    store: BoxedOrderStore,
    redirector: BoxedPaymentRedirector,
    selector: PaymentSelector,
}

impl OrderProcessor {
    /// Create a processor with the default payment limits
    pub fn new(
        coupons: BoxedCouponLookup,
        store: BoxedOrderStore,
        redirector: BoxedPaymentRedirector,
    ) -> Self {
        Self {
            coupons,
            store,
            redirector,
            selector: PaymentSelector::default(),
        }
    }

    /// Builder: use a specific payment selector
    pub fn with_selector(mut self, selector: PaymentSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn selector(&self) -> &PaymentSelector {
        &self.selector
    }

    /// Process a submitted order and return the persisted one.
    ///
    /// Validation failures never reach a collaborator. A coupon that cannot
    /// be resolved stops the flow before persistence. If the redirect fails
    /// the order is already committed; the error carries its ID.
    #[instrument(
        skip(self, draft),
        fields(items = draft.items.len(), request_key = tracing::field::Empty)
    )]
    pub async fn process(&self, draft: OrderDraft) -> CheckoutResult<Order> {
        let mut total_price = draft.validate()?;

        if let Some(coupon_id) = draft.coupon() {
            total_price = self.apply_coupon(total_price, coupon_id).await?;
        }

        let payment_method = self.selector.build_eligible_methods(total_price);
        debug!(
            "Priced order: total={}, payment_method={}",
            total_price, payment_method
        );

        let idempotency_key = Uuid::new_v4().to_string();
        Span::current().record("request_key", idempotency_key.as_str());

        let payload = OrderPayload {
            coupon_id: draft.coupon().map(String::from),
            items: draft.items,
            total_price,
            payment_method,
            idempotency_key,
        };

        let order = self.store.create(&payload).await?;
        info!("Persisted order: id={}, total={}", order.id, payload.total_price);

        if let Err(e) = self.redirector.initiate(&order).await {
            error!("Payment redirect failed for order {}: {}", order.id, e);
            return Err(match e {
                CheckoutError::PaymentRedirect { .. } => e,
                other => CheckoutError::PaymentRedirect {
                    order_id: order.id.clone(),
                    reason: other.reason().to_string(),
                },
            });
        }

        Ok(order)
    }

    async fn apply_coupon(&self, total_price: f64, coupon_id: &str) -> CheckoutResult<f64> {
        let coupon = self
            .coupons
            .resolve(coupon_id)
            .await?
            .ok_or_else(|| CheckoutError::validation("invalid coupon"))?;

        let discounted = self.coupons.apply_discount(total_price, &coupon);
        debug!(
            "Applied coupon {}: {} -> {}",
            coupon.code, total_price, discounted
        );
        Ok(discounted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CouponLookup, OrderStore, PaymentRedirector};
    use crate::coupon::Coupon;
    use crate::order::OrderItem;
    use crate::payment::{PaymentLimits, PaymentMethod};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeCoupons {
        coupon: Option<Coupon>,
        transport_failure: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CouponLookup for FakeCoupons {
        async fn resolve(&self, coupon_id: &str) -> CheckoutResult<Option<Coupon>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.transport_failure {
                return Err(CheckoutError::external("invalid coupon"));
            }
            Ok(self.coupon.clone().filter(|c| c.id == coupon_id))
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        payloads: Mutex<Vec<OrderPayload>>,
        next_id: AtomicU64,
        reject: bool,
    }

    #[async_trait]
    impl OrderStore for RecordingStore {
        async fn create(&self, payload: &OrderPayload) -> CheckoutResult<Order> {
            self.payloads.lock().unwrap().push(payload.clone());
            if self.reject {
                return Err(CheckoutError::external("order creation failed"));
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            Ok(Order::from_payload(format!("order-{}", id), payload))
        }
    }

    #[derive(Default)]
    struct RecordingRedirector {
        initiated: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl PaymentRedirector for RecordingRedirector {
        async fn initiate(&self, order: &Order) -> CheckoutResult<()> {
            self.initiated.lock().unwrap().push(order.id.clone());
            if self.fail {
                return Err(CheckoutError::external("launcher exited with status 1"));
            }
            Ok(())
        }
    }

    struct Harness {
        coupons: Arc<FakeCoupons>,
        store: Arc<RecordingStore>,
        redirector: Arc<RecordingRedirector>,
    }

    impl Harness {
        fn new(coupons: FakeCoupons, store: RecordingStore, redirector: RecordingRedirector) -> Self {
            Self {
                coupons: Arc::new(coupons),
                store: Arc::new(store),
                redirector: Arc::new(redirector),
            }
        }

        fn processor(&self) -> OrderProcessor {
            OrderProcessor::new(
                self.coupons.clone(),
                self.store.clone(),
                self.redirector.clone(),
            )
        }

        fn payloads(&self) -> Vec<OrderPayload> {
            self.store.payloads.lock().unwrap().clone()
        }

        fn initiated(&self) -> Vec<String> {
            self.redirector.initiated.lock().unwrap().clone()
        }
    }

    fn default_harness() -> Harness {
        Harness::new(
            FakeCoupons::default(),
            RecordingStore::default(),
            RecordingRedirector::default(),
        )
    }

    fn coupon_harness(discount: f64) -> Harness {
        Harness::new(
            FakeCoupons {
                coupon: Some(Coupon::new("coupon-123", "TEST50", discount)),
                ..Default::default()
            },
            RecordingStore::default(),
            RecordingRedirector::default(),
        )
    }

    fn valid_items() -> Vec<OrderItem> {
        vec![
            OrderItem::new("item1", "prod1", 100.0, 2),
            OrderItem::new("item2", "prod2", 50.0, 1),
        ]
    }

    #[tokio::test]
    async fn test_order_without_coupon() {
        let harness = default_harness();

        let order = harness
            .processor()
            .process(OrderDraft::new(valid_items()))
            .await
            .unwrap();

        assert_eq!(order.id, "order-0");
        let payloads = harness.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].total_price, 250.0);
        assert_eq!(payloads[0].payment_method.to_string(), "credit,paypay,aupay");
        assert_eq!(payloads[0].coupon_id, None);
        assert!(!payloads[0].idempotency_key.is_empty());
        assert_eq!(harness.initiated(), vec!["order-0".to_string()]);
        assert_eq!(harness.coupons.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_coupon_discount_applied_before_selection() {
        let harness = coupon_harness(50.0);

        let order = harness
            .processor()
            .process(OrderDraft::new(valid_items()).with_coupon("coupon-123"))
            .await
            .unwrap();

        assert_eq!(order.total_price, 200.0);
        assert_eq!(order.coupon_id.as_deref(), Some("coupon-123"));
        assert_eq!(order.payment_method.to_string(), "credit,paypay,aupay");
        assert_eq!(harness.coupons.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_discount_changes_eligible_methods() {
        let harness = coupon_harness(10_000.0);
        let items = vec![OrderItem::new("big", "tv", 305_000.0, 1)];

        let order = harness
            .processor()
            .process(OrderDraft::new(items).with_coupon("coupon-123"))
            .await
            .unwrap();

        assert_eq!(order.total_price, 295_000.0);
        assert!(order.payment_method.contains(PaymentMethod::AuPay));
    }

    #[tokio::test]
    async fn test_discount_larger_than_total_floors_at_zero() {
        let harness = coupon_harness(1_000.0);

        let order = harness
            .processor()
            .process(OrderDraft::new(valid_items()).with_coupon("coupon-123"))
            .await
            .unwrap();

        assert_eq!(order.total_price, 0.0);
    }

    #[tokio::test]
    async fn test_empty_items_touch_no_collaborator() {
        let harness = coupon_harness(50.0);

        let err = harness
            .processor()
            .process(OrderDraft::new(vec![]).with_coupon("coupon-123"))
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::validation("items required"));
        assert_eq!(harness.coupons.calls.load(Ordering::SeqCst), 0);
        assert!(harness.payloads().is_empty());
        assert!(harness.initiated().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_price_and_quantity() {
        let harness = default_harness();
        let processor = harness.processor();

        for item in [
            OrderItem::new("item1", "prod1", 0.0, 2),
            OrderItem::new("item1", "prod1", 100.0, 0),
            OrderItem::new("item1", "prod1", -100.0, 1),
        ] {
            let err = processor.process(OrderDraft::new(vec![item])).await.unwrap_err();
            assert_eq!(err, CheckoutError::validation("items invalid"));
        }
        assert!(harness.payloads().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_coupon_never_persists() {
        let harness = coupon_harness(50.0);

        let err = harness
            .processor()
            .process(OrderDraft::new(valid_items()).with_coupon("invalid-coupon"))
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::validation("invalid coupon"));
        assert!(harness.payloads().is_empty());
        assert!(harness.initiated().is_empty());
    }

    #[tokio::test]
    async fn test_coupon_transport_failure_is_external() {
        let harness = Harness::new(
            FakeCoupons {
                transport_failure: true,
                ..Default::default()
            },
            RecordingStore::default(),
            RecordingRedirector::default(),
        );

        let err = harness
            .processor()
            .process(OrderDraft::new(valid_items()).with_coupon("coupon-123"))
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::external("invalid coupon"));
        assert!(err.is_retryable());
        assert!(harness.payloads().is_empty());
    }

    #[tokio::test]
    async fn test_empty_coupon_id_is_ignored() {
        let harness = coupon_harness(50.0);

        let order = harness
            .processor()
            .process(OrderDraft::new(valid_items()).with_coupon(""))
            .await
            .unwrap();

        assert_eq!(order.total_price, 250.0);
        assert_eq!(harness.coupons.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_failure() {
        let harness = Harness::new(
            FakeCoupons::default(),
            RecordingStore {
                reject: true,
                ..Default::default()
            },
            RecordingRedirector::default(),
        );

        let err = harness
            .processor()
            .process(OrderDraft::new(valid_items()))
            .await
            .unwrap_err();

        assert_eq!(err, CheckoutError::external("order creation failed"));
        assert!(harness.initiated().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_failure_surfaces_committed_id() {
        let harness = Harness::new(
            FakeCoupons::default(),
            RecordingStore::default(),
            RecordingRedirector {
                fail: true,
                ..Default::default()
            },
        );

        let err = harness
            .processor()
            .process(OrderDraft::new(valid_items()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CheckoutError::PaymentRedirect {
                order_id: "order-0".into(),
                reason: "launcher exited with status 1".into(),
            }
        );
        assert_eq!(harness.payloads().len(), 1);
    }

    #[tokio::test]
    async fn test_large_totals_narrow_methods() {
        let harness = default_harness();
        let processor = harness.processor();

        let order = processor
            .process(OrderDraft::new(vec![OrderItem::new("i", "p", 300_001.0, 1)]))
            .await
            .unwrap();
        assert_eq!(order.payment_method.to_string(), "credit,paypay");

        let order = processor
            .process(OrderDraft::new(vec![OrderItem::new("i", "p", 500_001.0, 1)]))
            .await
            .unwrap();
        assert_eq!(order.payment_method.to_string(), "credit");
    }

    #[tokio::test]
    async fn test_custom_selector() {
        let harness = default_harness();
        let processor = harness.processor().with_selector(PaymentSelector::new(PaymentLimits {
            paypay_max: 100.0,
            aupay_max: 100.0,
        }));

        let order = processor.process(OrderDraft::new(valid_items())).await.unwrap();
        assert_eq!(order.payment_method.to_string(), "credit");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_do_not_interfere() {
        let harness = default_harness();
        let processor = harness.processor();

        let handles: Vec<_> = (1..=20)
            .map(|n| {
                let processor = processor.clone();
                tokio::spawn(async move {
                    let price = 20_000.0 * n as f64;
                    let items = vec![OrderItem::new(format!("item{}", n), "prod", price, 1)];
                    let order = processor.process(OrderDraft::new(items)).await.unwrap();
                    (price, order)
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let (price, order) = handle.await.unwrap();
            assert_eq!(order.total_price, price);
            assert_eq!(
                order.payment_method,
                PaymentSelector::default().build_eligible_methods(price)
            );
            ids.insert(order.id);
        }

        assert_eq!(ids.len(), 20);
        assert_eq!(harness.payloads().len(), 20);
        assert_eq!(harness.initiated().len(), 20);

        let keys: HashSet<_> = harness
            .payloads()
            .into_iter()
            .map(|p| p.idempotency_key)
            .collect();
        assert_eq!(keys.len(), 20);
    }
}
