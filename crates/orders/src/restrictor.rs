//! "Previously purchased only" browsing.
//!
//! Narrows a product search to products found in the shopper's most recent
//! orders. Only a bounded window of orders is read on each search.

use std::collections::BTreeSet;
use std::sync::Arc;

use storefront_catalog::ProductSearchCriteria;
use storefront_core::{ProductId, StoreId, StorefrontResult};

use crate::customer::CurrentUser;
use crate::service::{CustomerOrderService, OrderSearchCriteria};

/// Number of most recent orders consulted.
pub const DEFAULT_PURCHASE_HISTORY_WINDOW: usize = 5;

/// Outcome of resolving the purchase restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseRestriction {
    /// Flag off or anonymous shopper: the search is left unrestricted.
    NotApplied,
    /// Restrict to exactly these products. Empty matches nothing.
    Restricted(BTreeSet<ProductId>),
}

impl PurchaseRestriction {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Restricted(_))
    }

    pub fn apply_to(&self, criteria: &mut ProductSearchCriteria) {
        if let Self::Restricted(ids) = self {
            criteria.restrict_to(ids.clone());
        }
    }
}

pub struct PurchaseHistoryRestrictor {
    orders: Arc<dyn CustomerOrderService>,
    window: usize,
}

impl core::fmt::Debug for PurchaseHistoryRestrictor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PurchaseHistoryRestrictor")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl PurchaseHistoryRestrictor {
    pub fn new(orders: Arc<dyn CustomerOrderService>) -> Self {
        Self::with_window(orders, DEFAULT_PURCHASE_HISTORY_WINDOW)
    }

    /// Narrower history window. Clamped to `1..=DEFAULT_PURCHASE_HISTORY_WINDOW`.
    pub fn with_window(orders: Arc<dyn CustomerOrderService>, window: usize) -> Self {
        Self {
            orders,
            window: window.clamp(1, DEFAULT_PURCHASE_HISTORY_WINDOW),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Work out the restriction without touching any criteria.
    pub async fn resolve(
        &self,
        user: &CurrentUser,
        store_id: StoreId,
        only_purchased: bool,
    ) -> StorefrontResult<PurchaseRestriction> {
        if !only_purchased || !user.is_registered {
            tracing::debug!(
                only_purchased,
                registered = user.is_registered,
                "purchase history restriction not applied"
            );
            return Ok(PurchaseRestriction::NotApplied);
        }

        let query = OrderSearchCriteria::most_recent(user.id, store_id, self.window);
        let mut orders = self.orders.search_orders(&query).await?;

        // The backend is asked for newest-first; enforce the window here too.
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(self.window);

        let ids: BTreeSet<ProductId> = orders.iter().flat_map(|o| o.product_ids()).collect();

        tracing::debug!(
            customer_id = %user.id,
            store_id = %store_id,
            orders = orders.len(),
            products = ids.len(),
            "purchase history restriction resolved"
        );

        Ok(PurchaseRestriction::Restricted(ids))
    }

    /// Resolve and apply to `criteria` using its `only_purchased` flag.
    pub async fn restrict(
        &self,
        user: &CurrentUser,
        store_id: StoreId,
        criteria: &mut ProductSearchCriteria,
    ) -> StorefrontResult<PurchaseRestriction> {
        let restriction = self.resolve(user, store_id, criteria.only_purchased).await?;
        restriction.apply_to(criteria);
        Ok(restriction)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use storefront_core::{CustomerId, StorefrontError};

    use super::*;
    use crate::order::{ConfiguredGroup, CustomerOrder, LineItem};
    use crate::service::InMemoryOrderService;

    /// Returns its orders verbatim (no filtering/sorting) and counts queries.
    #[derive(Default)]
    struct RawOrderService {
        orders: Vec<CustomerOrder>,
        calls: AtomicUsize,
        last_query: Mutex<Option<OrderSearchCriteria>>,
        fail: bool,
    }

    #[async_trait]
    impl CustomerOrderService for RawOrderService {
        async fn search_orders(
            &self,
            criteria: &OrderSearchCriteria,
        ) -> StorefrontResult<Vec<CustomerOrder>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(criteria.clone());
            if self.fail {
                return Err(StorefrontError::upstream("orders api down"));
            }
            Ok(self.orders.clone())
        }
    }

    fn shopper() -> CurrentUser {
        CurrentUser::registered(CustomerId::new(), "ada")
    }

    /// `count` orders one day apart, oldest first, each with one unique
    /// line-item product. Returns the orders and their product ids.
    fn history(
        user: &CurrentUser,
        store: StoreId,
        count: i64,
    ) -> (Vec<CustomerOrder>, Vec<ProductId>) {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        (0..count)
            .map(|day| {
                let product = ProductId::new();
                let order = CustomerOrder::new(
                    format!("CO-{day}"),
                    user.id,
                    store,
                    start + Duration::days(day),
                )
                .with_item(LineItem::new(product, format!("Item {day}"), 1));
                (order, product)
            })
            .unzip()
    }

    #[tokio::test]
    async fn only_the_five_newest_orders_contribute() {
        let user = shopper();
        let store = StoreId::new();
        let (orders, products) = history(&user, store, 8);

        let service = Arc::new(InMemoryOrderService::new());
        // Insert out of chronological order.
        for order in orders.iter().rev().step_by(2).chain(orders.iter().step_by(2)) {
            service.add_order(order.clone()).unwrap();
        }
        let restrictor = PurchaseHistoryRestrictor::new(service);

        let restriction = restrictor.resolve(&user, store, true).await.unwrap();

        let expected: BTreeSet<_> = products[3..].iter().copied().collect();
        assert_eq!(restriction, PurchaseRestriction::Restricted(expected));
        for oldest in &products[..3] {
            match &restriction {
                PurchaseRestriction::Restricted(ids) => assert!(!ids.contains(oldest)),
                PurchaseRestriction::NotApplied => panic!("expected restriction"),
            }
        }
    }

    #[tokio::test]
    async fn window_is_enforced_even_if_backend_returns_everything_unsorted() {
        let user = shopper();
        let store = StoreId::new();
        let (mut orders, products) = history(&user, store, 8);
        orders.reverse();
        orders.swap(0, 7);
        let service = Arc::new(RawOrderService {
            orders,
            ..RawOrderService::default()
        });
        let restrictor = PurchaseHistoryRestrictor::new(service.clone());

        let restriction = restrictor.resolve(&user, store, true).await.unwrap();

        let expected: BTreeSet<_> = products[3..].iter().copied().collect();
        assert_eq!(restriction, PurchaseRestriction::Restricted(expected));

        let query = service.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.take, 5);
        assert_eq!(query.store_ids, vec![store]);
        assert_eq!(query.customer_id, user.id);
        assert_eq!(query.sort, vec![storefront_paging::SortInfo::desc("CreatedDate")]);
    }

    #[tokio::test]
    async fn window_cannot_be_widened_past_five_orders() {
        let user = shopper();
        let store = StoreId::new();
        let (orders, products) = history(&user, store, 8);
        let service = Arc::new(RawOrderService {
            orders,
            ..RawOrderService::default()
        });
        let restrictor = PurchaseHistoryRestrictor::with_window(service.clone(), 8);
        assert_eq!(restrictor.window(), DEFAULT_PURCHASE_HISTORY_WINDOW);

        let restriction = restrictor.resolve(&user, store, true).await.unwrap();

        let expected: BTreeSet<_> = products[3..].iter().copied().collect();
        assert_eq!(restriction, PurchaseRestriction::Restricted(expected));
        assert_eq!(service.last_query.lock().unwrap().as_ref().map(|q| q.take), Some(5));
    }

    #[tokio::test]
    async fn narrower_window_reads_fewer_orders() {
        let user = shopper();
        let store = StoreId::new();
        let (orders, products) = history(&user, store, 4);
        let service = Arc::new(InMemoryOrderService::new());
        for order in orders {
            service.add_order(order).unwrap();
        }
        let restrictor = PurchaseHistoryRestrictor::with_window(service, 2);

        let restriction = restrictor.resolve(&user, store, true).await.unwrap();

        let expected: BTreeSet<_> = products[2..].iter().copied().collect();
        assert_eq!(restriction, PurchaseRestriction::Restricted(expected));
    }

    #[tokio::test]
    async fn configured_groups_are_included_and_ids_deduplicated() {
        let user = shopper();
        let store = StoreId::new();
        let shared = ProductId::new();
        let bundle = ProductId::new();
        let now = Utc::now();
        let service = Arc::new(InMemoryOrderService::new());
        service
            .add_order(
                CustomerOrder::new("CO-1", user.id, store, now)
                    .with_item(LineItem::new(shared, "Lamp", 1))
                    .with_configured_group(ConfiguredGroup {
                        product_id: bundle,
                        quantity: 1,
                    }),
            )
            .unwrap();
        service
            .add_order(
                CustomerOrder::new("CO-2", user.id, store, now - Duration::hours(1))
                    .with_item(LineItem::new(shared, "Lamp", 2)),
            )
            .unwrap();
        let restrictor = PurchaseHistoryRestrictor::new(service);

        let restriction = restrictor.resolve(&user, store, true).await.unwrap();

        assert_eq!(
            restriction,
            PurchaseRestriction::Restricted([shared, bundle].into_iter().collect())
        );
    }

    #[tokio::test]
    async fn registered_shopper_without_orders_gets_empty_restriction() {
        let service = Arc::new(InMemoryOrderService::new());
        let restrictor = PurchaseHistoryRestrictor::new(service);
        let mut criteria = ProductSearchCriteria {
            only_purchased: true,
            ..ProductSearchCriteria::default()
        };

        let restriction = restrictor
            .restrict(&shopper(), StoreId::new(), &mut criteria)
            .await
            .unwrap();

        assert!(restriction.is_applied());
        assert_eq!(criteria.object_ids, Some(BTreeSet::new()));
    }

    #[tokio::test]
    async fn flag_off_is_a_no_op_without_querying_orders() {
        let service = Arc::new(RawOrderService::default());
        let restrictor = PurchaseHistoryRestrictor::new(service.clone());
        let mut criteria = ProductSearchCriteria::default();

        let restriction = restrictor
            .restrict(&shopper(), StoreId::new(), &mut criteria)
            .await
            .unwrap();

        assert_eq!(restriction, PurchaseRestriction::NotApplied);
        assert_eq!(criteria.object_ids, None);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn anonymous_shopper_is_a_no_op_without_querying_orders() {
        let service = Arc::new(RawOrderService::default());
        let restrictor = PurchaseHistoryRestrictor::new(service.clone());
        let mut criteria = ProductSearchCriteria {
            only_purchased: true,
            ..ProductSearchCriteria::default()
        };

        let restriction = restrictor
            .restrict(&CurrentUser::anonymous(), StoreId::new(), &mut criteria)
            .await
            .unwrap();

        assert_eq!(restriction, PurchaseRestriction::NotApplied);
        assert!(!criteria.is_restricted());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn order_service_failure_propagates_and_leaves_criteria_alone() {
        let service = Arc::new(RawOrderService {
            fail: true,
            ..RawOrderService::default()
        });
        let restrictor = PurchaseHistoryRestrictor::new(service);
        let mut criteria = ProductSearchCriteria {
            only_purchased: true,
            ..ProductSearchCriteria::default()
        };

        let err = restrictor
            .restrict(&shopper(), StoreId::new(), &mut criteria)
            .await
            .unwrap_err();

        assert_eq!(err, StorefrontError::upstream("orders api down"));
        assert!(!criteria.is_restricted());
    }
}
