//! Order history collaborator interface and an in-memory implementation.

use std::sync::RwLock;

use async_trait::async_trait;

use storefront_core::{CustomerId, StoreId, StorefrontError, StorefrontResult};
use storefront_paging::{SortDirection, SortInfo};

use crate::order::CustomerOrder;

/// Order history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSearchCriteria {
    pub customer_id: CustomerId,
    /// Empty means "any store".
    pub store_ids: Vec<StoreId>,
    pub sort: Vec<SortInfo>,
    /// Maximum number of orders to return.
    pub take: usize,
}

impl OrderSearchCriteria {
    /// Newest-first orders of one customer in one store.
    pub fn most_recent(customer_id: CustomerId, store_id: StoreId, take: usize) -> Self {
        Self {
            customer_id,
            store_ids: vec![store_id],
            sort: vec![SortInfo::desc("CreatedDate")],
            take,
        }
    }
}

/// Order history backend. May be remote.
#[async_trait]
pub trait CustomerOrderService: Send + Sync {
    async fn search_orders(
        &self,
        criteria: &OrderSearchCriteria,
    ) -> StorefrontResult<Vec<CustomerOrder>>;
}

/// In-memory order history for tests/dev.
///
/// Only `CreatedDate` is understood as a sort field; without it orders come
/// back in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryOrderService {
    orders: RwLock<Vec<CustomerOrder>>,
}

impl InMemoryOrderService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_order(&self, order: CustomerOrder) -> StorefrontResult<()> {
        self.orders
            .write()
            .map_err(|_| StorefrontError::upstream("order store lock poisoned"))?
            .push(order);
        Ok(())
    }
}

#[async_trait]
impl CustomerOrderService for InMemoryOrderService {
    async fn search_orders(
        &self,
        criteria: &OrderSearchCriteria,
    ) -> StorefrontResult<Vec<CustomerOrder>> {
        let mut orders: Vec<CustomerOrder> = self
            .orders
            .read()
            .map_err(|_| StorefrontError::upstream("order store lock poisoned"))?
            .iter()
            .filter(|o| o.customer_id == criteria.customer_id)
            .filter(|o| criteria.store_ids.is_empty() || criteria.store_ids.contains(&o.store_id))
            .cloned()
            .collect();

        let created_sort = criteria
            .sort
            .iter()
            .find(|s| s.field.eq_ignore_ascii_case("CreatedDate"));
        match created_sort.map(|s| s.direction) {
            Some(SortDirection::Descending) => {
                orders.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
            Some(SortDirection::Ascending) => orders.sort_by_key(|o| o.created_at),
            None => {}
        }

        orders.truncate(criteria.take);
        Ok(orders)
    }
}
