//! Customer orders as read-only input to catalog browsing, and the
//! purchase-history restriction built on them.

pub mod customer;
pub mod order;
pub mod restrictor;
pub mod service;

pub use customer::CurrentUser;
pub use order::{ConfiguredGroup, CustomerOrder, LineItem};
pub use restrictor::{
    DEFAULT_PURCHASE_HISTORY_WINDOW, PurchaseHistoryRestrictor, PurchaseRestriction,
};
pub use service::{CustomerOrderService, InMemoryOrderService, OrderSearchCriteria};
