use serde::{Deserialize, Serialize};

use storefront_catalog::ProductSearchCriteria;
use storefront_core::StoreId;
use storefront_orders::CurrentUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
}

/// Per-request state that browsing reads from.
///
/// `current_product_search_criteria` is the criteria parsed from the request;
/// browsing always works on clones of it.
#[derive(Debug, Clone)]
pub struct WorkContext {
    pub current_user: CurrentUser,
    pub current_store: Store,
    pub current_product_search_criteria: ProductSearchCriteria,
}

impl WorkContext {
    pub fn new(current_user: CurrentUser, current_store: Store) -> Self {
        Self {
            current_user,
            current_store,
            current_product_search_criteria: ProductSearchCriteria::default(),
        }
    }

    pub fn with_criteria(mut self, criteria: ProductSearchCriteria) -> Self {
        self.current_product_search_criteria = criteria;
        self
    }
}
