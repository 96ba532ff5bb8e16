//! The shared search result that lazy product fetches bind into.
//!
//! A renderer may hold an `Arc<CatalogSearchResult>` long before any product
//! page has been fetched. Fetches therefore never hand out a new result: they
//! overwrite the fields of the existing one through [`ResultBinder`], and the
//! renderer sees the new data through the reference it already holds.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::criteria::ProductSearchCriteria;
use crate::product::Product;

/// One facet value and its hit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationItem {
    pub value: String,
    pub count: u64,
    pub is_applied: bool,
}

/// Facet over one product field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub field: String,
    pub items: Vec<AggregationItem>,
}

/// Output slot written by a fetch.
///
/// `bind` must update the receiver in place; it takes `&self` so the slot can
/// be shared (`Arc`) between the fetcher and any number of readers.
pub trait ResultBinder: Send + Sync {
    type Item;
    type Aggregation;

    fn bind(&self, items: Vec<Self::Item>, aggregations: Vec<Self::Aggregation>, total_count: u64);
}

/// Products, aggregations and context for one logical search.
#[derive(Debug)]
pub struct CatalogSearchResult {
    criteria: ProductSearchCriteria,
    category: Option<Category>,
    products: RwLock<Vec<Product>>,
    aggregations: RwLock<Vec<Aggregation>>,
    total_count: RwLock<Option<u64>>,
}

impl CatalogSearchResult {
    /// Create the (still empty) result for a search, ready to be shared.
    pub fn shared(criteria: ProductSearchCriteria, category: Option<Category>) -> Arc<Self> {
        Arc::new(Self {
            criteria,
            category,
            products: RwLock::new(Vec::new()),
            aggregations: RwLock::new(Vec::new()),
            total_count: RwLock::new(None),
        })
    }

    pub fn criteria(&self) -> &ProductSearchCriteria {
        &self.criteria
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    /// Snapshot of the most recently bound products.
    pub fn products(&self) -> Vec<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the most recently bound aggregations.
    pub fn aggregations(&self) -> Vec<Aggregation> {
        self.aggregations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `None` until the first bind.
    pub fn total_count(&self) -> Option<u64> {
        *self.total_count.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_bound(&self) -> bool {
        self.total_count().is_some()
    }
}

impl ResultBinder for CatalogSearchResult {
    type Item = Product;
    type Aggregation = Aggregation;

    fn bind(&self, items: Vec<Product>, aggregations: Vec<Aggregation>, total_count: u64) {
        *self.products.write().unwrap_or_else(PoisonError::into_inner) = items;
        *self.aggregations.write().unwrap_or_else(PoisonError::into_inner) = aggregations;
        *self.total_count.write().unwrap_or_else(PoisonError::into_inner) = Some(total_count);
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::ProductId;

    use super::*;

    #[test]
    fn new_result_is_unbound() {
        let result = CatalogSearchResult::shared(ProductSearchCriteria::default(), None);
        assert!(!result.is_bound());
        assert!(result.products().is_empty());
        assert_eq!(result.total_count(), None);
    }

    #[test]
    fn bind_is_visible_through_previously_captured_reference() {
        let result = CatalogSearchResult::shared(ProductSearchCriteria::default(), None);
        let captured = Arc::clone(&result);

        let product = Product::new(ProductId::new(), "SKU-1", "Lamp");
        let aggregation = Aggregation {
            field: "Brand".to_string(),
            items: vec![AggregationItem {
                value: "Lumo".to_string(),
                count: 1,
                is_applied: false,
            }],
        };
        result.bind(vec![product.clone()], vec![aggregation.clone()], 1);

        assert!(Arc::ptr_eq(&captured, &result));
        assert_eq!(captured.products(), vec![product]);
        assert_eq!(captured.aggregations(), vec![aggregation]);
        assert_eq!(captured.total_count(), Some(1));
    }

    #[test]
    fn rebinding_overwrites_previous_page() {
        let result = CatalogSearchResult::shared(ProductSearchCriteria::default(), None);
        result.bind(vec![Product::new(ProductId::new(), "A", "A")], vec![], 2);
        let second = Product::new(ProductId::new(), "B", "B");
        result.bind(vec![second.clone()], vec![], 2);

        assert_eq!(result.products(), vec![second]);
    }
}
