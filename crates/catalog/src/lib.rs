//! Catalog browsing domain: products, categories, search criteria, the shared
//! search result that lazy fetches bind into, and breadcrumb derivation.
//!
//! The search backend is reached through [`CatalogService`]; an in-memory
//! implementation is provided for tests and local runs.

pub mod breadcrumbs;
pub mod category;
pub mod criteria;
pub mod product;
pub mod result;
pub mod service;

pub use breadcrumbs::{Breadcrumb, breadcrumb_collection, derive_breadcrumbs};
pub use category::{Category, CategoryResponseGroup, Outline, OutlineItem, SeoInfo};
pub use criteria::ProductSearchCriteria;
pub use product::{CatalogProperty, DISPLAY_NAME_PROPERTY, ItemResponseGroup, Product};
pub use result::{Aggregation, AggregationItem, CatalogSearchResult, ResultBinder};
pub use service::{CatalogService, InMemoryCatalogService, ProductSearchResult};
