//! Catalog browsing for the storefront: wires search criteria, purchase
//! history, lazy product pages and breadcrumbs into a render model.
//!
//! Nothing here runs a search eagerly. [`CatalogBrowsing`] returns a
//! [`CatalogPage`] whose collections fetch when the renderer first reads them.

pub mod browsing;
pub mod config;
pub mod context;
pub mod fetcher;

pub use browsing::{CatalogBrowsing, CatalogPage, CatalogTemplate};
pub use config::StorefrontConfig;
pub use context::{Store, WorkContext};
pub use fetcher::{ProductsFetcher, PurchaseScope};
