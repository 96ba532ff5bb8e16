//! `storefront-core`: shared building blocks for the storefront crates.
//!
//! Identifiers and the error model. No I/O lives here.

pub mod error;
pub mod id;

pub use error::{StorefrontError, StorefrontResult};
pub use id::{CategoryId, CustomerId, OrderId, ProductId, StoreId};
