//! Deferred, re-fetchable paged collections.
//!
//! A [`LazyPagedCollection`] does nothing until a consumer asks for a page.
//! It then runs its [`PageFetcher`] once per distinct [`PagedFetchRequest`]
//! and keeps the most recent page cached, so repeated reads with unchanged
//! parameters never re-run the (possibly expensive, possibly side-effecting)
//! fetch.

pub mod collection;
pub mod fetcher;
pub mod page;
pub mod request;
pub mod walk;

pub use collection::LazyPagedCollection;
pub use fetcher::{FnFetcher, PageFetcher};
pub use page::FetchedPage;
pub use request::{
    ExtraParams, PagedFetchRequest, ParamValue, SortDirection, SortInfo, UNBOUNDED_PAGE_SIZE,
};
pub use walk::PageWalk;
