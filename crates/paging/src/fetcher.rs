//! The fetch seam behind a lazy collection.

use async_trait::async_trait;
use storefront_core::StorefrontResult;

use crate::page::FetchedPage;
use crate::request::PagedFetchRequest;

/// Materializes one page for a [`crate::LazyPagedCollection`].
///
/// Implementations may suspend (remote search, order history) and may have
/// side effects such as binding results into a shared output object. The
/// collection guarantees `fetch` is not re-run for a request equal to the one
/// it has cached.
///
/// Takes `&mut self` so a fetcher can memoize expensive per-operation state
/// (e.g. a resolved purchase restriction) across pages.
#[async_trait]
pub trait PageFetcher<T>: Send {
    async fn fetch(&mut self, request: &PagedFetchRequest) -> StorefrontResult<FetchedPage<T>>;
}

/// Adapter for synchronous, in-memory fetch functions.
pub struct FnFetcher<F>(F);

impl<F> FnFetcher<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> core::fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnFetcher")
    }
}

#[async_trait]
impl<T, F> PageFetcher<T> for FnFetcher<F>
where
    T: Send + 'static,
    F: FnMut(&PagedFetchRequest) -> StorefrontResult<FetchedPage<T>> + Send + 'static,
{
    async fn fetch(&mut self, request: &PagedFetchRequest) -> StorefrontResult<FetchedPage<T>> {
        (self.0)(request)
    }
}
