//! The lazy paged collection and its cache state machine.

use storefront_core::StorefrontResult;

use crate::fetcher::{FnFetcher, PageFetcher};
use crate::page::FetchedPage;
use crate::request::{ExtraParams, PagedFetchRequest, SortInfo};
use crate::walk::PageWalk;

/// Cache state.
///
/// - `Unfetched --load(r)--> Fetched(r)`
/// - `Fetched(a) --load(a)--> Fetched(a)` (cache hit, no fetch)
/// - `Fetched(a) --load(b)--> Fetched(b)`
///
/// A failed fetch leaves the state untouched.
enum PageState<T> {
    Unfetched,
    Fetched {
        request: PagedFetchRequest,
        page: FetchedPage<T>,
    },
}

/// A deferred paged view over `T`.
///
/// Nothing runs until a page or the total count is requested. Access is
/// single-owner and sequential (`&mut self`); sharing one collection across
/// tasks needs external synchronization around the whole fetch/cache step.
pub struct LazyPagedCollection<T> {
    fetcher: Box<dyn PageFetcher<T>>,
    default_page_size: u32,
    state: PageState<T>,
}

impl<T> core::fmt::Debug for LazyPagedCollection<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let cached = match &self.state {
            PageState::Unfetched => None,
            PageState::Fetched { request, page } => Some((request, page.total_count)),
        };
        f.debug_struct("LazyPagedCollection")
            .field("default_page_size", &self.default_page_size)
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> LazyPagedCollection<T> {
    /// Wrap a fetcher. Fails if `default_page_size` is zero.
    pub fn new(
        fetcher: impl PageFetcher<T> + 'static,
        default_page_size: u32,
    ) -> StorefrontResult<Self> {
        // Validates the default once so later default requests cannot fail.
        PagedFetchRequest::page(1, default_page_size)?;
        Ok(Self {
            fetcher: Box::new(fetcher),
            default_page_size,
            state: PageState::Unfetched,
        })
    }

    /// Wrap a synchronous fetch function.
    pub fn from_fn<F>(f: F, default_page_size: u32) -> StorefrontResult<Self>
    where
        F: FnMut(&PagedFetchRequest) -> StorefrontResult<FetchedPage<T>> + Send + 'static,
    {
        Self::new(FnFetcher::new(f), default_page_size)
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// Page 1 at the default page size, no sort, no params.
    pub fn default_request(&self) -> StorefrontResult<PagedFetchRequest> {
        PagedFetchRequest::page(1, self.default_page_size)
    }

    /// Fetch (or reuse) the page identified by the four request fields.
    ///
    /// Invalid paging fails before any state is touched.
    pub async fn get_page(
        &mut self,
        page_number: u32,
        page_size: u32,
        sort: &[SortInfo],
        params: &ExtraParams,
    ) -> StorefrontResult<&[T]> {
        let request =
            PagedFetchRequest::new(page_number, page_size, sort.to_vec(), params.clone())?;
        self.load(request).await
    }

    /// Fetch (or reuse) the page for an already-built request.
    pub async fn load(&mut self, request: PagedFetchRequest) -> StorefrontResult<&[T]> {
        let hit = matches!(
            &self.state,
            PageState::Fetched { request: cached, .. } if *cached == request
        );

        if hit {
            tracing::debug!(
                page_number = request.page_number(),
                page_size = request.page_size(),
                "page cache hit"
            );
        } else {
            tracing::debug!(
                page_number = request.page_number(),
                page_size = request.page_size(),
                sort = %SortInfo::to_expression(request.sort()),
                params = request.params().len(),
                "page cache miss; fetching"
            );

            let page = self.fetcher.fetch(&request).await.inspect_err(|err| {
                tracing::warn!(
                    page_number = request.page_number(),
                    error = %err,
                    "page fetch failed; cache left unchanged"
                );
            })?;

            self.state = PageState::Fetched { request, page };
        }

        Ok(self.cached_items().unwrap_or(&[]))
    }

    /// Default-request page (page 1).
    pub async fn first_page(&mut self) -> StorefrontResult<&[T]> {
        let request = self.default_request()?;
        self.load(request).await
    }

    /// Total item count, fetching the default page first if nothing has been
    /// fetched yet.
    pub async fn total_count(&mut self) -> StorefrontResult<u64> {
        if let Some(total) = self.known_total_count() {
            return Ok(total);
        }
        self.first_page().await?;
        Ok(self.known_total_count().unwrap_or(0))
    }

    /// `None` until a fetch has completed; never triggers a fetch.
    pub fn known_total_count(&self) -> Option<u64> {
        match &self.state {
            PageState::Unfetched => None,
            PageState::Fetched { page, .. } => Some(page.total_count),
        }
    }

    /// The cached page, if any; never triggers a fetch.
    pub fn cached_items(&self) -> Option<&[T]> {
        match &self.state {
            PageState::Unfetched => None,
            PageState::Fetched { page, .. } => Some(&page.items),
        }
    }

    /// The request whose page is currently cached.
    pub fn current_request(&self) -> Option<&PagedFetchRequest> {
        match &self.state {
            PageState::Unfetched => None,
            PageState::Fetched { request, .. } => Some(request),
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self.state, PageState::Fetched { .. })
    }

    /// Walk every item, page by page, at the default page size.
    ///
    /// Each call starts again from page 1 and re-issues fetches.
    pub fn walk(&mut self) -> PageWalk<'_, T>
    where
        T: Clone,
    {
        let page_size = self.default_page_size;
        PageWalk::new(self, page_size)
    }
}
