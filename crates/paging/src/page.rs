use serde::Serialize;

use crate::request::PagedFetchRequest;

/// One materialized page plus the total number of items across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedPage<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> FetchedPage<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Cut the page described by `request` out of an already complete
    /// sequence. The total is the length of the whole sequence.
    pub fn slice(all: Vec<T>, request: &PagedFetchRequest) -> Self {
        let total_count = all.len() as u64;
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.page_size()).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(skip).take(take).collect();
        Self { items, total_count }
    }
}
