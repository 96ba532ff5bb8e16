//! Flattened, page-at-a-time enumeration of a lazy collection.

use storefront_core::StorefrontResult;

use crate::collection::LazyPagedCollection;
use crate::request::PagedFetchRequest;

/// Lazy cursor over every item of a [`LazyPagedCollection`].
///
/// Issues one fetch per page boundary and stops after a short page or once
/// the reported total has been covered. A failed fetch is returned to the
/// caller and the next call retries the same page.
pub struct PageWalk<'a, T> {
    collection: &'a mut LazyPagedCollection<T>,
    page_size: u32,
    next_page: u32,
    buffer: std::vec::IntoIter<T>,
    done: bool,
}

impl<'a, T> PageWalk<'a, T>
where
    T: Clone + Send + 'static,
{
    pub(crate) fn new(collection: &'a mut LazyPagedCollection<T>, page_size: u32) -> Self {
        Self {
            collection,
            page_size,
            next_page: 1,
            buffer: Vec::new().into_iter(),
            done: false,
        }
    }

    /// Next item, fetching the following page when the buffer runs dry.
    pub async fn next(&mut self) -> StorefrontResult<Option<T>> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Ok(Some(item));
            }
            if self.done {
                return Ok(None);
            }

            let request = PagedFetchRequest::page(self.next_page, self.page_size)?;
            let items = self.collection.load(request).await?.to_vec();
            let total = self.collection.known_total_count().unwrap_or(0);
            let covered = u64::from(self.next_page) * u64::from(self.page_size);

            let short_page = (items.len() as u64) < u64::from(self.page_size);
            if short_page || covered >= total || self.next_page == u32::MAX {
                self.done = true;
            } else {
                self.next_page += 1;
            }

            self.buffer = items.into_iter();
        }
    }

    /// Drain the remaining items into a vector.
    pub async fn collect_all(mut self) -> StorefrontResult<Vec<T>> {
        let mut out = Vec::new();
        while let Some(item) = self.next().await? {
            out.push(item);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use storefront_core::StorefrontError;

    use super::*;
    use crate::page::FetchedPage;

    fn numbers(len: u32, page_size: u32) -> (LazyPagedCollection<u32>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let collection = LazyPagedCollection::from_fn(
            move |req: &PagedFetchRequest| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(FetchedPage::slice((0..len).collect(), req))
            },
            page_size,
        )
        .unwrap();
        (collection, calls)
    }

    #[tokio::test]
    async fn walk_flattens_pages_in_order() {
        let (mut collection, calls) = numbers(23, 10);

        let all = collection.walk().collect_all().await.unwrap();

        assert_eq!(all, (0..23).collect::<Vec<_>>());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn walk_stops_on_exact_multiple_without_extra_fetch() {
        let (mut collection, calls) = numbers(20, 10);

        let all = collection.walk().collect_all().await.unwrap();

        assert_eq!(all.len(), 20);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn walk_is_lazy_per_page() {
        let (mut collection, calls) = numbers(25, 10);
        let mut walk = collection.walk();

        assert_eq!(walk.next().await.unwrap(), Some(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for _ in 1..10 {
            walk.next().await.unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(walk.next().await.unwrap(), Some(10));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn restarting_a_walk_refetches() {
        let (mut collection, calls) = numbers(15, 10);

        collection.walk().collect_all().await.unwrap();
        collection.walk().collect_all().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn walk_over_empty_collection_ends_after_one_fetch() {
        let (mut collection, calls) = numbers(0, 10);

        assert!(collection.walk().collect_all().await.unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn walk_error_is_retryable() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut collection = LazyPagedCollection::from_fn(
            move |req: &PagedFetchRequest| {
                // Second fetch (page 2, first attempt) fails.
                if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                    return Err(StorefrontError::upstream("timeout"));
                }
                Ok(FetchedPage::slice((0..4u32).collect(), req))
            },
            2,
        )
        .unwrap();
        let mut walk = collection.walk();

        assert_eq!(walk.next().await.unwrap(), Some(0));
        assert_eq!(walk.next().await.unwrap(), Some(1));
        assert!(walk.next().await.is_err());
        assert_eq!(walk.next().await.unwrap(), Some(2));
        assert_eq!(walk.next().await.unwrap(), Some(3));
        assert_eq!(walk.next().await.unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
