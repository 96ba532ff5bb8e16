//! Breadcrumbs derived from the current search result's category outline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use storefront_core::StorefrontResult;
use storefront_paging::{FetchedPage, LazyPagedCollection, PagedFetchRequest, UNBOUNDED_PAGE_SIZE};

use crate::result::CatalogSearchResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub label: String,
    pub url: String,
}

/// One breadcrumb per outline step, root first. Empty for a search without a
/// category.
pub fn derive_breadcrumbs(result: &CatalogSearchResult) -> Vec<Breadcrumb> {
    result
        .category()
        .map(|category| {
            category
                .outline
                .items()
                .iter()
                .map(|item| Breadcrumb {
                    label: item.name.clone(),
                    url: item.url.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Lazy breadcrumbs: a single unbounded page holding every entry.
pub fn breadcrumb_collection(
    result: Arc<CatalogSearchResult>,
) -> StorefrontResult<LazyPagedCollection<Breadcrumb>> {
    lazy_breadcrumbs(result, derive_breadcrumbs)
}

fn lazy_breadcrumbs<D>(
    result: Arc<CatalogSearchResult>,
    mut derive: D,
) -> StorefrontResult<LazyPagedCollection<Breadcrumb>>
where
    D: FnMut(&CatalogSearchResult) -> Vec<Breadcrumb> + Send + 'static,
{
    LazyPagedCollection::from_fn(
        move |request: &PagedFetchRequest| Ok(FetchedPage::slice(derive(&result), request)),
        UNBOUNDED_PAGE_SIZE,
    )
}
