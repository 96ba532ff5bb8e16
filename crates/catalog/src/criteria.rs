//! Product search criteria and the late-bound page merge.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use storefront_core::{ProductId, StorefrontResult};
use storefront_paging::{ExtraParams, PagedFetchRequest, SortInfo};

use crate::product::ItemResponseGroup;

/// Everything the search backend needs to answer a product query.
///
/// All fields are owned, so `clone()` yields a fully independent copy: paging,
/// sort and params on a clone can be changed without affecting the original
/// or its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSearchCriteria {
    pub keyword: Option<String>,
    /// Category outline path to search under.
    pub outline: Option<String>,
    /// Limit results to products from the shopper's recent orders.
    pub only_purchased: bool,
    /// `None` means unrestricted; `Some(empty)` matches nothing.
    pub object_ids: Option<BTreeSet<ProductId>>,
    pub page_number: u32,
    pub page_size: u32,
    /// Persistent sort expression (`field:ASC;other:DESC`).
    pub sort_by: Option<String>,
    pub response_group: ItemResponseGroup,
    pub params: ExtraParams,
}

impl ProductSearchCriteria {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn with_outline(mut self, outline: impl Into<String>) -> Self {
        self.outline = Some(outline.into());
        self
    }

    /// Only a missing or empty `sort_by` counts as unset. Whitespace is kept
    /// as a (no-op) persistent sort.
    pub fn has_sort(&self) -> bool {
        self.sort_by.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Parsed form of `sort_by` (empty when unset).
    pub fn sort_infos(&self) -> StorefrontResult<Vec<SortInfo>> {
        match self.sort_by.as_deref() {
            Some(expr) => SortInfo::parse_expression(expr),
            None => Ok(Vec::new()),
        }
    }

    /// Merge a page request:
    ///
    /// - paging is always taken from the request;
    /// - the request's sort only applies when no persistent `sort_by` is set;
    /// - request params are overlaid onto `params`, request keys winning.
    pub fn merge_page_request(&mut self, request: &PagedFetchRequest) {
        self.page_number = request.page_number();
        self.page_size = request.page_size();

        if !self.has_sort() && !request.sort().is_empty() {
            self.sort_by = Some(SortInfo::to_expression(request.sort()));
        }

        self.params.overlay(request.params());
    }

    /// [`Self::merge_page_request`] from loose arguments. Invalid paging fails
    /// before anything is written.
    pub fn merge(
        &mut self,
        page_number: u32,
        page_size: u32,
        sort: &[SortInfo],
        params: &ExtraParams,
    ) -> StorefrontResult<()> {
        let request =
            PagedFetchRequest::new(page_number, page_size, sort.to_vec(), params.clone())?;
        self.merge_page_request(&request);
        Ok(())
    }

    /// Restrict results to exactly `ids` (possibly none).
    pub fn restrict_to(&mut self, ids: BTreeSet<ProductId>) {
        self.object_ids = Some(ids);
    }

    pub fn is_restricted(&self) -> bool {
        self.object_ids.is_some()
    }
}

impl Default for ProductSearchCriteria {
    fn default() -> Self {
        Self {
            keyword: None,
            outline: None,
            only_purchased: false,
            object_ids: None,
            page_number: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
            sort_by: None,
            response_group: ItemResponseGroup::DEFAULT,
            params: ExtraParams::new(),
        }
    }
}
