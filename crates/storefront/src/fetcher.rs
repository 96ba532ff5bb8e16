//! The product page fetcher behind catalog browsing.

use std::sync::Arc;

use async_trait::async_trait;

use storefront_catalog::{
    Aggregation, CatalogService, ItemResponseGroup, Product, ProductSearchCriteria, ResultBinder,
};
use storefront_core::{StoreId, StorefrontResult};
use storefront_orders::{CurrentUser, PurchaseHistoryRestrictor, PurchaseRestriction};
use storefront_paging::{FetchedPage, PageFetcher, PagedFetchRequest};

/// Who and where to resolve the purchase restriction for.
#[derive(Debug, Clone)]
pub struct PurchaseScope {
    pub restrictor: Arc<PurchaseHistoryRestrictor>,
    pub user: CurrentUser,
    pub store_id: StoreId,
}

/// Fetches product pages for one logical search.
///
/// Per page: clone the base criteria, merge the page request, apply the
/// purchase restriction, search, bind the outcome into the shared result, and
/// return the page. The purchase restriction is resolved on the first fetch
/// and reused for later pages; a failed resolution is retried next time.
pub struct ProductsFetcher<B> {
    catalog: Arc<dyn CatalogService>,
    base: ProductSearchCriteria,
    purchase: Option<PurchaseScope>,
    restriction: Option<PurchaseRestriction>,
    result: Arc<B>,
}

impl<B> ProductsFetcher<B>
where
    B: ResultBinder<Item = Product, Aggregation = Aggregation> + 'static,
{
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        base: ProductSearchCriteria,
        result: Arc<B>,
    ) -> Self {
        Self {
            catalog,
            base,
            purchase: None,
            restriction: None,
            result,
        }
    }

    pub fn with_purchase_scope(mut self, scope: PurchaseScope) -> Self {
        self.purchase = Some(scope);
        self
    }

    async fn resolve_restriction(&self) -> StorefrontResult<PurchaseRestriction> {
        match &self.purchase {
            Some(scope) => {
                scope
                    .restrictor
                    .resolve(&scope.user, scope.store_id, self.base.only_purchased)
                    .await
            }
            None => Ok(PurchaseRestriction::NotApplied),
        }
    }
}

#[async_trait]
impl<B> PageFetcher<Product> for ProductsFetcher<B>
where
    B: ResultBinder<Item = Product, Aggregation = Aggregation> + 'static,
{
    async fn fetch(
        &mut self,
        request: &PagedFetchRequest,
    ) -> StorefrontResult<FetchedPage<Product>> {
        let mut criteria = self.base.clone();
        criteria.merge_page_request(request);
        criteria.response_group = ItemResponseGroup::DEFAULT | ItemResponseGroup::ITEM_PROPERTIES;

        let restriction = match self.restriction.take() {
            Some(resolved) => resolved,
            None => self.resolve_restriction().await?,
        };
        restriction.apply_to(&mut criteria);
        self.restriction = Some(restriction);

        let found = self.catalog.search_products(&criteria).await?;

        tracing::debug!(
            page_number = criteria.page_number,
            page_size = criteria.page_size,
            total = found.total_count,
            returned = found.products.len(),
            restricted = criteria.is_restricted(),
            "product page fetched"
        );

        self.result
            .bind(found.products.clone(), found.aggregations, found.total_count);

        Ok(FetchedPage::new(found.products, found.total_count))
    }
}
