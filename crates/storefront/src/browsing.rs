//! Category and search pages.
//!
//! Browsing only prepares the page: it resolves the category, builds the
//! shared search result and wires lazy collections to it. Searches run when
//! the renderer first reads a collection.

use std::sync::Arc;

use serde::Serialize;

use storefront_catalog::{
    Breadcrumb, CatalogSearchResult, CatalogService, Category, CategoryResponseGroup, Product,
    ProductSearchCriteria, SeoInfo, breadcrumb_collection,
};
use storefront_core::{CategoryId, StorefrontError, StorefrontResult};
use storefront_orders::{CustomerOrderService, PurchaseHistoryRestrictor};
use storefront_paging::LazyPagedCollection;

use crate::config::StorefrontConfig;
use crate::context::WorkContext;
use crate::fetcher::{ProductsFetcher, PurchaseScope};

/// Template a catalog page renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CatalogTemplate {
    Search,
    Collection,
    CollectionList,
}

impl CatalogTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Collection => "collection",
            Self::CollectionList => "collection.list",
        }
    }

    /// Category template for a `view` query value. Missing means `grid`.
    pub fn for_view(view: Option<&str>) -> Self {
        match view {
            Some(view) if view.eq_ignore_ascii_case("list") => Self::CollectionList,
            _ => Self::Collection,
        }
    }
}

impl core::fmt::Display for CatalogTemplate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render model for a category or search page.
#[derive(Debug)]
pub struct CatalogPage {
    pub template: CatalogTemplate,
    pub category: Option<Category>,
    pub seo: Option<SeoInfo>,
    /// Written in place by every product fetch.
    pub search_result: Arc<CatalogSearchResult>,
    pub products: LazyPagedCollection<Product>,
    pub breadcrumbs: LazyPagedCollection<Breadcrumb>,
}

pub struct CatalogBrowsing {
    catalog: Arc<dyn CatalogService>,
    restrictor: Arc<PurchaseHistoryRestrictor>,
    config: StorefrontConfig,
}

impl core::fmt::Debug for CatalogBrowsing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogBrowsing")
            .field("restrictor", &self.restrictor)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CatalogBrowsing {
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        orders: Arc<dyn CustomerOrderService>,
        config: StorefrontConfig,
    ) -> StorefrontResult<Self> {
        config.validate()?;
        let restrictor = Arc::new(PurchaseHistoryRestrictor::with_window(
            orders,
            config.purchase_history_window,
        ));
        Ok(Self {
            catalog,
            restrictor,
            config,
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Prepare the page for one category.
    ///
    /// Fails with `NotFound` when the catalog does not know `category_id`.
    pub async fn browse_category(
        &self,
        ctx: &WorkContext,
        category_id: CategoryId,
        view: Option<&str>,
    ) -> StorefrontResult<CatalogPage> {
        let category = self
            .catalog
            .get_categories(&[category_id], CategoryResponseGroup::Full)
            .await?
            .into_iter()
            .next();
        let Some(category) = category else {
            tracing::warn!(category_id = %category_id, "category not found");
            return Err(StorefrontError::not_found(format!(
                "category {category_id} not found"
            )));
        };

        let mut seo = category.seo.clone();
        seo.slug = category.url.clone();
        if seo.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            seo.title = Some(category.name.clone());
        }

        let criteria = ctx
            .current_product_search_criteria
            .clone()
            .with_outline(category.outline_path());

        let template = CatalogTemplate::for_view(view);
        tracing::debug!(
            category_id = %category.id,
            template = %template,
            outline = criteria.outline.as_deref().unwrap_or_default(),
            "category page prepared"
        );

        self.prepare(ctx, template, criteria, Some(category), Some(seo))
    }

    /// Prepare the plain search page over the request's criteria.
    pub fn search(&self, ctx: &WorkContext) -> StorefrontResult<CatalogPage> {
        let criteria = ctx.current_product_search_criteria.clone();
        self.prepare(ctx, CatalogTemplate::Search, criteria, None, None)
    }

    fn prepare(
        &self,
        ctx: &WorkContext,
        template: CatalogTemplate,
        criteria: ProductSearchCriteria,
        category: Option<Category>,
        seo: Option<SeoInfo>,
    ) -> StorefrontResult<CatalogPage> {
        let search_result = CatalogSearchResult::shared(criteria.clone(), category.clone());

        let fetcher = ProductsFetcher::new(
            Arc::clone(&self.catalog),
            criteria,
            Arc::clone(&search_result),
        )
        .with_purchase_scope(PurchaseScope {
            restrictor: Arc::clone(&self.restrictor),
            user: ctx.current_user.clone(),
            store_id: ctx.current_store.id,
        });

        let products = LazyPagedCollection::new(fetcher, self.config.default_page_size)?;
        let breadcrumbs = breadcrumb_collection(Arc::clone(&search_result))?;

        Ok(CatalogPage {
            template,
            category,
            seo,
            search_result,
            products,
            breadcrumbs,
        })
    }
}
