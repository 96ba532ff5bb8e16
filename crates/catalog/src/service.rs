//! Catalog search collaborator interface and an in-memory implementation.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use storefront_core::{CategoryId, StorefrontError, StorefrontResult};
use storefront_paging::{ParamValue, SortDirection, SortInfo};

use crate::category::{Category, CategoryResponseGroup};
use crate::criteria::ProductSearchCriteria;
use crate::product::{ItemResponseGroup, Product};
use crate::result::{Aggregation, AggregationItem};

/// One page of product search output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSearchResult {
    pub products: Vec<Product>,
    pub total_count: u64,
    pub aggregations: Vec<Aggregation>,
}

/// Search backend used by catalog browsing. May be remote.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Run a product search for one page of `criteria`.
    async fn search_products(
        &self,
        criteria: &ProductSearchCriteria,
    ) -> StorefrontResult<ProductSearchResult>;

    /// Load categories by id. Unknown ids are skipped, not reported.
    async fn get_categories(
        &self,
        ids: &[CategoryId],
        response_group: CategoryResponseGroup,
    ) -> StorefrontResult<Vec<Category>>;
}

/// In-memory catalog for tests/dev.
///
/// Filtering: outline prefix, object-id restriction, keyword (title/code,
/// case-insensitive) and text/list params matched against product properties
/// of the same name. Flag and integer params are ignored. Every property
/// present on the matching products becomes an aggregation.
#[derive(Debug, Default)]
pub struct InMemoryCatalogService {
    products: RwLock<Vec<Product>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl InMemoryCatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_product(&self, product: Product) -> StorefrontResult<()> {
        self.products
            .write()
            .map_err(|_| StorefrontError::upstream("catalog lock poisoned"))?
            .push(product);
        Ok(())
    }

    pub fn add_category(&self, category: Category) -> StorefrontResult<()> {
        self.categories
            .write()
            .map_err(|_| StorefrontError::upstream("catalog lock poisoned"))?
            .insert(category.id, category);
        Ok(())
    }

    fn matches(product: &Product, criteria: &ProductSearchCriteria) -> bool {
        if let Some(outline) = criteria.outline.as_deref() {
            if !product.is_under(outline) {
                return false;
            }
        }

        if let Some(ids) = &criteria.object_ids {
            if !ids.contains(&product.id) {
                return false;
            }
        }

        if let Some(keyword) = criteria.keyword.as_deref() {
            let keyword = keyword.to_lowercase();
            if !product.title.to_lowercase().contains(&keyword)
                && !product.code.to_lowercase().contains(&keyword)
            {
                return false;
            }
        }

        criteria.params.iter().all(|(key, value)| {
            let own = product.property(key);
            match value {
                ParamValue::Text(expected) => own.is_some_and(|v| v.eq_ignore_ascii_case(expected)),
                ParamValue::List(options) => {
                    own.is_some_and(|v| options.iter().any(|o| v.eq_ignore_ascii_case(o)))
                }
                ParamValue::Flag(_) | ParamValue::Integer(_) => true,
            }
        })
    }

    fn compare(a: &Product, b: &Product, sort: &[SortInfo]) -> Ordering {
        for term in sort {
            let ord = match term.field.to_ascii_lowercase().as_str() {
                "name" | "title" => a.localized_name().cmp(b.localized_name()),
                "price" => a.price.cmp(&b.price),
                "code" | "sku" => a.code.cmp(&b.code),
                "createddate" => a.created_at.cmp(&b.created_at),
                _ => Ordering::Equal,
            };
            let ord = match term.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    fn aggregate(products: &[Product], criteria: &ProductSearchCriteria) -> Vec<Aggregation> {
        let mut counts: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
        for product in products {
            for property in &product.properties {
                *counts
                    .entry(property.name.as_str())
                    .or_default()
                    .entry(property.value.as_str())
                    .or_default() += 1;
            }
        }

        counts
            .into_iter()
            .map(|(field, values)| Aggregation {
                field: field.to_string(),
                items: values
                    .into_iter()
                    .map(|(value, count)| AggregationItem {
                        value: value.to_string(),
                        count,
                        is_applied: match criteria.params.get(field) {
                            Some(ParamValue::Text(v)) => v.eq_ignore_ascii_case(value),
                            Some(ParamValue::List(vs)) => {
                                vs.iter().any(|v| v.eq_ignore_ascii_case(value))
                            }
                            _ => false,
                        },
                    })
                    .collect(),
            })
            .collect()
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalogService {
    async fn search_products(
        &self,
        criteria: &ProductSearchCriteria,
    ) -> StorefrontResult<ProductSearchResult> {
        if criteria.page_number < 1 || criteria.page_size < 1 {
            return Err(StorefrontError::invalid_request(
                "page_number and page_size must be at least 1",
            ));
        }
        let sort = criteria.sort_infos()?;

        let mut matching: Vec<Product> = {
            let products = self
                .products
                .read()
                .map_err(|_| StorefrontError::upstream("catalog lock poisoned"))?;
            products
                .iter()
                .filter(|p| Self::matches(p, criteria))
                .cloned()
                .collect()
        };

        matching.sort_by(|a, b| Self::compare(a, b, &sort));
        let aggregations = Self::aggregate(&matching, criteria);
        let total_count = matching.len() as u64;

        let skip = usize::try_from(
            u64::from(criteria.page_number - 1) * u64::from(criteria.page_size),
        )
        .unwrap_or(usize::MAX);
        let take = usize::try_from(criteria.page_size).unwrap_or(usize::MAX);
        let with_properties = criteria
            .response_group
            .contains(ItemResponseGroup::ITEM_PROPERTIES);

        let products = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|mut p| {
                if !with_properties {
                    p.properties.clear();
                }
                p
            })
            .collect();

        Ok(ProductSearchResult {
            products,
            total_count,
            aggregations,
        })
    }

    async fn get_categories(
        &self,
        ids: &[CategoryId],
        response_group: CategoryResponseGroup,
    ) -> StorefrontResult<Vec<Category>> {
        let categories = self
            .categories
            .read()
            .map_err(|_| StorefrontError::upstream("catalog lock poisoned"))?;
        Ok(ids
            .iter()
            .filter_map(|id| categories.get(id))
            .map(|c| c.for_response_group(response_group))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use storefront_core::ProductId;
    use storefront_paging::ExtraParams;

    use super::*;
    use crate::category::{Outline, SeoInfo};

    fn seeded() -> (InMemoryCatalogService, Vec<Product>) {
        let service = InMemoryCatalogService::new();
        let products = vec![
            Product::new(ProductId::new(), "LAMP-1", "Desk Lamp")
                .with_outline("root/lighting")
                .with_price(3000)
                .with_property("Brand", "Lumo"),
            Product::new(ProductId::new(), "LAMP-2", "Floor Lamp")
                .with_outline("root/lighting")
                .with_price(9000)
                .with_property("Brand", "Brite"),
            Product::new(ProductId::new(), "CHAIR-1", "Arm Chair")
                .with_outline("root/furniture")
                .with_price(12000)
                .with_property("Brand", "Lumo"),
        ];
        for p in &products {
            service.add_product(p.clone()).unwrap();
        }
        (service, products)
    }

    fn criteria() -> ProductSearchCriteria {
        ProductSearchCriteria {
            response_group: ItemResponseGroup::DEFAULT | ItemResponseGroup::ITEM_PROPERTIES,
            ..ProductSearchCriteria::default()
        }
    }

    #[tokio::test]
    async fn outline_filter_and_price_sort() {
        let (service, _) = seeded();
        let criteria = criteria()
            .with_outline("root/lighting")
            .with_sort_by("price:DESC");

        let result = service.search_products(&criteria).await.unwrap();

        let codes: Vec<_> = result.products.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["LAMP-2", "LAMP-1"]);
        assert_eq!(result.total_count, 2);
    }

    #[tokio::test]
    async fn empty_object_id_restriction_matches_nothing() {
        let (service, _) = seeded();
        let mut criteria = criteria();
        criteria.restrict_to(BTreeSet::new());

        let result = service.search_products(&criteria).await.unwrap();

        assert!(result.products.is_empty());
        assert_eq!(result.total_count, 0);
    }

    #[tokio::test]
    async fn object_id_restriction_narrows_results() {
        let (service, products) = seeded();
        let mut criteria = criteria();
        criteria.restrict_to([products[2].id].into_iter().collect());

        let result = service.search_products(&criteria).await.unwrap();

        assert_eq!(result.products, vec![products[2].clone()]);
    }

    #[tokio::test]
    async fn paging_keeps_total_and_aggregations_over_all_matches() {
        let (service, _) = seeded();
        let mut criteria = criteria().with_sort_by("code");
        criteria.page_size = 1;
        criteria.page_number = 2;
        criteria.params = ExtraParams::new().with("Brand", "Lumo");

        let result = service.search_products(&criteria).await.unwrap();

        assert_eq!(result.total_count, 2);
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.products[0].code, "LAMP-1");

        let brand = &result.aggregations[0];
        assert_eq!(brand.field, "Brand");
        assert_eq!(brand.items.len(), 1);
        assert!(brand.items[0].is_applied);
        assert_eq!(brand.items[0].count, 2);
    }

    #[tokio::test]
    async fn properties_are_stripped_without_property_response_group() {
        let (service, _) = seeded();
        let criteria = ProductSearchCriteria::default();

        let result = service.search_products(&criteria).await.unwrap();

        assert!(result.products.iter().all(|p| p.properties.is_empty()));
    }

    #[tokio::test]
    async fn unknown_categories_are_skipped() {
        let service = InMemoryCatalogService::new();
        let category = Category {
            id: CategoryId::new(),
            code: "c".to_string(),
            name: "C".to_string(),
            url: "/c".to_string(),
            outline: Outline::default(),
            seo: SeoInfo::default(),
        };
        service.add_category(category.clone()).unwrap();

        let found = service
            .get_categories(&[CategoryId::new(), category.id], CategoryResponseGroup::Full)
            .await
            .unwrap();

        assert_eq!(found, vec![category]);
    }
}
