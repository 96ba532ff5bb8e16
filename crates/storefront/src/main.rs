//! Browses a small seeded catalog and prints the rendered page model as JSON.
//!
//! Usage: `storefront-browse [grid|list] [--purchased]`

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use serde_json::json;

use storefront::{CatalogBrowsing, Store, StorefrontConfig, WorkContext};
use storefront_catalog::{
    Category, InMemoryCatalogService, Outline, OutlineItem, Product, ProductSearchCriteria, SeoInfo,
};
use storefront_core::{CategoryId, CustomerId, ProductId, StoreId};
use storefront_orders::{CurrentUser, CustomerOrder, InMemoryOrderService, LineItem};

struct Seed {
    catalog: Arc<InMemoryCatalogService>,
    orders: Arc<InMemoryOrderService>,
    category_id: CategoryId,
    user: CurrentUser,
    store: Store,
}

fn seed() -> anyhow::Result<Seed> {
    let catalog = Arc::new(InMemoryCatalogService::new());
    let orders = Arc::new(InMemoryOrderService::new());

    let home = OutlineItem {
        category_id: CategoryId::new(),
        name: "Home".to_string(),
        url: "/home".to_string(),
    };
    let lighting = OutlineItem {
        category_id: CategoryId::new(),
        name: "Lighting".to_string(),
        url: "/home/lighting".to_string(),
    };
    let category = Category {
        id: lighting.category_id,
        code: "lighting".to_string(),
        name: "Lighting".to_string(),
        url: lighting.url.clone(),
        outline: Outline::new(vec![home, lighting]),
        seo: SeoInfo {
            meta_description: Some("Lamps for every room".to_string()),
            ..SeoInfo::default()
        },
    };
    let outline = category.outline_path();
    let category_id = category.id;
    catalog.add_category(category)?;

    let mut product_ids = Vec::new();
    for (code, title, price, brand) in [
        ("LAMP-1", "Desk Lamp", 3_000, "Lumo"),
        ("LAMP-2", "Floor Lamp", 9_000, "Brite"),
        ("LAMP-3", "Wall Sconce", 4_500, "Lumo"),
    ] {
        let product = Product::new(ProductId::new(), code, title)
            .with_outline(outline.clone())
            .with_price(price)
            .with_property("Brand", brand);
        product_ids.push(product.id);
        catalog.add_product(product)?;
    }

    let user = CurrentUser::registered(CustomerId::new(), "demo");
    let store = Store {
        id: StoreId::new(),
        name: "Demo Store".to_string(),
    };
    if let Some(first) = product_ids.first() {
        orders.add_order(
            CustomerOrder::new("CO-1001", user.id, store.id, Utc::now() - Duration::days(2))
                .with_item(LineItem::new(*first, "Desk Lamp", 1)),
        )?;
    }

    Ok(Seed {
        catalog,
        orders,
        category_id,
        user,
        store,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Subscriber first so config override warnings are not lost.
    storefront_observability::init();
    let config = StorefrontConfig::load().context("failed to load storefront config")?;
    tracing::info!(
        default_page_size = config.default_page_size,
        purchase_history_window = config.purchase_history_window,
        "storefront config loaded"
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let view = args.iter().find(|a| !a.starts_with("--")).map(String::as_str);
    let only_purchased = args.iter().any(|a| a == "--purchased");

    let seed = seed().context("failed to seed demo catalog")?;
    let browsing = CatalogBrowsing::new(seed.catalog, seed.orders, config)
        .context("invalid browsing configuration")?;

    let ctx = WorkContext::new(seed.user, seed.store).with_criteria(ProductSearchCriteria {
        only_purchased,
        sort_by: Some("price:ASC".to_string()),
        ..ProductSearchCriteria::default()
    });

    let mut page = browsing
        .browse_category(&ctx, seed.category_id, view)
        .await
        .context("failed to browse category")?;

    let products = page
        .products
        .first_page()
        .await
        .context("failed to fetch products")?
        .to_vec();
    let breadcrumbs = page
        .breadcrumbs
        .first_page()
        .await
        .context("failed to derive breadcrumbs")?
        .to_vec();

    let rendered = json!({
        "template": page.template.as_str(),
        "seo": page.seo,
        "total_count": page.search_result.total_count(),
        "products": products,
        "aggregations": page.search_result.aggregations(),
        "breadcrumbs": breadcrumbs,
    });
    println!("{}", serde_json::to_string_pretty(&rendered)?);

    tracing::info!(
        template = %page.template,
        products = products.len(),
        "catalog page rendered"
    );
    Ok(())
}
