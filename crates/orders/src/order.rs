use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_catalog::Product;
use storefront_core::{CustomerId, OrderId, ProductId, StoreId};

/// Order line: product, quantity, name captured at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    /// Catalog product, when the order was loaded with product details.
    #[serde(default)]
    pub product: Option<Product>,
}

impl LineItem {
    pub fn new(product_id: ProductId, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id,
            name: name.into(),
            quantity,
            product: None,
        }
    }

    /// The product's display name when known, otherwise the line name.
    pub fn localized_name(&self) -> &str {
        self.product
            .as_ref()
            .and_then(Product::display_name)
            .unwrap_or(&self.name)
    }
}

/// A configurable product bought as a group of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredGroup {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub id: OrderId,
    pub number: String,
    pub customer_id: CustomerId,
    pub store_id: StoreId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub configured_groups: Vec<ConfiguredGroup>,
}

impl CustomerOrder {
    pub fn new(
        number: impl Into<String>,
        customer_id: CustomerId,
        store_id: StoreId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            number: number.into(),
            customer_id,
            store_id,
            created_at,
            items: Vec::new(),
            configured_groups: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_configured_group(mut self, group: ConfiguredGroup) -> Self {
        self.configured_groups.push(group);
        self
    }

    /// Every product id on the order: line items first, then configured
    /// groups. May contain duplicates.
    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.items
            .iter()
            .map(|i| i.product_id)
            .chain(self.configured_groups.iter().map(|g| g.product_id))
    }
}
