use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::ProductId;

/// Property carrying a product's localized display name.
pub const DISPLAY_NAME_PROPERTY: &str = "DisplayName";

/// Which parts of a product the search backend should populate.
///
/// A small bit set; combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemResponseGroup(u32);

impl ItemResponseGroup {
    pub const NONE: Self = Self(0);
    pub const ITEM_INFO: Self = Self(1);
    pub const ITEM_ASSETS: Self = Self(1 << 1);
    pub const ITEM_PROPERTIES: Self = Self(1 << 2);
    pub const OUTLINES: Self = Self(1 << 3);
    pub const SEO: Self = Self(1 << 4);
    pub const INVENTORY: Self = Self(1 << 5);
    pub const DEFAULT: Self = Self(
        Self::ITEM_INFO.0
            | Self::ITEM_ASSETS.0
            | Self::OUTLINES.0
            | Self::SEO.0
            | Self::INVENTORY.0,
    );

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for ItemResponseGroup {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl core::ops::BitOr for ItemResponseGroup {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Name/value catalog property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProperty {
    pub name: String,
    pub value: String,
}

impl CatalogProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Catalog product as returned by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub code: String,
    pub title: String,
    /// Category outline paths (`root/child/leaf` of category ids).
    pub outlines: Vec<String>,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub properties: Vec<CatalogProperty>,
    #[serde(default)]
    pub configurable_products: Vec<Product>,
}

impl Product {
    pub fn new(id: ProductId, code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            title: title.into(),
            outlines: Vec::new(),
            price: 0,
            currency: "USD".to_string(),
            created_at: Utc::now(),
            properties: Vec::new(),
            configurable_products: Vec::new(),
        }
    }

    pub fn with_outline(mut self, outline: impl Into<String>) -> Self {
        self.outlines.push(outline.into());
        self
    }

    pub fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(CatalogProperty::new(name, value));
        self
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Non-blank display name property, if present.
    pub fn display_name(&self) -> Option<&str> {
        self.property(DISPLAY_NAME_PROPERTY)
            .filter(|v| !v.trim().is_empty())
    }

    /// Display name when present, otherwise the title.
    pub fn localized_name(&self) -> &str {
        self.display_name().unwrap_or(&self.title)
    }

    /// Whether any outline of this product lies under `outline`.
    pub fn is_under(&self, outline: &str) -> bool {
        let outline = outline.trim_end_matches('/');
        self.outlines.iter().any(|own| {
            own == outline
                || own
                    .strip_prefix(outline)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new(ProductId::new(), "SKU-1", "Trail Shoe")
    }

    #[test]
    fn localized_name_prefers_display_name_property() {
        let p = product().with_property(DISPLAY_NAME_PROPERTY, "Chaussure de trail");
        assert_eq!(p.localized_name(), "Chaussure de trail");
    }

    #[test]
    fn blank_display_name_falls_back_to_title() {
        let p = product().with_property(DISPLAY_NAME_PROPERTY, "   ");
        assert_eq!(p.localized_name(), "Trail Shoe");
        assert_eq!(product().localized_name(), "Trail Shoe");
    }

    #[test]
    fn outline_match_respects_segment_boundaries() {
        let p = product().with_outline("root/shoes/trail");
        assert!(p.is_under("root"));
        assert!(p.is_under("root/shoes"));
        assert!(p.is_under("root/shoes/trail"));
        assert!(p.is_under("root/shoes/"));
        assert!(!p.is_under("root/sho"));
        assert!(!p.is_under("root/shoes/trail/extra"));
    }

    #[test]
    fn response_group_bits_combine() {
        let group = ItemResponseGroup::DEFAULT | ItemResponseGroup::ITEM_PROPERTIES;
        assert!(group.contains(ItemResponseGroup::ITEM_PROPERTIES));
        assert!(group.contains(ItemResponseGroup::SEO));
        assert!(!ItemResponseGroup::DEFAULT.contains(ItemResponseGroup::ITEM_PROPERTIES));
    }
}
