use serde::{Deserialize, Serialize};

use storefront_core::CategoryId;

/// How much of a category the backend should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryResponseGroup {
    Info,
    WithOutlines,
    WithSeo,
    Full,
}

impl CategoryResponseGroup {
    pub fn includes_outline(self) -> bool {
        matches!(self, Self::WithOutlines | Self::Full)
    }

    pub fn includes_seo(self) -> bool {
        matches!(self, Self::WithSeo | Self::Full)
    }
}

/// SEO metadata for a page or catalog entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoInfo {
    pub slug: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub language: Option<String>,
}

/// One step of a category outline, root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineItem {
    pub category_id: CategoryId,
    pub name: String,
    pub url: String,
}

/// Path from the catalog root down to (and including) a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outline(Vec<OutlineItem>);

impl Outline {
    pub fn new(items: Vec<OutlineItem>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[OutlineItem] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Search path form: category ids joined by `/`.
    pub fn path(&self) -> String {
        self.0
            .iter()
            .map(|item| item.category_id.to_string())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub code: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub outline: Outline,
    #[serde(default)]
    pub seo: SeoInfo,
}

impl Category {
    pub fn outline_path(&self) -> String {
        self.outline.path()
    }

    /// Copy trimmed down to what `group` asks for.
    pub fn for_response_group(&self, group: CategoryResponseGroup) -> Self {
        let mut category = self.clone();
        if !group.includes_outline() {
            category.outline = Outline::default();
        }
        if !group.includes_seo() {
            category.seo = SeoInfo::default();
        }
        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> OutlineItem {
        OutlineItem {
            category_id: CategoryId::new(),
            name: name.to_string(),
            url: format!("/{}", name.to_lowercase()),
        }
    }

    #[test]
    fn outline_path_joins_ids_root_first() {
        let root = item("Root");
        let leaf = item("Leaf");
        let outline = Outline::new(vec![root.clone(), leaf.clone()]);
        assert_eq!(outline.path(), format!("{}/{}", root.category_id, leaf.category_id));
    }

    #[test]
    fn info_group_drops_outline_and_seo() {
        let category = Category {
            id: CategoryId::new(),
            code: "shoes".to_string(),
            name: "Shoes".to_string(),
            url: "/shoes".to_string(),
            outline: Outline::new(vec![item("Shoes")]),
            seo: SeoInfo {
                slug: "shoes".to_string(),
                ..SeoInfo::default()
            },
        };

        let info = category.for_response_group(CategoryResponseGroup::Info);
        assert!(info.outline.is_empty());
        assert_eq!(info.seo, SeoInfo::default());

        let full = category.for_response_group(CategoryResponseGroup::Full);
        assert_eq!(full, category);
    }
}
