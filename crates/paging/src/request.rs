//! Page request value types: sort specification, extra parameters, and the
//! request tuple that keys the page cache.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use storefront_core::{StorefrontError, StorefrontResult};

/// Page size meaning "everything on one page".
pub const UNBOUNDED_PAGE_SIZE: u32 = u32::MAX;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// One `(field, direction)` sort term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortInfo {
    pub field: String,
    pub direction: SortDirection,
}

impl SortInfo {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Render a sort list as `field:ASC;other:DESC`.
    pub fn to_expression(sort: &[SortInfo]) -> String {
        sort.iter()
            .map(|s| format!("{}:{}", s.field, s.direction.as_str()))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Parse `field:ASC;other:DESC`. A missing direction means ascending.
    pub fn parse_expression(expression: &str) -> StorefrontResult<Vec<SortInfo>> {
        expression
            .split(';')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| {
                let (field, direction) = term.split_once(':').unwrap_or((term, ""));
                let field = field.trim();
                if field.is_empty() {
                    return Err(StorefrontError::validation(format!(
                        "sort term '{term}' has no field"
                    )));
                }
                let direction = SortDirection::parse(direction).ok_or_else(|| {
                    StorefrontError::validation(format!(
                        "sort term '{term}' has unknown direction"
                    ))
                })?;
                Ok(SortInfo::new(field, direction))
            })
            .collect()
    }
}

/// Typed value carried in [`ExtraParams`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Integer(i64),
    Text(String),
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

/// Typed key/value overlay attached to a page request.
///
/// Keys are kept ordered so two bags with the same entries compare (and
/// therefore cache) equal regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraParams(BTreeMap<String, ParamValue>);

impl ExtraParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` onto `self`: every key of `other` is written, so
    /// `other` wins on conflict; keys only present in `self` survive.
    pub fn overlay(&mut self, other: &ExtraParams) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ExtraParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Identifies one page query: `(page_number, page_size, sort, params)`.
///
/// Construction validates paging, so every value in circulation has
/// `page_number >= 1` and `page_size >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PagedFetchRequest {
    page_number: u32,
    page_size: u32,
    sort: Vec<SortInfo>,
    params: ExtraParams,
}

impl PagedFetchRequest {
    pub fn new(
        page_number: u32,
        page_size: u32,
        sort: Vec<SortInfo>,
        params: ExtraParams,
    ) -> StorefrontResult<Self> {
        if page_number < 1 {
            return Err(StorefrontError::invalid_request(
                "page_number must be at least 1",
            ));
        }
        if page_size < 1 {
            return Err(StorefrontError::invalid_request(
                "page_size must be at least 1",
            ));
        }
        Ok(Self {
            page_number,
            page_size,
            sort,
            params,
        })
    }

    /// Page `page_number` with no sort override and no extra params.
    pub fn page(page_number: u32, page_size: u32) -> StorefrontResult<Self> {
        Self::new(page_number, page_size, Vec::new(), ExtraParams::new())
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> &[SortInfo] {
        &self.sort
    }

    pub fn params(&self) -> &ExtraParams {
        &self.params
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }

    pub fn is_unbounded(&self) -> bool {
        self.page_size == UNBOUNDED_PAGE_SIZE
    }
}
