use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseSortOrderError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 5;
pub const DEFAULT_SORT_BY: &str = "createdAt";

/// Stable identifier of a category.
///
/// The service sends `categoryId` either as a JSON string or as an integer; both are held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WireId {
            Text(String),
            Integer(i64),
        }

        match WireId::deserialize(deserializer)? {
            WireId::Text(text) => Ok(Self(text)),
            WireId::Integer(number) => Ok(Self(number.to_string())),
        }
    }
}

/// A category as the rest of the client sees it, with the identifier under a uniform `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub prefix: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Fields the service returned that this client does not model.
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, prefix: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.into(),
            prefix: prefix.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            created_at: None,
            extra: Map::new(),
        }
    }

    pub fn field_text(&self, field: CategoryField) -> String {
        match field {
            CategoryField::Prefix => self.prefix.clone(),
            CategoryField::Name => self.name.clone(),
            CategoryField::Description => self.description.clone().unwrap_or_default(),
            CategoryField::CreatedAt => self
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Columns a category can be displayed or sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Prefix,
    Name,
    Description,
    CreatedAt,
}

impl CategoryField {
    /// Columns shared by the list table, the detail view and the CLI output.
    pub const TABLE_COLUMNS: [CategoryField; 3] = [
        CategoryField::Prefix,
        CategoryField::Name,
        CategoryField::Description,
    ];

    pub const SORTABLE: [CategoryField; 3] = [
        CategoryField::CreatedAt,
        CategoryField::Name,
        CategoryField::Prefix,
    ];

    /// Wire name, used both as the column key and as the `sortBy` value.
    pub fn key(self) -> &'static str {
        match self {
            CategoryField::Prefix => "prefix",
            CategoryField::Name => "name",
            CategoryField::Description => "description",
            CategoryField::CreatedAt => "createdAt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryField::Prefix => "Prefix",
            CategoryField::Name => "Name",
            CategoryField::Description => "Description",
            CategoryField::CreatedAt => "Created",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        [
            CategoryField::Prefix,
            CategoryField::Name,
            CategoryField::Description,
            CategoryField::CreatedAt,
        ]
        .into_iter()
        .find(|field| field.key() == key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "Ascending",
            SortOrder::Desc => "Descending",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ParseSortOrderError(s.to_string())),
        }
    }
}

/// The five query parameters that select one page of categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub search_query: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: SortOrder::Asc,
            search_query: String::new(),
        }
    }
}

impl ListQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    /// Query-string pairs in the order the service documents them.
    pub fn query_pairs(&self) -> [(&'static str, String); 5] {
        [
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("sortOrder", self.sort_order.as_str().to_string()),
            ("searchQuery", self.search_query.clone()),
        ]
    }

    /// Number of pages needed for `total` rows; never less than one.
    pub fn page_count(&self, total: u64) -> u32 {
        let limit = u64::from(self.limit.max(1));
        let pages = total.div_ceil(limit).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// One page of normalized categories plus the server-reported total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPage {
    pub items: Vec<Category>,
    pub total: u64,
}

/// Accepts RFC 3339 strings or epoch milliseconds; anything else becomes `None`.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(Value::String(text)) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        Some(Value::Number(number)) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    };
    Ok(parsed)
}
