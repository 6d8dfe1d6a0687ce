use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{lenient_timestamp, Category, CategoryId, CategoryPage};

/// A category exactly as `GET /api/v1/categories` returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    pub category_id: CategoryId,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        Self {
            id: raw.category_id,
            prefix: raw.prefix,
            name: raw.name,
            description: raw.description,
            created_at: raw.created_at,
            extra: raw.extra,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCategoriesResponse {
    #[serde(default)]
    pub data: Vec<RawCategory>,
    #[serde(default)]
    pub total: u64,
}

impl From<ListCategoriesResponse> for CategoryPage {
    fn from(response: ListCategoriesResponse) -> Self {
        Self {
            items: response.data.into_iter().map(Category::from).collect(),
            total: response.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub prefix: String,
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_category_id_into_id_and_keeps_unknown_fields() {
        let body = r#"{
            "data": [{
                "categoryId": 42,
                "prefix": "ELC",
                "name": "Electronics",
                "description": null,
                "createdAt": "2024-05-01T08:30:00Z",
                "productCount": 3
            }],
            "total": 11
        }"#;

        let page: CategoryPage = serde_json::from_str::<ListCategoriesResponse>(body)
            .expect("list response")
            .into();

        assert_eq!(page.total, 11);
        let category = &page.items[0];
        assert_eq!(category.id, CategoryId::new("42"));
        assert_eq!(category.name, "Electronics");
        assert_eq!(category.description, None);
        assert!(category.created_at.is_some());
        assert_eq!(category.extra.get("productCount"), Some(&Value::from(3)));
    }

    #[test]
    fn unparseable_timestamp_does_not_reject_the_record() {
        let raw: RawCategory = serde_json::from_str(
            r#"{"categoryId":"a1","prefix":"X","name":"Y","createdAt":"yesterday"}"#,
        )
        .expect("raw category");
        assert_eq!(raw.created_at, None);
    }

    #[test]
    fn create_request_uses_camel_case_wire_names() {
        let request = CreateCategoryRequest {
            prefix: "BK".to_string(),
            name: "Books".to_string(),
            description: "Printed matter".to_string(),
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["prefix"], "BK");
        assert_eq!(json["description"], "Printed matter");
    }
}
