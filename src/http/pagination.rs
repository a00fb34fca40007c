//! Normalisation of paginated and single-entity response shapes.
//!
//! Lists arrive as `{data: {<items>, pagination}}`, `{<items>, pagination}`,
//! `{data: [...]}` or a bare array.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;
use crate::config::DEFAULT_PAGE_SIZE;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<T> Page<T> {
    /// Number of pages needed for `total` rows (at least one).
    pub fn page_count(&self) -> u32 {
        let limit = u64::from(self.limit.max(1));
        let pages = self.total.div_ceil(limit).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Normalise a list response. Items are read from `items_key`, then
    /// `items`, looking inside `data` first.
    pub fn from_value(value: Value, items_key: &str) -> Result<Self, ApiError> {
        let scope = match value.get("data") {
            Some(data) if data.is_object() || data.is_array() => data,
            _ => &value,
        };

        let raw_items = if scope.is_array() {
            scope.clone()
        } else {
            scope
                .get(items_key)
                .or_else(|| scope.get("items"))
                .or_else(|| value.get(items_key))
                .cloned()
                .unwrap_or(Value::Array(Vec::new()))
        };
        let items: Vec<T> = serde_json::from_value(raw_items)?;

        let pagination = |field: &str| -> Option<u64> {
            scope
                .pointer(&format!("/pagination/{field}"))
                .or_else(|| value.pointer(&format!("/pagination/{field}")))
                .or_else(|| scope.get(field))
                .and_then(Value::as_u64)
        };

        let total = pagination("total").unwrap_or(items.len() as u64);
        let page = pagination("page")
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(1);
        let limit = pagination("limit")
            .and_then(|l| u32::try_from(l).ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self {
            items,
            total,
            page,
            limit,
        })
    }
}

/// Extract one entity from `{data: x}`, `{data: {key: x}}`, `{key: x}` or `x`.
pub fn unwrap_entity<T: DeserializeOwned>(value: Value, key: &str) -> Result<T, ApiError> {
    let inner = match value {
        Value::Object(mut map) => {
            if let Some(data) = map.remove("data").filter(|d| !d.is_null()) {
                match data {
                    Value::Object(mut data_map) if data_map.contains_key(key) => {
                        data_map.remove(key).unwrap_or(Value::Null)
                    }
                    other => other,
                }
            } else if let Some(entity) = map.remove(key) {
                entity
            } else {
                Value::Object(map)
            }
        }
        other => other,
    };
    Ok(serde_json::from_value(inner)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        name: String,
    }

    #[test]
    fn reads_nested_data_shape() {
        let page: Page<Row> = Page::from_value(
            json!({"data": {"patients": [{"name": "Sara"}], "pagination": {"total": 31, "page": 2, "limit": 10}}}),
            "patients",
        )
        .unwrap();
        assert_eq!(page.items, vec![Row { name: "Sara".into() }]);
        assert_eq!(page.total, 31);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_count(), 4);
    }

    #[test]
    fn reads_flat_shape() {
        let page: Page<Row> = Page::from_value(
            json!({"items": [{"name": "a"}, {"name": "b"}], "pagination": {"total": 2}}),
            "doctors",
        )
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn bare_arrays_count_their_items() {
        let page: Page<Row> = Page::from_value(json!([{"name": "x"}]), "items").unwrap();
        assert_eq!(page.total, 1);
        let page: Page<Row> = Page::from_value(json!({"data": [{"name": "y"}]}), "items").unwrap();
        assert_eq!(page.items[0].name, "y");
    }

    #[test]
    fn missing_items_is_empty_page() {
        let page: Page<Row> = Page::from_value(json!({"data": {}}), "scans").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page_count(), 1);
    }

    #[test]
    fn unwraps_entity_shapes() {
        let a: Row = unwrap_entity(json!({"data": {"name": "a"}}), "patient").unwrap();
        let b: Row = unwrap_entity(json!({"patient": {"name": "b"}}), "patient").unwrap();
        let c: Row = unwrap_entity(json!({"name": "c"}), "patient").unwrap();
        let d: Row = unwrap_entity(json!({"data": {"patient": {"name": "d"}}}), "patient").unwrap();
        assert_eq!([a.name, b.name, c.name, d.name], ["a", "b", "c", "d"]);
    }

    #[test]
    fn malformed_items_are_decode_errors() {
        let err = Page::<Row>::from_value(json!({"items": [1, 2]}), "items").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
