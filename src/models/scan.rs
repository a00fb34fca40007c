use serde::{Deserialize, Serialize};

use super::common::{Identified, Ref};
use super::stock::StockItem;

/// One consumed stock item in a scan recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanItem {
    pub item: Ref<StockItem>,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanImage {
    #[serde(alias = "_id")]
    pub id: String,
    pub url: String,
    pub description: Option<String>,
}

/// Scan catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scan {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    /// Server-derived Σ(stock price × quantity); read-only.
    pub actual_cost: f64,
    pub min_price: f64,
    pub items: Vec<ScanItem>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub images: Vec<ScanImage>,
}

fn default_true() -> bool {
    true
}

impl Identified for Scan {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanCategory {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Identified for ScanCategory {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Per-item result of `/scans/:id/stock-availability`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockRequirement {
    pub item_id: String,
    pub name: String,
    pub required: f64,
    pub available: f64,
    pub sufficient: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockAvailability {
    pub available: bool,
    pub items: Vec<StockRequirement>,
}

impl StockAvailability {
    pub fn shortages(&self) -> impl Iterator<Item = &StockRequirement> {
        self.items.iter().filter(|i| !i.sufficient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_items_accept_populated_stock() {
        let s: Scan = serde_json::from_str(
            r#"{"_id":"s1","name":"MRI Brain","actualCost":40,"minPrice":100,
                "items":[{"item":{"_id":"k1","name":"Contrast","price":20},"quantity":2},
                         {"item":"k2","quantity":1}]}"#,
        )
        .unwrap();
        assert_eq!(s.items.len(), 2);
        assert_eq!(s.items[0].item.id(), "k1");
        assert_eq!(s.items[1].item.id(), "k2");
        assert!(s.is_active);
    }

    #[test]
    fn shortages_lists_insufficient_items() {
        let a = StockAvailability {
            available: false,
            items: vec![
                StockRequirement {
                    item_id: "k1".into(),
                    sufficient: true,
                    ..Default::default()
                },
                StockRequirement {
                    item_id: "k2".into(),
                    sufficient: false,
                    ..Default::default()
                },
            ],
        };
        let short: Vec<_> = a.shortages().map(|i| i.item_id.as_str()).collect();
        assert_eq!(short, vec!["k2"]);
    }
}
