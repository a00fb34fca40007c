use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::branch::Branch;
use super::common::{Identified, Ref};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockItem {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub branch: Option<Ref<Branch>>,
    pub quantity: f64,
    pub unit: String,
    pub minimum_threshold: f64,
    pub price: f64,
    pub valid_until: Option<String>,
}

impl StockItem {
    /// At or below the re-order threshold.
    pub fn is_low(&self) -> bool {
        self.quantity <= self.minimum_threshold
    }

    /// Expiry date strictly before `today`. Accepts plain dates and full
    /// ISO timestamps.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.valid_until_date().is_some_and(|d| d < today)
    }

    pub fn valid_until_date(&self) -> Option<NaiveDate> {
        let raw = self.valid_until.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.with_timezone(&Utc).date_naive())
        })
    }

    /// `"Contrast ($20.00 / ml)"`-style option label.
    pub fn option_label(&self) -> String {
        let price = crate::i18n::format_money(self.price);
        if self.unit.is_empty() {
            format!("{} ({price})", self.name)
        } else {
            format!("{} ({price} / {})", self.name, self.unit)
        }
    }
}

impl Identified for StockItem {
    fn id(&self) -> &str {
        &self.id
    }
}
