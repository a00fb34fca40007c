use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `/dashboard/analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub total_patients: u64,
    pub total_doctors: u64,
    pub total_radiologists: u64,
    pub total_appointments: u64,
    pub today_appointments: u64,
    pub pending_appointments: u64,
    pub completed_appointments: u64,
    pub total_revenue: f64,
    pub low_stock_items: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PeriodCount {
    #[serde(alias = "_id", alias = "date")]
    pub label: String,
    pub count: u64,
}

/// `/dashboard/appointment-stats?period=`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentStats {
    pub period: String,
    pub series: Vec<PeriodCount>,
    pub by_status: BTreeMap<String, u64>,
}
