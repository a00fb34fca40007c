use serde::{Deserialize, Serialize};

use super::common::Identified;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Representative {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(alias = "externalId")]
    pub id_number: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub doctors_count: u64,
    pub patients_count: u64,
}

fn default_true() -> bool {
    true
}

impl Identified for Representative {
    fn id(&self) -> &str {
        &self.id
    }
}

/// `/representatives/:id/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepresentativeStats {
    pub doctors_count: u64,
    pub patients_count: u64,
    pub appointments_count: u64,
    pub total_revenue: f64,
}
