use serde::{Deserialize, Serialize};

use super::common::Identified;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Branch {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub location: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub manager: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Identified for Branch {
    fn id(&self) -> &str {
        &self.id
    }
}
