use serde::{Deserialize, Serialize};

use super::common::Identified;
use super::enums::Gender;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Radiologist {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub age: u32,
    pub phone_number: String,
    pub license_id: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Identified for Radiologist {
    fn id(&self) -> &str {
        &self.id
    }
}
