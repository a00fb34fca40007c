use serde::{Deserialize, Serialize};

use super::common::{Identified, Ref};
use super::doctor::Doctor;
use super::patient::Patient;

/// Clinical history record attached to a patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientHistoryEntry {
    #[serde(alias = "_id")]
    pub id: String,
    pub patient: Option<Ref<Patient>>,
    pub date: Option<String>,
    pub diagnosis: String,
    pub findings: Option<String>,
    pub notes: Option<String>,
    pub doctor: Option<Ref<Doctor>>,
}

impl Identified for PatientHistoryEntry {
    fn id(&self) -> &str {
        &self.id
    }
}
