use serde::{Deserialize, Serialize};

use super::common::{Address, Identified, Ref};
use super::doctor::Doctor;
use super::enums::Gender;

/// Display snapshot of the referring doctor stored with a patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorSnapshot {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub specialization: String,
}

impl Identified for DoctorSnapshot {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Patient {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<Gender>,
    pub phone_number: Option<String>,
    pub social_number: Option<String>,
    pub address: Option<Address>,
    pub medical_history: Vec<String>,
    #[serde(alias = "doctor")]
    pub doctor_referred: Option<Ref<DoctorSnapshot>>,
    pub created_at: Option<String>,
}

impl Patient {
    /// Id of the referring doctor, if recorded.
    pub fn referring_doctor_id(&self) -> Option<&str> {
        self.doctor_referred.as_ref().map(Ref::id).filter(|id| !id.is_empty())
    }

    /// The referring doctor as an autocomplete selection. Only the id is
    /// guaranteed; name and specialization come from the populated snapshot.
    pub fn referring_doctor(&self) -> Option<Doctor> {
        let id = self.referring_doctor_id()?;
        let snapshot = self.doctor_referred.as_ref().and_then(Ref::populated);
        Some(Doctor {
            id: id.to_string(),
            name: snapshot.map(|s| s.name.clone()).unwrap_or_default(),
            specialization: snapshot.map(|s| s.specialization.clone()).unwrap_or_default(),
            ..Doctor::default()
        })
    }

    pub fn address_line(&self) -> String {
        self.address.as_ref().map(Address::one_line).unwrap_or_default()
    }
}

impl Identified for Patient {
    fn id(&self) -> &str {
        &self.id
    }
}
