use serde::{Deserialize, Serialize};

use super::common::{Address, Identified, Ref};
use super::representative::Representative;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Doctor {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub license_number: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<Address>,
    pub experience: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub representative: Option<Ref<Representative>>,
}

fn default_true() -> bool {
    true
}

impl Doctor {
    /// Autocomplete label: `Dr. <name> — <specialization>`.
    pub fn option_label(&self) -> String {
        if self.specialization.trim().is_empty() {
            format!("Dr. {}", self.name)
        } else {
            format!("Dr. {} — {}", self.name, self.specialization)
        }
    }
}

impl Identified for Doctor {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_label_includes_specialization() {
        let d = Doctor {
            name: "Smith".into(),
            specialization: "Cardiology".into(),
            ..Doctor::default()
        };
        assert_eq!(d.option_label(), "Dr. Smith — Cardiology");
    }

    #[test]
    fn option_label_without_specialization() {
        let d = Doctor {
            name: "Smith".into(),
            ..Doctor::default()
        };
        assert_eq!(d.option_label(), "Dr. Smith");
    }
}
