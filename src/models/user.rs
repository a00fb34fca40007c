use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::common::Identified;
use super::enums::Role;

/// Module recognised for appointment privileges.
pub const APPOINTMENTS_MODULE: &str = "appointments";
/// Operation granting the appointment price override.
pub const MAKE_HUGE_SALE: &str = "makeHugeSale";

/// A (module, operation) pair recognised by the backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Privilege {
    pub module: String,
    pub operation: String,
}

impl Privilege {
    pub fn new(module: &str, operation: &str) -> Self {
        Self {
            module: module.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn huge_sale() -> Self {
        Self::new(APPOINTMENTS_MODULE, MAKE_HUGE_SALE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub last_login: Option<String>,
    pub privileges: Vec<Privilege>,
    pub two_factor_enabled: bool,
    /// Explicit flag some backends send alongside the role.
    pub is_super_admin: Option<bool>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Super-admins implicitly hold every privilege.
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin || self.is_super_admin == Some(true)
    }

    pub fn has_privilege(&self, module: &str, operation: &str) -> bool {
        self.is_super_admin()
            || self
                .privileges
                .iter()
                .any(|p| p.module == module && p.operation == operation)
    }

    /// Any privilege on `module`.
    pub fn has_module(&self, module: &str) -> bool {
        self.is_super_admin() || self.privileges.iter().any(|p| p.module == module)
    }

    /// Up to `limit` distinct modules, in first-seen order.
    pub fn module_preview(&self, limit: usize) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.privileges
            .iter()
            .filter(|p| seen.insert(p.module.clone()))
            .take(limit)
            .map(|p| p.module.clone())
            .collect()
    }

    /// Avatar initials: first letters of the first two words of the full
    /// name, falling back to the username.
    pub fn initials(&self) -> String {
        let source = if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        };
        source
            .split_whitespace()
            .take(2)
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Module → recognised operations, from `/meta/privileges`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrivilegeCatalog {
    pub modules: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogWire {
    Wrapped { modules: ModulesWire },
    Bare(ModulesWire),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModulesWire {
    Map(BTreeMap<String, Vec<String>>),
    List(Vec<ModuleEntry>),
}

#[derive(Deserialize)]
struct ModuleEntry {
    #[serde(alias = "name")]
    module: String,
    operations: Vec<String>,
}

impl<'de> Deserialize<'de> for PrivilegeCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let modules = match CatalogWire::deserialize(deserializer)? {
            CatalogWire::Wrapped { modules } | CatalogWire::Bare(modules) => modules,
        };
        let modules = match modules {
            ModulesWire::Map(map) => map,
            ModulesWire::List(list) => list
                .into_iter()
                .map(|entry| (entry.module, entry.operations))
                .collect(),
        };
        Ok(PrivilegeCatalog { modules })
    }
}

impl PrivilegeCatalog {
    /// Every (module, operation) pair, in module order.
    pub fn pairs(&self) -> Vec<Privilege> {
        self.modules
            .iter()
            .flat_map(|(module, ops)| ops.iter().map(move |op| Privilege::new(module, op)))
            .collect()
    }
}
