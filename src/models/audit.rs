use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::Identified;
use super::enums::AuditAction;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSnapshot {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub role: Option<String>,
}

/// One appointment audit record. `appointment` is absent once the
/// appointment has been deleted; `changes` is action-dependent JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    #[serde(alias = "_id", default)]
    pub id: String,
    pub action: AuditAction,
    #[serde(default)]
    pub user: Option<UserSnapshot>,
    #[serde(default)]
    pub appointment: Option<Value>,
    #[serde(default)]
    pub changes: Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl AuditEntry {
    pub fn actor(&self) -> String {
        self.user
            .as_ref()
            .map(|u| {
                if u.full_name.is_empty() {
                    u.username.clone()
                } else {
                    u.full_name.clone()
                }
            })
            .unwrap_or_default()
    }

    /// Server-formatted timestamp, falling back to the raw creation time.
    pub fn when(&self) -> String {
        self.timestamp
            .clone()
            .or_else(|| self.created_at.clone())
            .unwrap_or_default()
    }
}

impl Identified for AuditEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActiveUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionCount {
    #[serde(alias = "_id")]
    pub action: String,
    pub count: u64,
}

/// `/audit/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditStats {
    pub total_entries: u64,
    pub most_active_user: Option<ActiveUser>,
    pub most_common_action: Option<ActionCount>,
    pub action_counts: BTreeMap<String, u64>,
}
