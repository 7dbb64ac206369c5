// Timesheet entry document as seen by the ledger.
//
// Purpose
// - Carry the routing fields (client, service, stage, package, task) and the minutes an entry
//   posts, plus the overage flags the ledger writes back.
//
// Notes
// - Empty strings in routing fields are treated the same as absent fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub is_overage: bool,
    #[serde(default)]
    pub overage_minutes: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Borrowed view of the routing fields, with empty ids filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRouting<'a> {
    pub client_id: Option<&'a str>,
    pub service_id: Option<&'a str>,
    pub stage_id: Option<&'a str>,
    pub package_id: Option<&'a str>,
    pub task_id: Option<&'a str>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

impl TimeEntry {
    pub fn routing(&self) -> EntryRouting<'_> {
        EntryRouting {
            client_id: present(&self.client_id),
            service_id: present(&self.service_id),
            stage_id: present(&self.stage_id),
            package_id: present(&self.package_id),
            task_id: present(&self.task_id),
        }
    }

    /// Overage flags belong to the ledger. A caller's write keeps the flags of the stored
    /// document, and a new entry starts cleared.
    pub fn with_flags_of(self, stored: Option<&TimeEntry>) -> Self {
        let (is_overage, overage_minutes) =
            stored.map_or((false, 0.0), |s| (s.is_overage, s.overage_minutes));
        Self {
            is_overage,
            overage_minutes,
            ..self
        }
    }
}
