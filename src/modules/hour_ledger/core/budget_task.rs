// Budget task document. Only the counters the ledger maintains are typed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTask {
    pub id: String,
    #[serde(default)]
    pub actual_minutes: i64,
    #[serde(default)]
    pub actual_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BudgetTask {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}
