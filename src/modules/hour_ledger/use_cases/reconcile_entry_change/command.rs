use crate::modules::hour_ledger::core::time_entry::TimeEntry;
use serde::Deserialize;

/// One write-trigger delivery for a timesheet entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryWritten {
    pub entry_id: String,
    /// Delivery id, stable across redeliveries of the same write.
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub before: Option<TimeEntry>,
    #[serde(default)]
    pub after: Option<TimeEntry>,
}

impl EntryWritten {
    /// The state that carries the routing fields: the new document, or the deleted one.
    pub fn entry(&self) -> Option<&TimeEntry> {
        self.after.as_ref().or(self.before.as_ref())
    }
}
