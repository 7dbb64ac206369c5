use crate::modules::hour_ledger::core::time_entry::TimeEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum WriteTimeEntry {
    /// Creates the entry, or replaces it when the id already exists.
    Put { entry_id: String, entry: TimeEntry },
    Delete { entry_id: String },
}

impl WriteTimeEntry {
    pub fn entry_id(&self) -> &str {
        match self {
            WriteTimeEntry::Put { entry_id, .. } | WriteTimeEntry::Delete { entry_id } => entry_id,
        }
    }
}
