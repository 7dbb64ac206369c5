// Write side of the timesheet collection.
//
// Purpose
// - Persist entry writes and deliver each resulting before/after pair to the ledger, the way the
//   hosted store's write-trigger does.
//
// Boundaries
// - The entry write and the ledger reconciliation are separate commits. A failed reconciliation
//   leaves the entry written; redelivering the same event id is safe.

use crate::modules::hour_ledger::use_cases::reconcile_entry_change::command::EntryWritten;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::handler::{
    ApplicationError, ReconcileEntryChangeHandler, ReconcileOutcome,
};
use crate::modules::hour_ledger::use_cases::write_time_entry::command::WriteTimeEntry;
use crate::shared::infrastructure::document_store::{LedgerStore, TimeEntryStore};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub struct WriteTimeEntryHandler<TEntries, TLedger>
where
    TEntries: TimeEntryStore + Send + Sync + 'static,
    TLedger: LedgerStore + Send + Sync + 'static,
{
    entries: Arc<TEntries>,
    reconcile: Arc<ReconcileEntryChangeHandler<TLedger>>,
}

impl<TEntries, TLedger> WriteTimeEntryHandler<TEntries, TLedger>
where
    TEntries: TimeEntryStore + Send + Sync + 'static,
    TLedger: LedgerStore + Send + Sync + 'static,
{
    pub fn new(entries: Arc<TEntries>, reconcile: Arc<ReconcileEntryChangeHandler<TLedger>>) -> Self {
        Self { entries, reconcile }
    }

    pub async fn handle(&self, command: WriteTimeEntry) -> Result<ReconcileOutcome, ApplicationError> {
        let entry_id = command.entry_id().to_string();
        let (before, after) = match command {
            WriteTimeEntry::Put { entry_id, entry } => {
                if entry.minutes < 0 {
                    return Err(ApplicationError::NegativeMinutes {
                        minutes: entry.minutes,
                    });
                }
                let before = self.entries.put_entry(&entry_id, entry.clone()).await?;
                let after = entry.with_flags_of(before.as_ref());
                (before, Some(after))
            }
            WriteTimeEntry::Delete { entry_id } => (self.entries.delete_entry(&entry_id).await?, None),
        };

        let event_id = Uuid::now_v7().to_string();
        debug!(entry_id = %entry_id, event_id = %event_id, "delivering entry write to the ledger");
        self.reconcile
            .handle(EntryWritten {
                entry_id,
                event_id: Some(event_id),
                before,
                after,
            })
            .await
    }
}
