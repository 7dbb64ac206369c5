use async_graphql::{Context, ID, Object, Result as GqlResult};

use crate::modules::hour_ledger::use_cases::reconcile_entry_change::inbound::graphql::{
    GqlReconcileOutcome, TimeEntryInput,
};
use crate::modules::hour_ledger::use_cases::write_time_entry::command::WriteTimeEntry;
use crate::shell::state::AppState;

#[derive(Default)]
pub struct WriteTimeEntryMutation;

#[Object]
impl WriteTimeEntryMutation {
    /// Creates or replaces a timesheet entry and reconciles the ledger.
    async fn put_time_entry(
        &self,
        context: &Context<'_>,
        entry_id: ID,
        entry: TimeEntryInput,
    ) -> GqlResult<GqlReconcileOutcome> {
        let state = context.data_unchecked::<AppState>();
        let outcome = state
            .write_handler
            .handle(WriteTimeEntry::Put {
                entry_id: entry_id.0,
                entry: entry.into(),
            })
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(outcome.into())
    }

    async fn delete_time_entry(
        &self,
        context: &Context<'_>,
        entry_id: ID,
    ) -> GqlResult<GqlReconcileOutcome> {
        let state = context.data_unchecked::<AppState>();
        let outcome = state
            .write_handler
            .handle(WriteTimeEntry::Delete {
                entry_id: entry_id.0,
            })
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(outcome.into())
    }
}
