use async_graphql::{EmptySubscription, MergedObject, Schema};

pub use crate::modules::hour_ledger::use_cases::get_client_ledger::inbound::graphql::QueryRoot;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::inbound::graphql::ReconcileMutation;
use crate::modules::hour_ledger::use_cases::write_time_entry::inbound::graphql::WriteTimeEntryMutation;
pub use crate::shell::state::AppState;

#[derive(MergedObject, Default)]
pub struct MutationRoot(ReconcileMutation, WriteTimeEntryMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot::default(), EmptySubscription)
        .data(state)
        .finish()
}
