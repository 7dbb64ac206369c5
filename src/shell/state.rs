use crate::modules::hour_ledger::adapters::outbound::ledger_queries::StoreLedgerQueries;
use crate::modules::hour_ledger::use_cases::get_client_ledger::queries_port::LedgerQueries;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::handler::{
    ReconcileEntryChangeHandler, ReconcilePolicy,
};
use crate::modules::hour_ledger::use_cases::write_time_entry::handler::WriteTimeEntryHandler;
use crate::shared::infrastructure::document_store::in_memory::InMemoryDocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub queries: Arc<dyn LedgerQueries + Send + Sync>,
    pub reconcile_handler: Arc<ReconcileEntryChangeHandler<InMemoryDocumentStore>>,
    pub write_handler: Arc<WriteTimeEntryHandler<InMemoryDocumentStore, InMemoryDocumentStore>>,
}

impl AppState {
    pub fn new(store: Arc<InMemoryDocumentStore>, policy: ReconcilePolicy) -> Self {
        let reconcile_handler = Arc::new(ReconcileEntryChangeHandler::new(store.clone(), policy));
        let write_handler = Arc::new(WriteTimeEntryHandler::new(
            store.clone(),
            reconcile_handler.clone(),
        ));
        Self {
            queries: Arc::new(StoreLedgerQueries::new(store)),
            reconcile_handler,
            write_handler,
        }
    }
}
