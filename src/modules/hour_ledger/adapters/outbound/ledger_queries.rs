// LedgerQueries served straight from the document store.
//
// The client document already is the materialized ledger, so the read side maps documents to
// views and adds the audit findings.

use crate::modules::hour_ledger::use_cases::get_client_ledger::projection::{
    BudgetTaskView, ClientLedgerView,
};
use crate::modules::hour_ledger::use_cases::get_client_ledger::queries_port::LedgerQueries;
use crate::shared::infrastructure::document_store::LedgerStore;
use async_trait::async_trait;
use std::sync::Arc;

pub struct StoreLedgerQueries<TStore>
where
    TStore: LedgerStore + Send + Sync + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> StoreLedgerQueries<TStore>
where
    TStore: LedgerStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<TStore> LedgerQueries for StoreLedgerQueries<TStore>
where
    TStore: LedgerStore + Send + Sync + 'static,
{
    async fn client_ledger(&self, client_id: &str) -> anyhow::Result<Option<ClientLedgerView>> {
        let client = self.store.get_client(client_id).await?;
        Ok(client.map(|c| ClientLedgerView::from(&c.value)))
    }

    async fn budget_task(&self, task_id: &str) -> anyhow::Result<Option<BudgetTaskView>> {
        let task = self.store.get_task(task_id).await?;
        Ok(task.map(|t| t.value.into()))
    }
}
