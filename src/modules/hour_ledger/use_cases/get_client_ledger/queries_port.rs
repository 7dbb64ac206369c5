use crate::modules::hour_ledger::use_cases::get_client_ledger::projection::{
    BudgetTaskView, ClientLedgerView,
};
use async_trait::async_trait;

#[async_trait]
pub trait LedgerQueries {
    async fn client_ledger(&self, client_id: &str) -> anyhow::Result<Option<ClientLedgerView>>;

    async fn budget_task(&self, task_id: &str) -> anyhow::Result<Option<BudgetTaskView>>;
}
