// Startup data for the in-memory store.

use crate::modules::hour_ledger::core::budget_task::BudgetTask;
use crate::modules::hour_ledger::core::client::ClientRecord;
use crate::shared::infrastructure::document_store::in_memory::InMemoryDocumentStore;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub clients: Vec<ClientRecord>,
    #[serde(default)]
    pub budget_tasks: Vec<BudgetTask>,
}

impl Seed {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path.display()))
    }

    pub async fn load_into(self, store: &InMemoryDocumentStore) {
        let (clients, tasks) = (self.clients.len(), self.budget_tasks.len());
        for client in self.clients {
            store.insert_client(client).await;
        }
        for task in self.budget_tasks {
            store.insert_task(task).await;
        }
        tracing::info!(clients, tasks, "seeded document store");
    }
}
