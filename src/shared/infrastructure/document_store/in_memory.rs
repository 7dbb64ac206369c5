// In memory implementation of the document store ports.
//
// Purpose
// - Support handler tests and local runs without the hosted store.
//
// Responsibilities
// - Hold every collection behind one lock so a batch commits atomically.
// - Enforce optimistic concurrency on client documents by version.
// - Apply task increments to the latest task document.
// - Simulate an unavailable backend and slow commits for race tests.

use crate::modules::hour_ledger::core::budget_task::BudgetTask;
use crate::modules::hour_ledger::core::client::ClientRecord;
use crate::modules::hour_ledger::core::time_entry::TimeEntry;
use crate::shared::core::primitives::round2;
use crate::shared::infrastructure::document_store::{
    LedgerStore, ProcessedOperation, StoreError, TimeEntryStore, Versioned, WriteBatch,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
struct Documents {
    clients: HashMap<String, Versioned<ClientRecord>>,
    tasks: HashMap<String, Versioned<BudgetTask>>,
    entries: HashMap<String, TimeEntry>,
    processed: HashMap<String, ProcessedOperation>,
}

#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Documents>,
    is_offline: bool,
    delay_commit_ms: u64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Sleeps before every commit, widening the window between reads and writes.
    pub fn set_delay_commit_ms(&mut self, ms: u64) {
        self.delay_commit_ms = ms;
    }

    pub async fn insert_client(&self, client: ClientRecord) {
        let mut documents = self.documents.write().await;
        let version = documents
            .clients
            .get(&client.id)
            .map(|c| c.version + 1)
            .unwrap_or(1);
        documents.clients.insert(
            client.id.clone(),
            Versioned {
                value: client,
                version,
            },
        );
    }

    pub async fn insert_task(&self, task: BudgetTask) {
        let mut documents = self.documents.write().await;
        let version = documents
            .tasks
            .get(&task.id)
            .map(|t| t.version + 1)
            .unwrap_or(1);
        documents.tasks.insert(
            task.id.clone(),
            Versioned {
                value: task,
                version,
            },
        );
    }

    pub async fn remove_task(&self, task_id: &str) {
        self.documents.write().await.tasks.remove(task_id);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("Document store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryDocumentStore {
    async fn get_client(
        &self,
        client_id: &str,
    ) -> Result<Option<Versioned<ClientRecord>>, StoreError> {
        self.ensure_online()?;
        Ok(self.documents.read().await.clients.get(client_id).cloned())
    }

    async fn get_task(&self, task_id: &str) -> Result<Option<Versioned<BudgetTask>>, StoreError> {
        self.ensure_online()?;
        Ok(self.documents.read().await.tasks.get(task_id).cloned())
    }

    async fn is_processed(&self, key: &str, now: i64) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let mut documents = self.documents.write().await;
        documents.processed.retain(|_, op| op.is_live(now));
        Ok(documents.processed.contains_key(key))
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.ensure_online()?;
        if self.delay_commit_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_commit_ms)).await;
        }
        let mut documents = self.documents.write().await;

        // validate everything before the first write
        let client_id = batch.client.client.id.clone();
        let current = documents
            .clients
            .get(&client_id)
            .ok_or_else(|| StoreError::MissingDocument {
                collection: "clients",
                id: client_id.clone(),
            })?;
        if current.version != batch.client.expected_version {
            return Err(StoreError::VersionMismatch {
                expected: batch.client.expected_version,
                actual: current.version,
            });
        }
        if let Some(increment) = &batch.task_increment
            && !documents.tasks.contains_key(&increment.task_id)
        {
            return Err(StoreError::MissingDocument {
                collection: "budget_tasks",
                id: increment.task_id.clone(),
            });
        }
        if let Some(op) = &batch.processed
            && documents
                .processed
                .get(&op.key)
                .is_some_and(|existing| existing.is_live(op.registered_at))
        {
            return Err(StoreError::AlreadyProcessed {
                key: op.key.clone(),
            });
        }

        let version = batch.client.expected_version + 1;
        documents.clients.insert(
            client_id,
            Versioned {
                value: batch.client.client,
                version,
            },
        );
        if let Some(flags) = batch.entry_flags {
            // an entry deleted meanwhile gets no flags; its deletion reverses the posting
            if let Some(entry) = documents.entries.get_mut(&flags.entry_id) {
                entry.is_overage = flags.overage.is_overage;
                entry.overage_minutes = flags.overage.overage_minutes;
            }
        }
        if let Some(increment) = batch.task_increment
            && let Some(task) = documents.tasks.get_mut(&increment.task_id)
        {
            task.value.actual_minutes += increment.minutes;
            task.value.actual_hours = round2(task.value.actual_hours + increment.hours);
            task.value.last_activity = Some(increment.last_activity);
            task.version += 1;
        }
        if let Some(op) = batch.processed {
            documents.processed.insert(op.key.clone(), op);
        }
        Ok(())
    }
}

#[async_trait]
impl TimeEntryStore for InMemoryDocumentStore {
    async fn get_entry(&self, entry_id: &str) -> Result<Option<TimeEntry>, StoreError> {
        self.ensure_online()?;
        Ok(self.documents.read().await.entries.get(entry_id).cloned())
    }

    async fn put_entry(
        &self,
        entry_id: &str,
        entry: TimeEntry,
    ) -> Result<Option<TimeEntry>, StoreError> {
        self.ensure_online()?;
        let mut documents = self.documents.write().await;
        let entry = entry.with_flags_of(documents.entries.get(entry_id));
        Ok(documents.entries.insert(entry_id.to_string(), entry))
    }

    async fn delete_entry(&self, entry_id: &str) -> Result<Option<TimeEntry>, StoreError> {
        self.ensure_online()?;
        Ok(self.documents.write().await.entries.remove(entry_id))
    }
}
