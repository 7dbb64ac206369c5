// Document store port.
//
// Purpose
// - Give the ledger engine the transactional contract of the hosted document store: versioned
//   reads, and one atomic batch of writes conditional on the client version that was read.
//
// Responsibilities
// - Client writes replace the whole document and fail on a version mismatch.
// - Task writes are increments applied to the latest task document, never overwrites.
// - The processed-operations registry is written in the same batch, so a delivery is either
//   fully applied and registered or not applied at all.

use crate::modules::hour_ledger::core::budget_task::BudgetTask;
use crate::modules::hour_ledger::core::client::ClientRecord;
use crate::modules::hour_ledger::core::overage::Overage;
use crate::modules::hour_ledger::core::time_entry::TimeEntry;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("version mismatch: expected {expected}, actual {actual}")]
    VersionMismatch { expected: i64, actual: i64 },

    #[error("operation {key} already processed")]
    AlreadyProcessed { key: String },

    #[error("{collection}/{id} does not exist")]
    MissingDocument {
        collection: &'static str,
        id: String,
    },

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Commit failures caused by a concurrent writer. Re-reading and recomputing resolves them.
    pub fn is_contention(&self) -> bool {
        matches!(
            self,
            StoreError::VersionMismatch { .. } | StoreError::MissingDocument { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientWrite {
    pub expected_version: i64,
    pub client: ClientRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryFlagsWrite {
    pub entry_id: String,
    pub overage: Overage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskIncrement {
    pub task_id: String,
    pub minutes: i64,
    pub hours: f64,
    pub last_activity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedOperation {
    pub key: String,
    pub registered_at: i64,
    pub expires_at: i64,
}

impl ProcessedOperation {
    pub fn is_live(&self, now: i64) -> bool {
        self.expires_at > now
    }
}

/// Everything one reconciliation writes, committed all-or-nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBatch {
    pub client: ClientWrite,
    pub entry_flags: Option<EntryFlagsWrite>,
    pub task_increment: Option<TaskIncrement>,
    pub processed: Option<ProcessedOperation>,
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_client(&self, client_id: &str)
    -> Result<Option<Versioned<ClientRecord>>, StoreError>;

    async fn get_task(&self, task_id: &str) -> Result<Option<Versioned<BudgetTask>>, StoreError>;

    /// True when `key` is registered and has not expired at `now` (epoch millis).
    async fn is_processed(&self, key: &str, now: i64) -> Result<bool, StoreError>;

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

/// Write side of the timesheet collection. Every write returns the previous document.
///
/// `put_entry` never takes overage flags from the caller; see [`TimeEntry::with_flags_of`].
#[async_trait]
pub trait TimeEntryStore: Send + Sync {
    async fn get_entry(&self, entry_id: &str) -> Result<Option<TimeEntry>, StoreError>;

    async fn put_entry(
        &self,
        entry_id: &str,
        entry: TimeEntry,
    ) -> Result<Option<TimeEntry>, StoreError>;

    async fn delete_entry(&self, entry_id: &str) -> Result<Option<TimeEntry>, StoreError>;
}

pub mod in_memory;
