// Transactional coordinator for timesheet entry writes.
//
// Purpose
// - Run one entry change through the ledger pipeline and commit the client, the entry's overage
//   flags and the linked task counters together or not at all.
//
// Responsibilities
// - Stop early on unclassifiable writes and zero-delta updates, with no reads and no writes.
// - Finish every read before queuing any write.
// - Re-run the whole attempt on commit contention; the decision is a pure function of the reads.
// - Log skippable input errors and return them as outcomes. Store failures are returned as
//   errors so the caller's own retry applies.

use crate::modules::hour_ledger::core::budget_task::BudgetTask;
use crate::modules::hour_ledger::core::change::{ChangeKind, ClassifiedChange, classify};
use crate::modules::hour_ledger::core::client::ClientTotals;
use crate::modules::hour_ledger::core::invariants::audit;
use crate::modules::hour_ledger::core::overage::Overage;
use crate::modules::hour_ledger::core::task_ledger::{TaskDelta, task_delta};
use crate::modules::hour_ledger::core::time_entry::EntryRouting;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::command::EntryWritten;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::decide::decide_reconcile;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::decision::{
    Decision, SkipReason,
};
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::transaction::{
    IllegalTransition, Transaction, TransactionPhase,
};
use crate::shared::infrastructure::document_store::{
    ClientWrite, EntryFlagsWrite, LedgerStore, ProcessedOperation, StoreError, TaskIncrement,
    Versioned, WriteBatch,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("commit still contended after {attempts} attempts")]
    Contention { attempts: u32 },

    #[error("entry minutes must not be negative, got {minutes}")]
    NegativeMinutes { minutes: i64 },

    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl From<IllegalTransition> for ApplicationError {
    fn from(error: IllegalTransition) -> Self {
        ApplicationError::Unexpected(error.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilePolicy {
    pub max_commit_attempts: u32,
    /// How long a processed delivery id is remembered, in milliseconds.
    pub idempotency_ttl_ms: i64,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            max_commit_attempts: 5,
            idempotency_ttl_ms: 24 * 60 * 60 * 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerReceipt {
    pub entry_id: String,
    pub client_id: String,
    pub kind: ChangeKind,
    pub delta_minutes: i64,
    pub totals: ClientTotals,
    pub overage: Overage,
    pub task_updated: bool,
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Committed(LedgerReceipt),
    /// Update that did not change the minutes.
    NoOp,
    /// Write with neither a before nor an after state.
    Ignored,
    Skipped(SkipReason),
    /// The delivery id was already committed.
    AlreadyApplied,
}

impl ReconcileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Committed(_) => "committed",
            ReconcileOutcome::NoOp => "no_op",
            ReconcileOutcome::Ignored => "ignored",
            ReconcileOutcome::Skipped(_) => "skipped",
            ReconcileOutcome::AlreadyApplied => "already_applied",
        }
    }
}

pub struct ReconcileEntryChangeHandler<TStore>
where
    TStore: LedgerStore + Send + Sync + 'static,
{
    store: Arc<TStore>,
    policy: ReconcilePolicy,
}

impl<TStore> ReconcileEntryChangeHandler<TStore>
where
    TStore: LedgerStore + Send + Sync + 'static,
{
    pub fn new(store: Arc<TStore>, policy: ReconcilePolicy) -> Self {
        Self { store, policy }
    }

    pub async fn handle(&self, command: EntryWritten) -> Result<ReconcileOutcome, ApplicationError> {
        let entry_id = command.entry_id.as_str();
        let (Some(change), Some(entry)) = (
            classify(command.before.as_ref(), command.after.as_ref()),
            command.entry(),
        ) else {
            debug!(entry_id, "write carries no entry state, ignoring");
            return Ok(ReconcileOutcome::Ignored);
        };
        if let Some(minutes) = [command.before.as_ref(), command.after.as_ref()]
            .into_iter()
            .flatten()
            .map(|entry| entry.minutes)
            .find(|minutes| *minutes < 0)
        {
            return Ok(skip(entry_id, SkipReason::NegativeMinutes { minutes }));
        }
        if change.is_noop() {
            debug!(entry_id, "minutes unchanged, nothing to reconcile");
            return Ok(ReconcileOutcome::NoOp);
        }

        let routing = entry.routing();
        let Some(client_id) = routing.client_id else {
            return Ok(skip(entry_id, SkipReason::MissingClientId));
        };
        let task = task_delta(change, command.before.as_ref(), command.after.as_ref());

        for attempt in 1..=self.policy.max_commit_attempts {
            let step = Attempt {
                command: &command,
                client_id,
                routing: &routing,
                change,
                task,
                number: attempt,
            };
            match self.run(step).await {
                Err(ApplicationError::Store(error)) if error.is_contention() => {
                    warn!(entry_id, client_id, attempt, %error, "commit contended, retrying");
                }
                outcome => return outcome,
            }
        }
        error!(
            entry_id,
            client_id,
            attempts = self.policy.max_commit_attempts,
            "giving up on contended commit"
        );
        Err(ApplicationError::Contention {
            attempts: self.policy.max_commit_attempts,
        })
    }

    async fn run(&self, step: Attempt<'_>) -> Result<ReconcileOutcome, ApplicationError> {
        let entry_id = step.command.entry_id.as_str();
        let now = Utc::now().timestamp_millis();
        let mut transaction = Transaction::begin(entry_id, step.number);

        if let Some(key) = &step.command.event_id
            && self.store.is_processed(key, now).await?
        {
            transaction.advance(TransactionPhase::Aborted)?;
            info!(entry_id, event_id = %key, "delivery already applied");
            return Ok(ReconcileOutcome::AlreadyApplied);
        }
        let Some(client) = self.store.get_client(step.client_id).await? else {
            transaction.advance(TransactionPhase::Aborted)?;
            return Ok(skip(
                entry_id,
                SkipReason::ClientNotFound {
                    client_id: step.client_id.to_string(),
                },
            ));
        };
        let task = self.read_task(entry_id, step.routing.task_id).await?;
        transaction.advance(TransactionPhase::ReadsComplete)?;

        let reconciliation = match decide_reconcile(&client.value, step.routing, step.change, now) {
            Decision::Accepted { reconciliation } => reconciliation,
            Decision::Skipped { reason } => {
                transaction.advance(TransactionPhase::Aborted)?;
                return Ok(skip(entry_id, reason));
            }
        };
        transaction.advance(TransactionPhase::TargetResolved)?;
        debug!(entry_id, target = ?reconciliation.target, "target resolved");
        transaction.advance(TransactionPhase::Recomputed)?;

        let drift = audit(&reconciliation.client);
        if !drift.is_empty() {
            warn!(entry_id, client_id = step.client_id, ?drift, "client ledger carries drift");
        }

        let task_increment = task.map(|task| TaskIncrement {
            task_id: task.value.id,
            minutes: step.task.minutes,
            hours: step.task.hours,
            last_activity: now,
        });
        let task_updated = task_increment.is_some();
        let batch = WriteBatch {
            client: ClientWrite {
                expected_version: client.version,
                client: reconciliation.client,
            },
            entry_flags: reconciliation.entry_flags.map(|overage| EntryFlagsWrite {
                entry_id: entry_id.to_string(),
                overage,
            }),
            task_increment,
            processed: step.command.event_id.as_ref().map(|key| ProcessedOperation {
                key: key.clone(),
                registered_at: now,
                expires_at: now + self.policy.idempotency_ttl_ms,
            }),
        };
        transaction.advance(TransactionPhase::WritesQueued)?;

        match self.store.commit(batch).await {
            Ok(()) => {
                transaction.advance(TransactionPhase::Committed)?;
                let receipt = LedgerReceipt {
                    entry_id: entry_id.to_string(),
                    client_id: step.client_id.to_string(),
                    kind: step.change.kind,
                    delta_minutes: step.change.delta_minutes,
                    totals: reconciliation.totals,
                    overage: reconciliation.overage,
                    task_updated,
                    attempts: step.number,
                };
                info!(
                    entry_id,
                    client_id = step.client_id,
                    kind = step.change.kind.as_str(),
                    delta_minutes = step.change.delta_minutes,
                    hours_remaining = receipt.totals.hours_remaining,
                    is_blocked = receipt.totals.is_blocked,
                    is_critical = receipt.totals.is_critical,
                    is_overage = receipt.overage.is_overage,
                    "ledger reconciled"
                );
                Ok(ReconcileOutcome::Committed(receipt))
            }
            Err(StoreError::AlreadyProcessed { key }) => {
                info!(entry_id, event_id = %key, "delivery committed concurrently");
                Ok(ReconcileOutcome::AlreadyApplied)
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn read_task(
        &self,
        entry_id: &str,
        task_id: Option<&str>,
    ) -> Result<Option<Versioned<BudgetTask>>, StoreError> {
        let Some(task_id) = task_id else {
            return Ok(None);
        };
        let task = self.store.get_task(task_id).await?;
        if task.is_none() {
            warn!(entry_id, task_id, "linked budget task not found, skipping task update");
        }
        Ok(task)
    }
}

/// Inputs fixed for every attempt of one delivery.
struct Attempt<'a> {
    command: &'a EntryWritten,
    client_id: &'a str,
    routing: &'a EntryRouting<'a>,
    change: ClassifiedChange,
    task: TaskDelta,
    number: u32,
}

fn skip(entry_id: &str, reason: SkipReason) -> ReconcileOutcome {
    if reason.is_data_inconsistency() {
        error!(entry_id, %reason, "entry references missing ledger data, skipping");
    } else {
        warn!(entry_id, %reason, "entry lacks routing data, skipping");
    }
    ReconcileOutcome::Skipped(reason)
}
