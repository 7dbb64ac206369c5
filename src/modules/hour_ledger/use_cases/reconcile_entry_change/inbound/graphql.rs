use async_graphql::{Context, InputObject, Object, Result as GqlResult, SimpleObject};

use crate::modules::hour_ledger::core::time_entry::TimeEntry;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::command::EntryWritten;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::handler::ReconcileOutcome;
use crate::shell::state::AppState;

/// Routing fields and minutes of a timesheet entry.
#[derive(InputObject, Clone, Debug)]
pub struct TimeEntryInput {
    pub client_id: Option<String>,
    pub service_id: Option<String>,
    pub stage_id: Option<String>,
    pub package_id: Option<String>,
    pub task_id: Option<String>,
    pub minutes: i64,
}

impl From<TimeEntryInput> for TimeEntry {
    fn from(input: TimeEntryInput) -> Self {
        Self {
            client_id: input.client_id,
            service_id: input.service_id,
            stage_id: input.stage_id,
            package_id: input.package_id,
            task_id: input.task_id,
            minutes: input.minutes,
            ..TimeEntry::default()
        }
    }
}

#[derive(SimpleObject, Clone, Debug, PartialEq)]
pub struct GqlReconcileOutcome {
    pub outcome: String,
    pub reason: Option<String>,
    pub hours_remaining: Option<f64>,
    pub is_blocked: Option<bool>,
    pub is_critical: Option<bool>,
    pub is_overage: Option<bool>,
    pub overage_minutes: Option<f64>,
    pub attempts: Option<u32>,
}

impl From<ReconcileOutcome> for GqlReconcileOutcome {
    fn from(outcome: ReconcileOutcome) -> Self {
        let mut view = Self {
            outcome: outcome.as_str().to_string(),
            reason: None,
            hours_remaining: None,
            is_blocked: None,
            is_critical: None,
            is_overage: None,
            overage_minutes: None,
            attempts: None,
        };
        match outcome {
            ReconcileOutcome::Committed(receipt) => {
                view.hours_remaining = Some(receipt.totals.hours_remaining);
                view.is_blocked = Some(receipt.totals.is_blocked);
                view.is_critical = Some(receipt.totals.is_critical);
                view.is_overage = Some(receipt.overage.is_overage);
                view.overage_minutes = Some(receipt.overage.overage_minutes);
                view.attempts = Some(receipt.attempts);
            }
            ReconcileOutcome::Skipped(reason) => view.reason = Some(reason.to_string()),
            ReconcileOutcome::NoOp | ReconcileOutcome::Ignored | ReconcileOutcome::AlreadyApplied => {}
        }
        view
    }
}

#[derive(Default)]
pub struct ReconcileMutation;

#[Object]
impl ReconcileMutation {
    /// Delivers one write-trigger event for a timesheet entry.
    async fn reconcile_entry_change(
        &self,
        context: &Context<'_>,
        entry_id: String,
        event_id: Option<String>,
        before: Option<TimeEntryInput>,
        after: Option<TimeEntryInput>,
    ) -> GqlResult<GqlReconcileOutcome> {
        let state = context.data_unchecked::<AppState>();
        let command = EntryWritten {
            entry_id,
            event_id,
            before: before.map(Into::into),
            after: after.map(Into::into),
        };
        let outcome = state
            .reconcile_handler
            .handle(command)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(outcome.into())
    }
}
