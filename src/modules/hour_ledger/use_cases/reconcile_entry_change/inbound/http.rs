use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::modules::hour_ledger::use_cases::reconcile_entry_change::command::EntryWritten;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::handler::{
    ApplicationError, LedgerReceipt, ReconcileOutcome,
};
use crate::shell::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<LedgerReceipt>,
}

impl From<ReconcileOutcome> for ReconcileResponse {
    fn from(outcome: ReconcileOutcome) -> Self {
        let outcome_name = outcome.as_str();
        let (reason, receipt) = match outcome {
            ReconcileOutcome::Committed(receipt) => (None, Some(receipt)),
            ReconcileOutcome::Skipped(reason) => (Some(reason.to_string()), None),
            ReconcileOutcome::NoOp | ReconcileOutcome::Ignored | ReconcileOutcome::AlreadyApplied => {
                (None, None)
            }
        };
        Self {
            outcome: outcome_name,
            reason,
            receipt,
        }
    }
}

pub(crate) fn error_response(error: ApplicationError) -> axum::response::Response {
    match error {
        ApplicationError::Contention { .. } => StatusCode::CONFLICT.into_response(),
        ApplicationError::NegativeMinutes { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY.into_response()
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Delivery endpoint for the timesheet write-trigger.
pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<EntryWritten>, JsonRejection>,
) -> impl IntoResponse {
    let Json(command) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    match state.reconcile_handler.handle(command).await {
        Ok(outcome) => Json(ReconcileResponse::from(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}
