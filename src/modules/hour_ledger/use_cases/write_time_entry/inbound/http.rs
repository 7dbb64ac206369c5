use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::modules::hour_ledger::core::time_entry::TimeEntry;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::handler::ReconcileOutcome;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::inbound::http::{
    ReconcileResponse, error_response,
};
use crate::modules::hour_ledger::use_cases::write_time_entry::command::WriteTimeEntry;
use crate::shell::state::AppState;

pub async fn put(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    body: Result<Json<TimeEntry>, JsonRejection>,
) -> impl IntoResponse {
    let Json(entry) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    match state
        .write_handler
        .handle(WriteTimeEntry::Put { entry_id, entry })
        .await
    {
        Ok(outcome) => Json(ReconcileResponse::from(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> impl IntoResponse {
    match state
        .write_handler
        .handle(WriteTimeEntry::Delete { entry_id })
        .await
    {
        Ok(ReconcileOutcome::Ignored) => StatusCode::NOT_FOUND.into_response(),
        Ok(outcome) => Json(ReconcileResponse::from(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}
