use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::hour_ledger::use_cases::get_client_ledger::inbound::http as ledger_http;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::inbound::http as reconcile_http;
use crate::modules::hour_ledger::use_cases::write_time_entry::inbound::http as write_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/triggers/timesheet-entry-written",
            post(reconcile_http::handle),
        )
        .route(
            "/timesheet-entries/{entry_id}",
            put(write_http::put).delete(write_http::delete),
        )
        .route("/clients/{client_id}/ledger", get(ledger_http::client_ledger))
        .route("/budget-tasks/{task_id}", get(ledger_http::budget_task))
        .with_state(state)
}
