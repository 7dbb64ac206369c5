// Client aggregator: client-wide totals from the service tree.

use crate::modules::hour_ledger::core::client::{ClientTotals, Service};
use crate::shared::core::primitives::{hours_to_minutes, round2};
use std::sync::Arc;

/// Remaining hours at or below this (and above zero) mark a client as critical.
pub const CRITICAL_HOURS_THRESHOLD: f64 = 5.0;

pub fn aggregate(services: &[Arc<Service>], total_hours: f64) -> ClientTotals {
    let hours_used = round2(services.iter().map(|s| s.hours_used).sum());
    let hours_remaining = round2(total_hours - hours_used);
    let is_blocked = hours_remaining <= 0.0;
    ClientTotals {
        hours_used,
        hours_remaining,
        minutes_used: hours_to_minutes(hours_used),
        minutes_remaining: hours_to_minutes(hours_remaining),
        is_blocked,
        is_critical: !is_blocked && hours_remaining <= CRITICAL_HOURS_THRESHOLD,
    }
}
