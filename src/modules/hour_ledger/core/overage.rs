// Overage detector.
//
// Purpose
// - Decide the overage an entry reports: the larger of its package overdraft and the client's
//   overdraft, so a user always sees the worst case their posting caused.
//
// Responsibilities
// - Produce the flag write for the entry document: set on overage, cleared on updates that no
//   longer overdraw, nothing on deletions (the entry is gone).

use crate::modules::hour_ledger::core::change::ChangeKind;
use crate::modules::hour_ledger::core::client::ClientTotals;
use crate::shared::core::primitives::hours_to_minutes;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overage {
    pub is_overage: bool,
    pub overage_minutes: f64,
}

impl Overage {
    pub const CLEARED: Overage = Overage {
        is_overage: false,
        overage_minutes: 0.0,
    };
}

pub fn detect(package_overage_minutes: Option<f64>, totals: &ClientTotals) -> Overage {
    let client_overage_minutes =
        (totals.hours_remaining < 0.0).then(|| hours_to_minutes(totals.hours_remaining.abs()));
    match (package_overage_minutes, client_overage_minutes) {
        (None, None) => Overage::CLEARED,
        (package, client) => Overage {
            is_overage: true,
            overage_minutes: package.unwrap_or(0.0).max(client.unwrap_or(0.0)),
        },
    }
}

/// The flags to write back onto the entry document, if any.
pub fn entry_flag_write(kind: ChangeKind, overage: Overage) -> Option<Overage> {
    match kind {
        ChangeKind::Deleted => None,
        _ if overage.is_overage => Some(overage),
        ChangeKind::Updated => Some(Overage::CLEARED),
        ChangeKind::Created => None,
    }
}
