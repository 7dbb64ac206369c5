// Change classifier for a single timesheet entry write.
//
// Purpose
// - Turn a before/after pair into a change kind and the signed minutes it posts to the ledger.
//
// Responsibilities
// - Created posts `after.minutes`, Updated posts `after - before`, Deleted posts `-before`.
// - Report unclassifiable writes (both sides absent) as `None`.
// - Flag zero-delta updates as no-ops so they never touch the ledger.

use crate::modules::hour_ledger::core::time_entry::TimeEntry;
use crate::shared::core::primitives::minutes_to_hours;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifiedChange {
    pub kind: ChangeKind,
    pub delta_minutes: i64,
}

impl ClassifiedChange {
    /// An update that does not move the minutes must not perturb the ledger.
    pub fn is_noop(&self) -> bool {
        self.kind == ChangeKind::Updated && self.delta_minutes == 0
    }

    pub fn delta_hours(&self) -> f64 {
        minutes_to_hours(self.delta_minutes)
    }
}

pub fn classify(before: Option<&TimeEntry>, after: Option<&TimeEntry>) -> Option<ClassifiedChange> {
    match (before, after) {
        (None, Some(after)) => Some(ClassifiedChange {
            kind: ChangeKind::Created,
            delta_minutes: after.minutes,
        }),
        (Some(before), Some(after)) => Some(ClassifiedChange {
            kind: ChangeKind::Updated,
            delta_minutes: after.minutes - before.minutes,
        }),
        (Some(before), None) => Some(ClassifiedChange {
            kind: ChangeKind::Deleted,
            delta_minutes: -before.minutes,
        }),
        (None, None) => None,
    }
}
