// Task ledger updater.
//
// Purpose
// - Translate an entry change into the increment applied to its linked budget task.
//
// Notes
// - The store applies this as an increment on the latest task document at commit time, so
//   concurrent postings to one task compose without serialising through the client.

use crate::modules::hour_ledger::core::change::{ChangeKind, ClassifiedChange};
use crate::modules::hour_ledger::core::time_entry::TimeEntry;
use crate::shared::core::primitives::{minutes_to_hours, round2};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDelta {
    pub minutes: i64,
    pub hours: f64,
}

pub fn task_delta(
    change: ClassifiedChange,
    before: Option<&TimeEntry>,
    after: Option<&TimeEntry>,
) -> TaskDelta {
    let minutes_of = |entry: Option<&TimeEntry>| entry.map(|e| e.minutes).unwrap_or(0);
    match change.kind {
        ChangeKind::Created => {
            let minutes = minutes_of(after);
            TaskDelta {
                minutes,
                hours: round2(minutes_to_hours(minutes)),
            }
        }
        ChangeKind::Updated => TaskDelta {
            minutes: change.delta_minutes,
            hours: round2(change.delta_hours()),
        },
        ChangeKind::Deleted => {
            let minutes = minutes_of(before);
            TaskDelta {
                minutes: -minutes,
                hours: -round2(minutes_to_hours(minutes)),
            }
        }
    }
}
