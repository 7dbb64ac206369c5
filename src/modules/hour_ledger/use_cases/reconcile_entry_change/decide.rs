use crate::modules::hour_ledger::core::{
    aggregate::aggregate,
    apply_delta::apply_delta,
    change::ClassifiedChange,
    client::ClientRecord,
    locate::locate,
    overage::{detect, entry_flag_write},
    time_entry::EntryRouting,
};
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::decision::{
    Decision, Reconciliation,
};

/// Recomputes the client ledger for one classified change. A pure function of the read client,
/// so a retried attempt against the same state decides the same thing.
pub fn decide_reconcile(
    client: &ClientRecord,
    routing: &EntryRouting<'_>,
    change: ClassifiedChange,
    now: i64,
) -> Decision {
    let target = match locate(client, routing) {
        Ok(target) => target,
        Err(error) => {
            return Decision::Skipped {
                reason: error.into(),
            };
        }
    };
    let applied = apply_delta(&client.services, target, change.delta_minutes);
    let totals = aggregate(&applied.services, client.total_hours);
    let overage = detect(applied.package_overage_minutes, &totals);
    Decision::Accepted {
        reconciliation: Reconciliation {
            target,
            client: client.with_ledger(applied.services, totals, now),
            totals,
            overage,
            entry_flags: entry_flag_write(change.kind, overage),
        },
    }
}
