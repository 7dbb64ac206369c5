use crate::modules::hour_ledger::core::change::classify;
use crate::modules::hour_ledger::core::client::{ClientRecord, PackageStatus};
use crate::modules::hour_ledger::core::invariants::audit;
use crate::modules::hour_ledger::core::time_entry::TimeEntry;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::decide::decide_reconcile;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::decision::Decision;
use crate::tests::fixtures::clients::{hourly_client, legal_procedure_client};
use crate::tests::fixtures::time_entries::TimeEntryBuilder;
use rstest::rstest;

const NOW: i64 = 1_700_000_000_000;

fn post(
    client: &ClientRecord,
    before: Option<&TimeEntry>,
    after: Option<&TimeEntry>,
) -> ClientRecord {
    let change = classify(before, after).unwrap();
    let routing = after.or(before).unwrap().routing();
    match decide_reconcile(client, &routing, change, NOW) {
        Decision::Accepted { reconciliation } => reconciliation.client,
        Decision::Skipped { reason } => panic!("expected Accepted, got {reason}"),
    }
}

fn hourly(minutes: i64) -> TimeEntry {
    TimeEntryBuilder::hourly().minutes(minutes).build()
}

fn stage_a(minutes: i64) -> TimeEntry {
    TimeEntryBuilder::staged().minutes(minutes).build()
}

fn stage_b(minutes: i64) -> TimeEntry {
    TimeEntryBuilder::staged()
        .stage_id("stage-b")
        .package_id("pkg-stage-b-0001")
        .minutes(minutes)
        .build()
}

fn stage_c(minutes: i64) -> TimeEntry {
    TimeEntryBuilder::staged()
        .stage_id("stage-c")
        .clear_package()
        .minutes(minutes)
        .build()
}

/// Minute values with every remainder modulo 60, plus values that overdraw the packages.
fn minute_samples() -> impl Iterator<Item = i64> {
    (0..=130).chain((131..=1_500).step_by(37))
}

#[rstest]
fn it_should_return_every_field_to_its_previous_value_when_a_creation_is_deleted() {
    let cases: [(ClientRecord, fn(i64) -> TimeEntry); 4] = [
        (hourly_client(), hourly),
        (legal_procedure_client(), stage_a),
        (legal_procedure_client(), stage_b),
        (legal_procedure_client(), stage_c),
    ];
    for (fresh, entry) in cases {
        // also from a state that already carries other postings
        let busy = post(&fresh, None, Some(&entry(47)));
        for start in [fresh, busy] {
            for minutes in minute_samples() {
                let created = post(&start, None, Some(&entry(minutes)));
                let deleted = post(&created, Some(&entry(minutes)), None);
                assert_eq!(deleted.services, start.services, "minutes={minutes}");
                assert_eq!(deleted.totals(), start.totals(), "minutes={minutes}");
            }
        }
    }
}

#[rstest]
fn it_should_reach_the_same_ledger_in_either_posting_order() {
    let samples = [1, 7, 13, 29, 45, 59, 61, 95, 120, 333, 601];
    for a in samples {
        for b in samples {
            let first_a = post(&hourly_client(), None, Some(&hourly(a)));
            let first_b = post(&hourly_client(), None, Some(&hourly(b)));
            let hourly_ab = post(&first_a, None, Some(&hourly(b)));
            let hourly_ba = post(&first_b, None, Some(&hourly(a)));
            assert_eq!(hourly_ab.services, hourly_ba.services, "a={a} b={b}");
            assert_eq!(hourly_ab.totals(), hourly_ba.totals(), "a={a} b={b}");

            let staged_ab = post(
                &post(&legal_procedure_client(), None, Some(&stage_b(a))),
                None,
                Some(&stage_c(b)),
            );
            let staged_ba = post(
                &post(&legal_procedure_client(), None, Some(&stage_c(b))),
                None,
                Some(&stage_b(a)),
            );
            assert_eq!(staged_ab.services, staged_ba.services, "a={a} b={b}");
            assert_eq!(staged_ab.totals(), staged_ba.totals(), "a={a} b={b}");
        }
    }
}

#[rstest]
fn it_should_keep_every_cached_value_consistent_across_a_posting_history() {
    let mut client = legal_procedure_client();
    let mut history: Vec<TimeEntry> = Vec::new();
    let entries: [fn(i64) -> TimeEntry; 3] = [stage_a, stage_b, stage_c];

    for step in 0..120_i64 {
        let minutes = (step * 53) % 211;
        let make = entries[(step % 3) as usize];
        client = if step % 5 == 4 && !history.is_empty() {
            let removed = history.remove(0);
            post(&client, Some(&removed), None)
        } else if step % 7 == 6 && !history.is_empty() {
            let index = history.len() - 1;
            let edited = TimeEntry {
                minutes: history[index].minutes + 17,
                ..history[index].clone()
            };
            let next = post(&client, Some(&history[index]), Some(&edited));
            history[index] = edited;
            next
        } else {
            let entry = make(minutes);
            history.push(entry.clone());
            post(&client, None, Some(&entry))
        };

        assert_eq!(audit(&client), vec![], "step={step}");
        let totals = client.totals();
        assert!(!(totals.is_blocked && totals.is_critical), "step={step}");
        for stage in &client.services[0].stages {
            for package in &stage.packages {
                assert_eq!(
                    package.status == PackageStatus::Depleted,
                    package.hours_remaining <= 0.0,
                    "step={step}"
                );
            }
        }
    }
}
