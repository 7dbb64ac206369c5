use crate::modules::hour_ledger::core::budget_task::BudgetTask;
use crate::modules::hour_ledger::core::client::PackageStatus;
use crate::modules::hour_ledger::core::invariants::audit;
use crate::modules::hour_ledger::core::time_entry::TimeEntry;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::command::EntryWritten;
use crate::modules::hour_ledger::use_cases::reconcile_entry_change::handler::{
    ReconcileEntryChangeHandler, ReconcileOutcome, ReconcilePolicy,
};
use crate::modules::hour_ledger::use_cases::write_time_entry::command::WriteTimeEntry;
use crate::modules::hour_ledger::use_cases::write_time_entry::handler::WriteTimeEntryHandler;
use crate::shared::infrastructure::document_store::in_memory::InMemoryDocumentStore;
use crate::shared::infrastructure::document_store::{LedgerStore, TimeEntryStore};
use crate::tests::fixtures::clients::{hourly_client, legal_procedure_client};
use crate::tests::fixtures::time_entries::TimeEntryBuilder;
use std::sync::Arc;
use tokio::join;

type Writer = WriteTimeEntryHandler<InMemoryDocumentStore, InMemoryDocumentStore>;

async fn seeded(
    store: InMemoryDocumentStore,
    policy: ReconcilePolicy,
) -> (Arc<InMemoryDocumentStore>, Arc<Writer>) {
    store.insert_client(hourly_client()).await;
    store.insert_client(legal_procedure_client()).await;
    store.insert_task(BudgetTask::new("task-0001")).await;
    let store = Arc::new(store);
    let reconcile = Arc::new(ReconcileEntryChangeHandler::new(store.clone(), policy));
    (store.clone(), Arc::new(WriteTimeEntryHandler::new(store, reconcile)))
}

fn put(entry_id: &str, entry: TimeEntry) -> WriteTimeEntry {
    WriteTimeEntry::Put {
        entry_id: entry_id.to_string(),
        entry,
    }
}

#[tokio::test]
async fn it_should_walk_an_hourly_client_into_overage_and_back() {
    let (store, writer) = seeded(InMemoryDocumentStore::new(), ReconcilePolicy::default()).await;

    writer
        .handle(put("entry-0001", TimeEntryBuilder::hourly().minutes(540).build()))
        .await
        .unwrap();
    let client = store.get_client("client-hours-0001").await.unwrap().unwrap().value;
    let package = &client.services[0].packages[0];
    assert_eq!(package.hours_used, 9.0);
    assert_eq!(package.hours_remaining, 1.0);
    assert_eq!(package.status, PackageStatus::Active);
    assert_eq!(client.totals().hours_remaining, 1.0);
    assert_eq!(client.totals().minutes_remaining, 60.0);
    assert!(client.totals().is_critical);
    assert!(!client.totals().is_blocked);

    writer
        .handle(put("entry-0001", TimeEntryBuilder::hourly().minutes(720).build()))
        .await
        .unwrap();
    let client = store.get_client("client-hours-0001").await.unwrap().unwrap().value;
    let package = &client.services[0].packages[0];
    assert_eq!(package.hours_remaining, -2.0);
    assert_eq!(package.status, PackageStatus::Depleted);
    assert_eq!(client.totals().hours_remaining, -2.0);
    assert!(client.totals().is_blocked);
    assert!(!client.totals().is_critical);
    let entry = store.get_entry("entry-0001").await.unwrap().unwrap();
    assert!(entry.is_overage);
    assert_eq!(entry.overage_minutes, 120.0);

    let outcome = writer
        .handle(WriteTimeEntry::Delete {
            entry_id: "entry-0001".into(),
        })
        .await
        .unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Committed(_)));
    let client = store.get_client("client-hours-0001").await.unwrap().unwrap().value;
    assert_eq!(client.services, hourly_client().services);
    assert_eq!(client.totals(), hourly_client().totals());
    assert_eq!(store.get_entry("entry-0001").await.unwrap(), None);
}

#[tokio::test]
async fn it_should_leave_the_client_untouched_when_minutes_do_not_change() {
    let (store, writer) = seeded(InMemoryDocumentStore::new(), ReconcilePolicy::default()).await;
    writer
        .handle(put("entry-0001", TimeEntryBuilder::hourly().minutes(45).build()))
        .await
        .unwrap();
    let version = store.get_client("client-hours-0001").await.unwrap().unwrap().version;

    let renamed = TimeEntryBuilder::hourly().minutes(45).build();
    let outcome = writer.handle(put("entry-0001", renamed)).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::NoOp);
    let client = store.get_client("client-hours-0001").await.unwrap().unwrap();
    assert_eq!(client.version, version);
}

#[tokio::test]
async fn it_should_track_a_linked_budget_task_through_its_lifecycle() {
    let (store, writer) = seeded(InMemoryDocumentStore::new(), ReconcilePolicy::default()).await;
    let entry = |minutes| {
        TimeEntryBuilder::staged()
            .task_id("task-0001")
            .minutes(minutes)
            .build()
    };

    writer.handle(put("entry-0001", entry(80))).await.unwrap();
    let task = store.get_task("task-0001").await.unwrap().unwrap().value;
    assert_eq!(task.actual_minutes, 80);
    assert_eq!(task.actual_hours, 1.33);
    assert!(task.last_activity.is_some());

    writer.handle(put("entry-0001", entry(20))).await.unwrap();
    let task = store.get_task("task-0001").await.unwrap().unwrap().value;
    assert_eq!(task.actual_minutes, 20);

    writer
        .handle(WriteTimeEntry::Delete {
            entry_id: "entry-0001".into(),
        })
        .await
        .unwrap();
    let task = store.get_task("task-0001").await.unwrap().unwrap().value;
    assert_eq!(task.actual_minutes, 0);
    assert_eq!(task.actual_hours, 0.0);
    let client = store.get_client("client-legal-0001").await.unwrap().unwrap().value;
    assert_eq!(client.services, legal_procedure_client().services);
}

#[tokio::test]
async fn it_should_apply_redelivered_events_once() {
    let (store, _) = seeded(InMemoryDocumentStore::new(), ReconcilePolicy::default()).await;
    let reconcile = ReconcileEntryChangeHandler::new(store.clone(), ReconcilePolicy::default());
    let delivery = || EntryWritten {
        entry_id: "entry-0001".into(),
        event_id: Some("event-0001".into()),
        before: None,
        after: Some(TimeEntryBuilder::hourly().minutes(120).build()),
    };

    let first = reconcile.handle(delivery()).await.unwrap();
    let second = reconcile.handle(delivery()).await.unwrap();

    assert!(matches!(first, ReconcileOutcome::Committed(_)));
    assert_eq!(second, ReconcileOutcome::AlreadyApplied);
    let client = store.get_client("client-hours-0001").await.unwrap().unwrap().value;
    assert_eq!(client.totals().hours_used, 2.0);
}

#[tokio::test]
async fn it_should_serialize_concurrent_postings_on_one_client() {
    let mut store = InMemoryDocumentStore::new();
    store.set_delay_commit_ms(2);
    let policy = ReconcilePolicy {
        max_commit_attempts: 16,
        ..ReconcilePolicy::default()
    };
    let (store, writer) = seeded(store, policy).await;

    let writer = writer.as_ref();
    let post = move |index: usize, minutes: i64| {
        let entry = TimeEntryBuilder::staged()
            .stage_id("stage-b")
            .package_id("pkg-stage-b-0001")
            .minutes(minutes)
            .build();
        writer.handle(put(&format!("entry-{index:04}"), entry))
    };
    let results = join!(
        post(0, 30),
        post(1, 45),
        post(2, 60),
        post(3, 75),
        post(4, 90),
        post(5, 105)
    );
    for result in [results.0, results.1, results.2, results.3, results.4, results.5] {
        assert!(matches!(result.unwrap(), ReconcileOutcome::Committed(_)));
    }

    let client = store.get_client("client-legal-0001").await.unwrap().unwrap();
    // 405 minutes in total
    assert_eq!(client.value.totals().hours_used, 6.75);
    assert_eq!(client.value.services[0].stages[1].packages[0].hours_remaining, -0.75);
    assert_eq!(client.version, 7);
    assert_eq!(audit(&client.value), vec![]);
}
