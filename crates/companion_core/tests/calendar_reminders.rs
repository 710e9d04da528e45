use chrono::{TimeZone, Utc};
use companion_core::reminder::{ReminderError, REMINDER_TITLE};
use companion_core::service::calendar_service::ReminderOutcome;
use companion_core::{
    CalendarService, MemoryKeyValueStore, QueuedReminderScheduler, ReminderCommand,
    RecordId, ReminderRequest, ReminderScheduler, StorageKey,
};

/// Counts permission requests; scheduling always succeeds.
#[derive(Default)]
struct CountingScheduler {
    permission_requests: usize,
    scheduled: usize,
}

impl ReminderScheduler for CountingScheduler {
    fn request_permission(&mut self) -> bool {
        self.permission_requests += 1;
        false
    }

    fn schedule(&mut self, _request: &ReminderRequest) -> Result<(), ReminderError> {
        self.scheduled += 1;
        Ok(())
    }

    fn cancel(&mut self, _id: RecordId) -> Result<(), ReminderError> {
        Ok(())
    }
}

#[test]
fn display_is_sorted_by_date_while_storage_keeps_insertion_order() {
    let store = MemoryKeyValueStore::new();
    let mut calendar = CalendarService::open(&store, QueuedReminderScheduler::default());
    let march = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
    let february = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();

    calendar.add_appointment("März", march, false).unwrap();
    calendar.add_appointment("Februar", february, false).unwrap();

    let displayed = calendar
        .display()
        .iter()
        .map(|row| (row.appointment.date, row.storage_position))
        .collect::<Vec<_>>();
    assert_eq!(displayed, vec![(february, 1), (march, 0)]);

    let reopened = CalendarService::open(&store, QueuedReminderScheduler::default());
    let stored = reopened
        .items()
        .iter()
        .map(|appointment| appointment.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(stored, vec!["März", "Februar"]);
}

#[test]
fn remove_displayed_deletes_the_row_the_user_saw() {
    let store = MemoryKeyValueStore::new();
    let mut calendar = CalendarService::open(&store, QueuedReminderScheduler::default());
    calendar
        .add_appointment("later", Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(), false)
        .unwrap();
    calendar
        .add_appointment("sooner", Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(), false)
        .unwrap();

    let removed = calendar.remove_displayed(0).unwrap().unwrap();
    assert_eq!(removed.appointment.title, "sooner");
    assert_eq!(removed.reminder, ReminderOutcome::NotRequested);
    assert!(calendar.remove_displayed(1).unwrap().is_none());

    assert_eq!(calendar.items().len(), 1);
    assert_eq!(calendar.items()[0].title, "later");
}

#[test]
fn notify_schedules_reminder_and_delete_cancels_it() {
    let store = MemoryKeyValueStore::new();
    let mut scheduler = QueuedReminderScheduler::default();
    scheduler.set_permission(true);
    let mut calendar = CalendarService::open(&store, scheduler);
    assert_eq!(calendar.permission_granted(), Some(true));

    let at = Utc.with_ymd_and_hms(2030, 1, 2, 8, 15, 59).unwrap();
    let added = calendar.add_appointment("Zahnarzt", at, true).unwrap();
    assert_eq!(added.reminder, ReminderOutcome::Scheduled);

    let removed = calendar.remove(0).unwrap().unwrap();
    assert_eq!(removed.reminder, ReminderOutcome::Cancelled);

    let commands = calendar.scheduler_mut().drain();
    assert_eq!(commands.len(), 2);
    match &commands[0] {
        ReminderCommand::Schedule(request) => {
            assert_eq!(request.id, added.id);
            assert_eq!(request.title, REMINDER_TITLE);
            assert_eq!(request.body, "Zahnarzt");
            assert_eq!(
                request.fire_at,
                Utc.with_ymd_and_hms(2030, 1, 2, 8, 15, 0).unwrap()
            );
        }
        other => panic!("unexpected command: {other:?}"),
    }
    assert_eq!(commands[1], ReminderCommand::Cancel(added.id));
}

#[test]
fn reminder_failure_does_not_undo_the_saved_appointment() {
    let store = MemoryKeyValueStore::new();
    let mut calendar = CalendarService::open(&store, QueuedReminderScheduler::new(0));
    let at = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();

    let added = calendar.add_appointment("Meeting", at, true).unwrap();
    assert!(matches!(added.reminder, ReminderOutcome::Failed(_)));

    let reopened = CalendarService::open(&store, QueuedReminderScheduler::default());
    assert_eq!(reopened.items().len(), 1);
    assert_eq!(reopened.items()[0].id, added.id);
}

#[test]
fn permission_denial_does_not_gate_scheduling() {
    let store = MemoryKeyValueStore::new();
    let mut calendar = CalendarService::open(&store, QueuedReminderScheduler::default());
    assert_eq!(calendar.permission_granted(), Some(false));

    let at = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
    let added = calendar.add_appointment("Termin", at, true).unwrap();
    assert_eq!(added.reminder, ReminderOutcome::Scheduled);
    assert_eq!(calendar.scheduler().pending_ids().count(), 1);
    assert!(!calendar.scheduler_mut().request_permission());
}

#[test]
fn legacy_appointments_with_reference_date_seconds_are_readable() {
    let store = MemoryKeyValueStore::new();
    let legacy = r#"[
        {"id":"6B1E2A4C-7D3F-4E5A-9B8C-1D2E3F4A5B6C","title":"Zahnarzt","date":762000000.0,"notify":true},
        {"id":"0F6C3B1A-2E4D-4C5B-8A9F-7E6D5C4B3A21","title":"Frisör","date":761000000,"notify":false}
    ]"#;
    companion_core::KeyValueStore::set(&store, StorageKey::Appointments, legacy).unwrap();

    let mut calendar = CalendarService::open(&store, QueuedReminderScheduler::default());
    assert!(calendar.load_issue().is_none());
    let displayed = calendar
        .display()
        .iter()
        .map(|row| (row.appointment.title.clone(), row.appointment.date))
        .collect::<Vec<_>>();
    assert_eq!(
        displayed,
        vec![
            (
                "Frisör".to_string(),
                Utc.with_ymd_and_hms(2025, 2, 11, 20, 53, 20).unwrap()
            ),
            (
                "Zahnarzt".to_string(),
                Utc.with_ymd_and_hms(2025, 2, 23, 10, 40, 0).unwrap()
            ),
        ]
    );

    calendar
        .add_appointment("Neu", Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(), false)
        .unwrap();
    let raw = store.raw(StorageKey::Appointments).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["schema_version"], 1);
    assert_eq!(value["items"][0]["date"], "2025-02-23T10:40:00Z");
}

#[test]
fn permission_is_asked_on_open_only() {
    let store = MemoryKeyValueStore::new();
    let mut scheduler = CountingScheduler::default();

    let opened = CalendarService::open(&store, &mut scheduler);
    assert_eq!(opened.permission_granted(), Some(false));
    drop(opened);

    let at = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
    for _ in 0..3 {
        let mut calendar = CalendarService::attach(&store, &mut scheduler);
        assert_eq!(calendar.permission_granted(), None);
        calendar.add_appointment("Termin", at, true).unwrap();
        assert_eq!(calendar.display().len(), calendar.items().len());
    }

    assert_eq!(scheduler.permission_requests, 1);
    assert_eq!(scheduler.scheduled, 3);
}
