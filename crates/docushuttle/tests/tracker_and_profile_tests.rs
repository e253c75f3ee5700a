//! Duplicate tracker persistence and recipient profile storage.

mod common;

use chrono::{TimeZone, Utc};

use common::*;
use docushuttle::config::{load_settings, FilterConfig};
use docushuttle::db::{forwarded_repo, Database};
use docushuttle::mail::{DuplicateTracker, ForwardTracker};
use docushuttle::service::ForwardService;

#[test]
fn recording_twice_keeps_one_row_with_latest_timestamp() {
    let db = Database::open_in_memory().unwrap();
    let tracker = ForwardTracker::new(db.clone());
    let first = Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2024, 2, 3, 9, 0, 0).unwrap();

    tracker.record_forwarded("7612345", "Ops@Example.com", first);
    tracker.record_forwarded("7612345", "ops@example.com", second);

    assert_eq!(tracker.count_for(RECIPIENT).unwrap(), 1);
    let row = forwarded_repo::find(&db, "7612345", RECIPIENT)
        .unwrap()
        .unwrap();
    assert_eq!(row.recipient, "ops@example.com");
    assert_eq!(row.forwarded_at, second.to_rfc3339());
}

#[test]
fn tracker_survives_reopen() {
    let harness = TestHarness::new();
    let path = harness.data_dir.join(docushuttle::config::paths::DATABASE_FILE);
    harness
        .tracker()
        .record_forwarded("7612345", RECIPIENT, Utc::now());

    let reopened = ForwardTracker::new(Database::open(&path).unwrap());
    assert!(reopened.has_forwarded("7612345", RECIPIENT));
    assert!(!reopened.has_forwarded("7612345", "audit@example.com"));
}

#[test]
fn deleting_a_profile_clears_its_history() {
    let harness = TestHarness::with_messages(invoice_batch(2));
    let settings = SettingsBuilder::new().prefixes("76").build();
    harness.service.save_profile(&settings).unwrap();
    harness.forward(&settings);
    assert_eq!(harness.tracker().count_for(RECIPIENT).unwrap(), 2);

    assert!(harness.service.delete_profile(RECIPIENT).unwrap());

    assert!(harness.service.recipients().unwrap().is_empty());
    assert_eq!(harness.tracker().count_for(RECIPIENT).unwrap(), 0);
    let (again, _) = harness.forward(&settings);
    assert_eq!(again.forwarded, 2);
}

#[test]
fn profile_delete_ignores_recipient_case() {
    let harness = TestHarness::with_messages(invoice_batch(2));
    let settings = SettingsBuilder::new()
        .recipient("Ops@Example.com")
        .prefixes("76")
        .build();
    harness.service.save_profile(&settings).unwrap();
    harness.forward(&settings);

    assert!(harness.service.load_profile(RECIPIENT).unwrap().is_some());
    assert!(harness.service.delete_profile(RECIPIENT).unwrap());
    assert!(harness.service.recipients().unwrap().is_empty());
    assert_eq!(harness.tracker().count_for(RECIPIENT).unwrap(), 0);
}

#[test]
fn deleting_unknown_profile_keeps_history() {
    let harness = TestHarness::with_messages(invoice_batch(2));
    harness.forward(&SettingsBuilder::new().prefixes("76").build());

    assert!(!harness.service.delete_profile(RECIPIENT).unwrap());
    assert_eq!(harness.tracker().count_for(RECIPIENT).unwrap(), 2);
}

#[test]
fn profiles_are_listed_sorted() {
    let service = ForwardService::new(Database::open_in_memory().unwrap());
    for recipient in ["zed@example.com", "amy@example.com", "ops@example.com"] {
        service
            .save_profile(&SettingsBuilder::new().recipient(recipient).build())
            .unwrap();
    }

    assert_eq!(
        service.recipients().unwrap(),
        vec!["amy@example.com", "ops@example.com", "zed@example.com"]
    );
}

#[test]
fn saved_profile_round_trips_into_filter_config() {
    let service = ForwardService::new(Database::open_in_memory().unwrap());
    let settings = SettingsBuilder::new()
        .prefixes("76,81")
        .dates("2024-01-01", "2024-01-31")
        .delay(2.5)
        .require_attachments(false)
        .build();
    service.save_profile(&settings).unwrap();

    let loaded = service.load_profile(RECIPIENT).unwrap().unwrap();
    let filter = FilterConfig::from_settings(&loaded).unwrap();

    assert_eq!(filter.file_number_prefixes, vec!["76", "81"]);
    assert_eq!(filter.date_range_days(), 30);
    assert!(!filter.require_attachments);
    assert_eq!(filter.delay_seconds, 2.5);
}

#[test]
fn settings_file_loads_with_defaults() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("run.json");
    std::fs::write(
        &path,
        r#"{
            "recipient": "ops@example.com",
            "subject_keyword": "BILLING INVOICE",
            "start_date": "01/01/2024",
            "end_date": "01/05/2024",
            "file_number_prefix": "76"
        }"#,
    )
    .unwrap();

    let settings = load_settings(&path).unwrap();
    assert!(settings.require_attachments);
    assert!(settings.skip_forwarded);
    assert_eq!(settings.timezone, "US/Eastern");

    let harness = TestHarness::with_messages([invoice(
        "Q1 BILLING INVOICE",
        "7612345",
        eastern(2024, 1, 3, 9, 15, 0),
    )]);
    let (outcome, _) = harness.forward(&settings);
    assert_eq!(outcome.forwarded, 1);
}
