#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::{Field, Reimbursed};
use rust_decimal_macros::dec;

fn store_in(dir: &tempfile::TempDir) -> RecordStore {
    RecordStore::new(dir.path().join("prepaid_records.txt"))
}

fn line_count(store: &RecordStore) -> usize {
    fs::read_to_string(store.path()).unwrap().lines().count()
}

fn draft(amount: &str, reimbursed: &str) -> RecordDraft {
    RecordDraft::new("2024-01-15", "Taxi fare", amount, reimbursed)
}

// ── load ──────────────────────────────────────────────────────

#[test]
fn test_load_creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    assert!(!store.path().exists());

    let records = store.load().unwrap();
    assert!(records.is_empty());
    assert!(store.path().exists());
}

#[test]
fn test_load_creates_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("records.txt");
    let store = RecordStore::open(&path).unwrap();
    assert!(store.records().is_empty());
    assert!(path.exists());
}

#[test]
fn test_load_preserves_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    fs::write(
        store.path(),
        "2024-01-02,Second,2.00,No\n2024-01-01,First,1.00,Yes\n2024-01-03,Third,3.00,No\n",
    )
    .unwrap();

    let items: Vec<String> = store.load().unwrap().iter().map(|r| r.item.clone()).collect();
    assert_eq!(items, vec!["Second", "First", "Third"]);
}

#[test]
fn test_load_skips_one_malformed_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    fs::write(
        store.path(),
        "2024-01-01,Lunch,12.00,No\n\
         this line is broken\n\
         2024-01-02,Taxi,30.00,Yes\n\
         2024-01-03,Hotel,200.00,No\n",
    )
    .unwrap();

    assert_eq!(store.load().unwrap().len(), 3);
    let skipped = store.skipped();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].line_number, 2);
    assert_eq!(skipped[0].content, "this line is broken");
    assert_eq!(skipped[0].reason, RecordError::FieldCount(1));
}

#[test]
fn test_load_skips_bad_amount_and_bad_flag() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    fs::write(
        store.path(),
        "2024-01-01,Lunch,twelve,No\n\
         2024-01-02,Taxi,30.00,Maybe\n\
         2024-01-03,Refund,-5.00,No\n\
         2024-01-04,Hotel,200.00,No\n",
    )
    .unwrap();

    let records = store.load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].item, "Hotel");
    let reasons: Vec<&RecordError> = store.skipped().iter().map(|s| &s.reason).collect();
    assert_eq!(
        reasons,
        vec![
            &RecordError::InvalidAmount("twelve".into()),
            &RecordError::InvalidReimbursed("Maybe".into()),
            &RecordError::NonPositiveAmount(dec!(-5.00)),
        ]
    );
}

#[test]
fn test_load_ignores_blank_lines_and_crlf() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    fs::write(
        store.path(),
        "\r\n2024-01-01,Lunch,12.00,No\r\n\n   \n2024-01-02,Taxi,30.00,Yes\r\n",
    )
    .unwrap();

    assert_eq!(store.load().unwrap().len(), 2);
    assert!(store.skipped().is_empty());
    assert_eq!(store.records()[1].reimbursed, Reimbursed::Yes);
}

#[test]
fn test_load_skips_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let mut content = b"2024-01-01,Lunch,12.00,No\n".to_vec();
    content.extend_from_slice(&[0xff, 0xfe, b'\n']);
    content.extend_from_slice(b"2024-01-02,Taxi,30.00,Yes\n");
    content.extend_from_slice(b"\xff\xfe,bad,1,No\n");
    fs::write(store.path(), content).unwrap();

    assert_eq!(store.load().unwrap().len(), 2);
    let skipped = store.skipped();
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0].line_number, 2);
    assert_eq!(skipped[0].reason, RecordError::InvalidEncoding);
    assert_eq!(skipped[1].line_number, 4);
    assert_eq!(skipped[1].content, "\u{fffd}\u{fffd},bad,1,No");
}

#[test]
fn test_reload_replaces_previous_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    fs::write(store.path(), "2024-01-01,Lunch,12.00,No\nbroken\n").unwrap();
    store.load().unwrap();
    assert_eq!(store.skipped().len(), 1);

    fs::write(store.path(), "2024-01-01,Lunch,12.00,No\n").unwrap();
    store.load().unwrap();
    assert_eq!(store.records().len(), 1);
    assert!(store.skipped().is_empty());
}

// ── append ────────────────────────────────────────────────────

#[test]
fn test_append_then_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("records.txt")).unwrap();

    let written = store.append(&draft("45.5", "No")).unwrap();
    assert_eq!(written.amount, dec!(45.50));

    let records = store.load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], written);
    assert_eq!(records[0].date, "2024-01-15");
    assert_eq!(records[0].item, "Taxi fare");
    assert_eq!(format!("{:.2}", records[0].amount), "45.50");
    assert_eq!(records[0].reimbursed, Reimbursed::No);
}

#[test]
fn test_append_writes_exact_line() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(dir.path().join("records.txt")).unwrap();
    store.append(&draft("45.5", "No")).unwrap();
    store
        .append(&RecordDraft::new("2024-02-01", "Hotel", "1200", "Yes"))
        .unwrap();

    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        "2024-01-15,Taxi fare,45.50,No\n2024-02-01,Hotel,1200.00,Yes\n"
    );
}

#[test]
fn test_append_does_not_touch_loaded_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(dir.path().join("records.txt")).unwrap();
    store.append(&draft("10", "No")).unwrap();
    assert!(store.records().is_empty());
}

#[test]
fn test_append_allows_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("records.txt")).unwrap();
    store.append(&draft("10", "No")).unwrap();
    store.append(&draft("10", "No")).unwrap();
    let records = store.load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], records[1]);
}

#[test]
fn test_append_rejects_invalid_amount_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(dir.path().join("records.txt")).unwrap();
    store.append(&draft("10", "No")).unwrap();
    let before = line_count(&store);

    for bad in ["-5", "abc"] {
        let err = store.append(&draft(bad, "No")).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)), "{bad}: {err}");
        assert_eq!(line_count(&store), before);
    }
}

#[test]
fn test_append_rejects_invalid_reimbursed_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(dir.path().join("records.txt")).unwrap();

    let err = store.append(&draft("10", "Maybe")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Invalid(RecordError::InvalidReimbursed(_))
    ));
    assert_eq!(line_count(&store), 0);
}

#[test]
fn test_append_rejects_missing_field_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(dir.path().join("records.txt")).unwrap();

    let err = store
        .append(&RecordDraft::new("2024-01-15", "", "10", "No"))
        .unwrap_err();
    assert_eq!(err.to_string(), "item is required");
    assert!(matches!(
        err,
        StoreError::Invalid(RecordError::MissingField(Field::Item))
    ));
    assert_eq!(line_count(&store), 0);
}

#[test]
fn test_append_rejects_embedded_comma_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(dir.path().join("records.txt")).unwrap();

    assert!(store
        .append(&RecordDraft::new("2024-01-15", "Coffee, large", "4.50", "No"))
        .is_err());
    assert_eq!(line_count(&store), 0);
}

#[test]
fn test_append_repairs_missing_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    fs::write(store.path(), "2024-01-01,Lunch,12.00,No").unwrap();

    store.append(&draft("45.5", "No")).unwrap();
    let records = store.load().unwrap();
    assert_eq!(records.len(), 2);
    assert!(store.skipped().is_empty());
}

#[test]
fn test_append_io_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    // A directory in place of the file cannot be opened for appending
    let path = dir.path().join("records.txt");
    fs::create_dir(&path).unwrap();
    let store = RecordStore::new(&path);

    let err = store.append(&draft("10", "No")).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(err.to_string().starts_with("failed to open"));
}

// ── totals ────────────────────────────────────────────────────

#[test]
fn test_oversized_amounts_never_reach_the_total() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = store_in(&dir);
    let huge = "50000000000000000000000000000";
    assert!(matches!(
        store.append(&draft(huge, "No")),
        Err(StoreError::Invalid(RecordError::AmountTooLarge(_)))
    ));

    fs::write(
        store.path(),
        format!("2024-01-01,Jet,{huge},No\n2024-01-02,Jet,{huge},No\n2024-01-03,Taxi,10.00,No\n"),
    )
    .unwrap();
    store.load().unwrap();
    assert_eq!(store.records().len(), 1);
    assert_eq!(store.skipped().len(), 2);
    assert_eq!(store.total(), dec!(10.00));
}

#[test]
fn test_totals_follow_loaded_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = RecordStore::open(dir.path().join("records.txt")).unwrap();
    store.append(&draft("45.5", "No")).unwrap();
    store.append(&draft("4.50", "Yes")).unwrap();
    store.append(&draft("1000", "No")).unwrap();
    assert_eq!(store.total(), dec!(0));

    store.load().unwrap();
    assert_eq!(store.total(), dec!(1050.00));
    assert_eq!(store.outstanding(), dec!(1045.50));
}
