use chrono::NaiveDate;
use tempfile::tempdir;

use debt_core::storage::{book_warnings, load_book_from_path, save_book_to_path, DebtBook};
use debt_core::{
    Debt, DebtStorage, FixedClock, MemoryStorage, NewDebt, Payment, PaymentReconciler,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn populated_storage() -> MemoryStorage {
    let storage = MemoryStorage::new();
    let clock = FixedClock::from_date(date(2024, 2, 15));
    let debt = Debt::from_rate(
        NewDebt::new("Car loan", 12_000.0, 12, date(2024, 1, 15)),
        12.0,
        clock.0,
    )
    .unwrap();
    storage.save_debt(&debt).unwrap();
    let reconciler = PaymentReconciler::new(&storage, &clock);
    reconciler
        .record_payment(debt.id, None, 1_066.19, None, false)
        .unwrap();
    reconciler
        .record_payment(debt.id, Some(date(2024, 3, 15)), 1_066.19, None, false)
        .unwrap();
    storage
}

#[test]
fn book_snapshot_round_trips_through_json() {
    let storage = populated_storage();
    let book = storage.snapshot();
    assert_eq!(book.debts.len(), 1);
    assert_eq!(book.payments.len(), 2);

    let dir = tempdir().unwrap();
    let path = dir.path().join("books").join("debts.json");
    save_book_to_path(&book, &path).unwrap();
    let loaded = load_book_from_path(&path).unwrap();

    assert_eq!(loaded.schema_version, book.schema_version);
    assert_eq!(loaded.debts.len(), 1);
    assert_eq!(loaded.payments.len(), 2);
    assert_eq!(loaded.debts[0].id, book.debts[0].id);
    assert!((loaded.debts[0].current_balance - book.debts[0].current_balance).abs() < 1e-9);
    assert_eq!(loaded.payments[0].payment_date, book.payments[0].payment_date);
}

#[test]
fn restored_storage_keeps_reconciling() {
    let storage = populated_storage();
    let book = storage.snapshot();
    let debt_id = book.debts[0].id;
    let paid_before = book.debts[0].paid_installments;

    let restored = MemoryStorage::from_book(book);
    let clock = FixedClock::from_date(date(2024, 4, 15));
    let reconciler = PaymentReconciler::new(&restored, &clock);
    reconciler
        .record_payment(debt_id, None, 1_066.19, None, false)
        .unwrap();

    let debt = restored.get_debt(debt_id).unwrap();
    assert_eq!(debt.paid_installments, paid_before + 1);
}

#[test]
fn consistent_book_has_no_warnings() {
    let book = populated_storage().snapshot();
    let warnings = book_warnings(&book);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}

#[test]
fn warnings_flag_dangling_and_inconsistent_records() {
    let storage = populated_storage();
    let mut book = storage.snapshot();

    // Orphan payment and a corrupted active flag.
    let orphan = Payment::new(uuid::Uuid::new_v4(), date(2024, 2, 1), 100.0, 95.0, 5.0);
    book.payments.push(orphan);
    book.debts[0].is_active = false;

    let warnings = book_warnings(&book);
    assert_eq!(warnings.len(), 2, "got: {warnings:?}");
    assert!(warnings.iter().any(|w| w.contains("unknown debt")));
    assert!(warnings.iter().any(|w| w.contains("active flag")));
}

#[test]
fn legacy_books_without_schema_version_still_load() {
    let storage = populated_storage();
    let book = storage.snapshot();
    let mut value = serde_json::to_value(&book).unwrap();
    value.as_object_mut().unwrap().remove("schema_version");

    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

    let loaded = load_book_from_path(&path).unwrap();
    assert_eq!(loaded.schema_version, debt_core::storage::BOOK_SCHEMA_VERSION);
}

#[test]
fn missing_file_surfaces_a_storage_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_book_from_path(&path).unwrap_err();
    assert!(matches!(err, debt_core::DebtError::Storage(_)));
}

#[test]
fn empty_book_serializes_cleanly() {
    let book = DebtBook::new(Vec::new(), Vec::new());
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    save_book_to_path(&book, &path).unwrap();
    let loaded = load_book_from_path(&path).unwrap();
    assert!(loaded.debts.is_empty());
    assert!(loaded.payments.is_empty());
}
