//! Integration tests for `FsStore` against a temporary directory.

use chrono::{NaiveDate, TimeZone, Utc};
use roster_core::{
  pipeline,
  snapshot::{Snapshot, SnapshotRow},
  store::RegisterStore,
};
use tempfile::TempDir;

use crate::FsStore;

fn d(s: &str) -> NaiveDate {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
}

fn clock() -> chrono::DateTime<Utc> {
  Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
}

fn row(organisation: &str, city: &str, route: &str) -> SnapshotRow {
  SnapshotRow::new(organisation, city, "", "Worker (A rating)", route)
}

// ─── Fresh state ─────────────────────────────────────────────────────────────

#[test]
fn missing_artifacts_load_as_empty() {
  let dir = TempDir::new().unwrap();
  let store = FsStore::open(dir.path()).unwrap();

  assert!(store.load_master().unwrap().is_empty());
  assert!(store.load_history().unwrap().is_empty());
}

// ─── Master round trip ───────────────────────────────────────────────────────

#[test]
fn master_survives_a_round_trip() {
  let dir = TempDir::new().unwrap();
  let store = FsStore::open(dir.path()).unwrap();

  let snapshot = Snapshot::new(d("2026-01-01"), vec![
    row("Acme Ltd", "London", "Route A"),
    row("Beta Corp", "Manchester", "Route B"),
  ]);
  pipeline::run(&store, &snapshot, clock()).unwrap();
  // Beta drops out next day so the file carries a removed_date too.
  pipeline::run(
    &store,
    &Snapshot::new(d("2026-01-02"), vec![row("Acme Ltd", "London", "Route A")]),
    clock(),
  )
  .unwrap();

  let loaded = store.load_master().unwrap();
  assert_eq!(loaded.len(), 2);

  let acme = loaded.get(&row("Acme Ltd", "London", "Route A").identity()).unwrap();
  assert!(acme.is_active());
  assert_eq!(acme.first_seen, d("2026-01-01"));
  assert_eq!(acme.last_updated, d("2026-01-02"));

  let beta = loaded.get(&row("Beta Corp", "Manchester", "Route B").identity()).unwrap();
  assert_eq!(beta.removed_date, Some(d("2026-01-02")));
}

#[test]
fn passthrough_columns_survive_a_round_trip() {
  let dir = TempDir::new().unwrap();
  let store = FsStore::open(dir.path()).unwrap();

  let csv = "Organisation Name,Town/City,County,Type & Rating,Route,Website\n\
             Acme Ltd,London,,Worker (A rating),Skilled Worker,acme.example\n";
  let snapshot = roster_feed::parse_snapshot(csv.as_bytes(), d("2026-01-01")).unwrap();
  pipeline::run(&store, &snapshot, clock()).unwrap();

  let loaded = store.load_master().unwrap();
  assert_eq!(loaded.extra_columns(), ["Website".to_string()]);
  let record = loaded.iter().next().unwrap();
  assert_eq!(record.extra.get("Website").map(String::as_str), Some("acme.example"));
}

// ─── Legacy and corrupt state ────────────────────────────────────────────────

#[test]
fn legacy_master_without_identity_column_is_backfilled() {
  let dir = TempDir::new().unwrap();
  let store = FsStore::open(dir.path()).unwrap();

  let legacy = "Organisation Name,Town/City,County,Type & Rating,Route,first_seen,last_updated,removed_date\n\
                Acme Ltd,London,,Worker (A rating),Skilled Worker,2025-12-01,2025-12-20,\n";
  std::fs::write(store.master_path(), legacy).unwrap();

  let loaded = store.load_master().unwrap();
  assert_eq!(loaded.len(), 1);
  let record = loaded.iter().next().unwrap();
  assert_eq!(
    record.identity,
    "Acme Ltd|London||Worker (A rating)|Skilled Worker"
  );

  // A snapshot containing the same row diffs as a continuation, not an add.
  let mut master = loaded;
  let summary = roster_core::diff::apply(
    &mut master,
    &Snapshot::new(d("2026-01-01"), vec![
      SnapshotRow::new("Acme Ltd", "London", "", "Worker (A rating)", "Skilled Worker"),
    ]),
  )
  .unwrap();
  assert_eq!(summary.added, 0);
}

#[test]
fn corrupt_master_recovers_as_empty() {
  let dir = TempDir::new().unwrap();
  let store = FsStore::open(dir.path()).unwrap();

  // No lifecycle columns at all: not a master table.
  std::fs::write(store.master_path(), "what,is,this\n1,2,3\n").unwrap();
  assert!(store.load_master().unwrap().is_empty());
}

#[test]
fn corrupt_history_recovers_as_empty() {
  let dir = TempDir::new().unwrap();
  let store = FsStore::open(dir.path()).unwrap();

  std::fs::write(dir.path().join(FsStore::HISTORY_FILE), "{not json").unwrap();
  assert!(store.load_history().unwrap().is_empty());
}

// ─── Idempotence over real files ─────────────────────────────────────────────

#[test]
fn same_snapshot_rerun_is_byte_identical() {
  let dir = TempDir::new().unwrap();
  let store = FsStore::open(dir.path()).unwrap();

  let snapshot = Snapshot::new(d("2026-01-01"), vec![
    row("Acme Ltd", "London", "Route A"),
    row("Beta Corp", "Manchester", "Route B"),
  ]);

  pipeline::run(&store, &snapshot, clock()).unwrap();
  let read_all = |name: &str| std::fs::read(dir.path().join(name)).unwrap();
  let before: Vec<Vec<u8>> = [
    FsStore::MASTER_FILE,
    FsStore::STATS_FILE,
    FsStore::HISTORY_FILE,
    FsStore::DELTA_FILE,
  ]
  .iter()
  .map(|n| read_all(n))
  .collect();

  pipeline::run(&store, &snapshot, clock()).unwrap();
  let after: Vec<Vec<u8>> = [
    FsStore::MASTER_FILE,
    FsStore::STATS_FILE,
    FsStore::HISTORY_FILE,
    FsStore::DELTA_FILE,
  ]
  .iter()
  .map(|n| read_all(n))
  .collect();

  assert_eq!(before, after);
}
