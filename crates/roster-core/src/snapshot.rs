//! Snapshot — one full point-in-time pull of the register.
//!
//! A snapshot is the raw row sequence from one published CSV, tagged with
//! the nominal date the data represents (not the run's wall-clock date).
//! Rows are normalized at construction so the master table only ever holds
//! canonical field values; deduplication happens later, in the diff engine.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::identity;

/// The descriptive fields of one register row, before lifecycle tracking.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRow {
  pub organisation: String,
  pub city:         String,
  pub county:       String,
  pub rating:       String,
  pub route:        String,
  /// Source columns outside the known five, carried through to the master
  /// table untouched.
  pub extra:        BTreeMap<String, String>,
}

impl SnapshotRow {
  /// Build a row from raw field values, applying the normalization rules:
  /// every field trimmed, the city title-cased.
  pub fn new(
    organisation: &str,
    city: &str,
    county: &str,
    rating: &str,
    route: &str,
  ) -> Self {
    Self {
      organisation: organisation.trim().to_string(),
      city:         identity::normalize_city(city),
      county:       county.trim().to_string(),
      rating:       rating.trim().to_string(),
      route:        route.trim().to_string(),
      extra:        BTreeMap::new(),
    }
  }

  /// The composite identity of this row. Fields are already normalized, so
  /// this is a plain join.
  pub fn identity(&self) -> String {
    identity::derive(
      &self.organisation,
      &self.city,
      &self.county,
      &self.rating,
      &self.route,
    )
  }
}

/// One full pull of the register: ordered rows plus the data date.
#[derive(Debug, Clone)]
pub struct Snapshot {
  /// The nominal date the source data represents — drives all lifecycle
  /// stamping. Distinct from the run's wall-clock time.
  pub data_date: NaiveDate,
  /// Raw rows in source order, possibly containing duplicates.
  pub rows:      Vec<SnapshotRow>,
  /// Source columns outside the known five, in source header order.
  /// Values live in each row's `extra` map.
  pub extra_columns: Vec<String>,
}

impl Snapshot {
  pub fn new(data_date: NaiveDate, rows: Vec<SnapshotRow>) -> Self {
    Self { data_date, rows, extra_columns: Vec::new() }
  }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}
