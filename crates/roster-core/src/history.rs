//! History Ledger — one aggregate record per calendar day of data.
//!
//! The ledger is keyed by data date: reprocessing a day overwrites that
//! day's counts in place instead of appending a second entry, and the
//! ledger is re-sorted after every upsert so backfilling an older date
//! still yields a chronologically ordered document on disk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{master::MasterTable, stats};

/// Daily aggregate counts for one data date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub date:    NaiveDate,
  pub added:   usize,
  pub removed: usize,
  pub total:   usize,
}

/// The full ledger, ordered ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
  entries: Vec<HistoryEntry>,
}

impl History {
  pub fn new() -> Self { Self::default() }

  pub fn entries(&self) -> &[HistoryEntry] { &self.entries }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  pub fn entry_for(&self, date: NaiveDate) -> Option<&HistoryEntry> {
    self.entries.iter().find(|e| e.date == date)
  }

  /// Derive the counts for `data_date` from `master` and append-or-replace
  /// the matching entry. The counts use the same date-equality derivation
  /// as the stats aggregator, so the two artifacts always agree for a
  /// given date.
  pub fn upsert(&mut self, master: &MasterTable, data_date: NaiveDate) {
    let entry = HistoryEntry {
      date:    data_date,
      added:   stats::added_on(master, data_date),
      removed: stats::removed_on(master, data_date),
      total:   master.active_count(),
    };

    match self.entries.iter_mut().find(|e| e.date == data_date) {
      Some(existing) => *existing = entry,
      None => self.entries.push(entry),
    }
    self.entries.sort_by_key(|e| e.date);
  }
}
