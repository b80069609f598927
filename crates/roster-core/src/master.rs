//! The master table — every sponsor identity ever observed.
//!
//! Rows are held in insertion order (so the persisted table is stable
//! across runs) with a by-identity index for O(1) lookup. At most one row
//! exists per identity; rows are only ever mutated by the diff engine and
//! are never physically deleted.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
  error::{Error, Result},
  record::SponsorRecord,
};

/// Insertion-ordered collection of [`SponsorRecord`]s, indexed by identity.
#[derive(Debug, Clone, Default)]
pub struct MasterTable {
  records: Vec<SponsorRecord>,
  index:   HashMap<String, usize>,
  /// Source columns outside the known five, in persisted column order.
  extra_columns: Vec<String>,
}

impl MasterTable {
  pub fn new() -> Self { Self::default() }

  /// Build a table from already-unique records, e.g. when loading from
  /// disk. Rows persisted without an identity (legacy tables) are
  /// backfilled from their descriptive fields.
  pub fn from_records(
    records: Vec<SponsorRecord>,
    extra_columns: Vec<String>,
  ) -> Result<Self> {
    let mut table = Self {
      records: Vec::with_capacity(records.len()),
      index: HashMap::new(),
      extra_columns,
    };
    for mut record in records {
      if record.identity.is_empty() {
        record.identity = record.derive_identity();
      }
      table.insert(record)?;
    }
    Ok(table)
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn contains(&self, identity: &str) -> bool {
    self.index.contains_key(identity)
  }

  pub fn get(&self, identity: &str) -> Option<&SponsorRecord> {
    self.index.get(identity).map(|&i| &self.records[i])
  }

  /// All rows, in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &SponsorRecord> {
    self.records.iter()
  }

  /// Rows with no `removed_date` — the most-recently-confirmed-present set.
  pub fn active(&self) -> impl Iterator<Item = &SponsorRecord> {
    self.records.iter().filter(|r| r.is_active())
  }

  pub fn active_count(&self) -> usize { self.active().count() }

  /// Columns beyond the known five that the persisted table carries.
  pub fn extra_columns(&self) -> &[String] { &self.extra_columns }

  /// Adopt the snapshot's passthrough column set. Columns are assumed
  /// stable across snapshots; union keeps older columns readable.
  pub fn merge_extra_columns(&mut self, columns: &[String]) {
    for col in columns {
      if !self.extra_columns.contains(col) {
        self.extra_columns.push(col.clone());
      }
    }
  }

  /// Append a new row. The identity must not already be present.
  pub fn insert(&mut self, record: SponsorRecord) -> Result<()> {
    if self.index.contains_key(&record.identity) {
      return Err(Error::DuplicateIdentity(record.identity));
    }
    self.index.insert(record.identity.clone(), self.records.len());
    self.records.push(record);
    Ok(())
  }

  /// Stamp `last_updated` on an existing row — the identity was confirmed
  /// present in the snapshot for `date`.
  pub fn touch(&mut self, identity: &str, date: NaiveDate) -> Result<()> {
    let record = self.get_mut(identity)?;
    record.last_updated = date;
    Ok(())
  }

  /// Stamp `removed_date` on an active row. A row that is already inactive
  /// is left untouched — it keeps the date it was first found absent.
  pub fn mark_removed(&mut self, identity: &str, date: NaiveDate) -> Result<()> {
    let record = self.get_mut(identity)?;
    if record.removed_date.is_none() {
      record.removed_date = Some(date);
    }
    Ok(())
  }

  fn get_mut(&mut self, identity: &str) -> Result<&mut SponsorRecord> {
    match self.index.get(identity) {
      Some(&i) => Ok(&mut self.records[i]),
      None => Err(Error::IdentityNotFound(identity.to_string())),
    }
  }
}
