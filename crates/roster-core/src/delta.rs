//! Delta Reporter — the row-level changes attributable to one data date.
//!
//! A delta is never accumulated: it is re-derivable at any time from the
//! master table and a date, and the persisted artifact only ever reflects
//! the most recent run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  master::MasterTable,
  record::{AddedRow, RemovedRow},
};

/// Row-level additions and removals for one data date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaRecord {
  pub date:    NaiveDate,
  pub added:   Vec<AddedRow>,
  pub removed: Vec<RemovedRow>,
}

/// Derive the delta for `data_date`: rows first seen on that date and rows
/// first found absent on that date, in master-table order.
pub fn derive(master: &MasterTable, data_date: NaiveDate) -> DeltaRecord {
  let added = master
    .iter()
    .filter(|r| r.first_seen == data_date)
    .map(AddedRow::from_record)
    .collect();
  let removed = master
    .iter()
    .filter(|r| r.removed_date == Some(data_date))
    .map(RemovedRow::from_record)
    .collect();

  DeltaRecord { date: data_date, added, removed }
}
