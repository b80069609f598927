//! CSV encode/decode for the persisted master table.
//!
//! Column order is: the five descriptive columns, any passthrough columns,
//! then the four lifecycle columns. Decoding is driven by the header, so a
//! reordered or legacy file (notably one without an `identity` column)
//! still loads; the identity is backfilled from the descriptive fields in
//! that case.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use roster_core::record::{SponsorRecord, columns};

use crate::error::{Error, Result};

// ─── Dates ───────────────────────────────────────────────────────────────────

pub(crate) fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub(crate) fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Empty cell means "no date" (an active row's `removed_date`).
pub(crate) fn decode_opt_date(s: &str) -> Result<Option<NaiveDate>> {
  if s.trim().is_empty() {
    Ok(None)
  } else {
    decode_date(s).map(Some)
  }
}

// ─── Header ──────────────────────────────────────────────────────────────────

/// Build the persisted header for a table with the given passthrough
/// columns.
pub(crate) fn header(extra_columns: &[String]) -> Vec<String> {
  let mut cols: Vec<String> =
    columns::DESCRIPTIVE.iter().map(|c| c.to_string()).collect();
  cols.extend(extra_columns.iter().cloned());
  cols.extend(columns::LIFECYCLE.iter().map(|c| c.to_string()));
  cols
}

/// Column positions resolved from a persisted header.
pub(crate) struct Layout {
  known:        [Option<usize>; 5],
  extra:        Vec<(usize, String)>,
  identity:     Option<usize>,
  first_seen:   usize,
  last_updated: usize,
  removed_date: Option<usize>,
}

impl Layout {
  pub(crate) fn resolve(headers: &csv::StringRecord) -> Result<Self> {
    let mut known = [None; 5];
    let mut extra = Vec::new();
    let mut identity = None;
    let mut first_seen = None;
    let mut last_updated = None;
    let mut removed_date = None;

    for (i, raw) in headers.iter().enumerate() {
      let name = raw.trim();
      if let Some(slot) = columns::DESCRIPTIVE.iter().position(|&c| c == name) {
        known[slot].get_or_insert(i);
      } else {
        match name {
          columns::IDENTITY => identity = Some(i),
          columns::FIRST_SEEN => first_seen = Some(i),
          columns::LAST_UPDATED => last_updated = Some(i),
          columns::REMOVED_DATE => removed_date = Some(i),
          _ => extra.push((i, name.to_string())),
        }
      }
    }

    // A table without lifecycle dates is not a master table at all.
    let first_seen = first_seen
      .ok_or_else(|| Error::DateParse("first_seen column missing".into()))?;
    let last_updated = last_updated
      .ok_or_else(|| Error::DateParse("last_updated column missing".into()))?;

    Ok(Self { known, extra, identity, first_seen, last_updated, removed_date })
  }

  /// Passthrough column names, in persisted order.
  pub(crate) fn extra_columns(&self) -> Vec<String> {
    self.extra.iter().map(|(_, name)| name.clone()).collect()
  }

  pub(crate) fn decode_record(
    &self,
    record: &csv::StringRecord,
  ) -> Result<SponsorRecord> {
    let cell = |idx: Option<usize>| {
      idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
    };

    let mut extra = BTreeMap::new();
    for (idx, name) in &self.extra {
      extra.insert(name.clone(), cell(Some(*idx)));
    }

    Ok(SponsorRecord {
      organisation: cell(self.known[0]),
      city:         cell(self.known[1]),
      county:       cell(self.known[2]),
      rating:       cell(self.known[3]),
      route:        cell(self.known[4]),
      extra,
      // Blank for legacy files; MasterTable::from_records backfills.
      identity:     cell(self.identity),
      first_seen:   decode_date(record.get(self.first_seen).unwrap_or(""))?,
      last_updated: decode_date(record.get(self.last_updated).unwrap_or(""))?,
      removed_date: decode_opt_date(
        self.removed_date.and_then(|i| record.get(i)).unwrap_or(""),
      )?,
    })
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// Encode one record in the column order produced by [`header`].
pub(crate) fn encode_record(
  record: &SponsorRecord,
  extra_columns: &[String],
) -> Vec<String> {
  let mut cells = vec![
    record.organisation.clone(),
    record.city.clone(),
    record.county.clone(),
    record.rating.clone(),
    record.route.clone(),
  ];
  for col in extra_columns {
    cells.push(record.extra.get(col).cloned().unwrap_or_default());
  }
  cells.push(record.identity.clone());
  cells.push(encode_date(record.first_seen));
  cells.push(encode_date(record.last_updated));
  cells.push(
    record.removed_date.map(encode_date).unwrap_or_default(),
  );
  cells
}
