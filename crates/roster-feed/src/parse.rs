//! CSV reader for the published register.
//!
//! The feed's schema is mostly stable but not guaranteed: header cells may
//! carry stray whitespace, expected columns may be absent in older
//! publications, and new columns appear occasionally. An absent expected
//! column degrades to blank values (logged, never fatal); unknown columns
//! are carried through so the master table loses nothing.

use std::io::Read;

use csv::ReaderBuilder;
use roster_core::{record::columns, snapshot::SnapshotRow};
use tracing::warn;

use crate::error::{Error, Result};

/// Column layout of one concrete feed file, resolved from its header.
struct Layout {
  /// Index of each of the five known columns, if present.
  known: [Option<usize>; 5],
  /// `(header index, column name)` for passthrough columns.
  extra: Vec<(usize, String)>,
}

fn resolve_layout(headers: &csv::StringRecord) -> Layout {
  let mut known = [None; 5];
  let mut extra = Vec::new();

  for (i, raw) in headers.iter().enumerate() {
    let name = raw.trim();
    match columns::DESCRIPTIVE.iter().position(|&c| c == name) {
      Some(slot) if known[slot].is_none() => known[slot] = Some(i),
      // A repeated known header is feed noise; keep the first occurrence.
      Some(_) => {}
      None => extra.push((i, name.to_string())),
    }
  }

  for (slot, idx) in known.iter().enumerate() {
    if idx.is_none() {
      warn!(
        column = columns::DESCRIPTIVE[slot],
        "expected column missing from snapshot; treating as blank"
      );
    }
  }

  Layout { known, extra }
}

fn field<'a>(record: &'a csv::StringRecord, idx: Option<usize>) -> &'a str {
  idx.and_then(|i| record.get(i)).unwrap_or("")
}

/// Parse feed CSV into snapshot rows plus the passthrough column names, in
/// header order.
pub(crate) fn parse_rows<R: Read>(
  reader: R,
) -> Result<(Vec<SnapshotRow>, Vec<String>)> {
  let mut csv_reader = ReaderBuilder::new()
    .flexible(true)
    .from_reader(reader);

  let headers = csv_reader.headers()?.clone();
  if headers.is_empty() {
    return Err(Error::MissingHeader);
  }
  let layout = resolve_layout(&headers);

  let mut rows = Vec::new();
  for record in csv_reader.records() {
    let record = record?;
    let mut row = SnapshotRow::new(
      field(&record, layout.known[0]),
      field(&record, layout.known[1]),
      field(&record, layout.known[2]),
      field(&record, layout.known[3]),
      field(&record, layout.known[4]),
    );
    for (idx, name) in &layout.extra {
      let value = record.get(*idx).unwrap_or("").trim();
      row.extra.insert(name.clone(), value.to_string());
    }
    rows.push(row);
  }

  let extra_columns =
    layout.extra.into_iter().map(|(_, name)| name).collect();
  Ok((rows, extra_columns))
}
