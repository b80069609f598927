//! CSV feed codec for roster.
//!
//! Converts the government register's published CSV into a
//! [`roster_core::snapshot::Snapshot`]. Pure synchronous; no network or
//! file-system policy lives here — callers hand in bytes and a data date.
//!
//! # Quick start
//!
//! ```
//! use chrono::NaiveDate;
//!
//! let csv = "Organisation Name,Town/City,County,Type & Rating,Route\n\
//!            Acme Ltd,LONDON,,Worker (A rating),Skilled Worker\n";
//! let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let snapshot = roster_feed::parse_snapshot(csv.as_bytes(), date).unwrap();
//! assert_eq!(snapshot.rows.len(), 1);
//! assert_eq!(snapshot.rows[0].city, "London");
//! ```

pub mod error;
mod parse;

use std::io::Read;

use chrono::NaiveDate;
use roster_core::snapshot::Snapshot;

pub use error::{Error, Result};

/// Parse one published register CSV into a snapshot for `data_date`.
///
/// Header whitespace is tolerated; an expected column that is missing is
/// synthesized as blank for every row (with a logged warning); columns
/// beyond the known five are carried through. Duplicate data rows are
/// preserved here — deduplication is the diff engine's job.
pub fn parse_snapshot<R: Read>(reader: R, data_date: NaiveDate) -> Result<Snapshot> {
  let (rows, extra_columns) = parse::parse_rows(reader)?;
  let mut snapshot = Snapshot::new(data_date, rows);
  snapshot.extra_columns = extra_columns;
  Ok(snapshot)
}

/// Extract the nominal data date from a published file name.
///
/// Publications are named with a `YYYY-MM-DD` prefix (e.g.
/// `2026-01-15_-_Worker_and_Temporary_Worker.csv`); anything else yields
/// `None` and the caller picks a fallback.
pub fn data_date_from_filename(name: &str) -> Option<NaiveDate> {
  let prefix = name.get(..10)?;
  NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  #[test]
  fn parses_well_formed_feed() {
    let csv = "Organisation Name,Town/City,County,Type & Rating,Route\n\
               Acme Ltd,London,Greater London,Worker (A rating),Skilled Worker\n\
               Beta Corp,MANCHESTER,,Worker (A rating),Skilled Worker\n";
    let snapshot = parse_snapshot(csv.as_bytes(), d("2026-01-01")).unwrap();

    assert_eq!(snapshot.rows.len(), 2);
    assert_eq!(snapshot.rows[0].organisation, "Acme Ltd");
    assert_eq!(snapshot.rows[1].city, "Manchester");
    assert!(snapshot.extra_columns.is_empty());
  }

  #[test]
  fn trims_header_whitespace() {
    let csv = " Organisation Name ,Town/City,County,Type & Rating,Route\n\
               Acme Ltd,London,,A,Skilled Worker\n";
    let snapshot = parse_snapshot(csv.as_bytes(), d("2026-01-01")).unwrap();
    assert_eq!(snapshot.rows[0].organisation, "Acme Ltd");
  }

  #[test]
  fn missing_expected_column_degrades_to_blank() {
    // No County column at all; identity still derives, with a blank slot.
    let csv = "Organisation Name,Town/City,Type & Rating,Route\n\
               Acme Ltd,London,Worker (A rating),Skilled Worker\n";
    let snapshot = parse_snapshot(csv.as_bytes(), d("2026-01-01")).unwrap();

    assert_eq!(snapshot.rows[0].county, "");
    assert_eq!(
      snapshot.rows[0].identity(),
      "Acme Ltd|London||Worker (A rating)|Skilled Worker"
    );
  }

  #[test]
  fn unknown_columns_pass_through() {
    let csv = "Organisation Name,Town/City,County,Type & Rating,Route,Website\n\
               Acme Ltd,London,,A,Skilled Worker,acme.example\n";
    let snapshot = parse_snapshot(csv.as_bytes(), d("2026-01-01")).unwrap();

    assert_eq!(snapshot.extra_columns, vec!["Website".to_string()]);
    assert_eq!(
      snapshot.rows[0].extra.get("Website").map(String::as_str),
      Some("acme.example")
    );
  }

  #[test]
  fn filename_date_extraction() {
    assert_eq!(
      data_date_from_filename("2026-01-15_-_Worker_and_Temporary_Worker.csv"),
      Some(d("2026-01-15"))
    );
    assert_eq!(data_date_from_filename("register.csv"), None);
    assert_eq!(data_date_from_filename(""), None);
  }
}
