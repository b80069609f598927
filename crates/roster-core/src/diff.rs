//! Diff Engine — classifies snapshot entities against the master table and
//! applies the lifecycle consequences.
//!
//! All comparisons are set-based over identities, so row order within the
//! snapshot never affects the outcome, and re-applying the same snapshot
//! for the same data date is a no-op (every id is already active with
//! `last_updated` equal to the date).

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::{
  Result,
  master::MasterTable,
  record::SponsorRecord,
  snapshot::{Snapshot, SnapshotRow},
};

/// Row-level change counts for one applied snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSummary {
  pub data_date: NaiveDate,
  /// Identities inserted this run (first ever appearance).
  pub added:     usize,
  /// Active identities stamped absent this run.
  pub removed:   usize,
}

/// Apply `snapshot` to `master`: insert newly appeared identities, stamp
/// newly absent ones, and refresh `last_updated` for everything present.
///
/// The register feed sometimes contains literal duplicate rows; they are
/// collapsed by identity (first occurrence wins) before any comparison, so
/// duplicates are never counted as distinct entities.
pub fn apply(master: &mut MasterTable, snapshot: &Snapshot) -> Result<DiffSummary> {
  let data_date = snapshot.data_date;

  let mut seen: HashSet<String> = HashSet::with_capacity(snapshot.len());
  let mut unique: Vec<(String, &SnapshotRow)> = Vec::with_capacity(snapshot.len());
  for row in &snapshot.rows {
    let id = row.identity();
    if seen.insert(id.clone()) {
      unique.push((id, row));
    }
  }
  if unique.len() < snapshot.len() {
    debug!(
      duplicates = snapshot.len() - unique.len(),
      "collapsed duplicate snapshot rows"
    );
  }

  master.merge_extra_columns(&snapshot.extra_columns);

  let snapshot_ids: HashSet<&str> =
    unique.iter().map(|(id, _)| id.as_str()).collect();

  // Previously active, absent now: first-seen-absent stamping. Rows that
  // are already inactive keep their original removed_date.
  let absent: Vec<String> = master
    .active()
    .filter(|r| !snapshot_ids.contains(r.identity.as_str()))
    .map(|r| r.identity.clone())
    .collect();
  for id in &absent {
    master.mark_removed(id, data_date)?;
  }

  // Present now: new identities get a fresh row; known identities keep
  // their lifecycle and have last_updated refreshed. A known-but-inactive
  // identity is a reappearance — removed_date is deliberately not cleared.
  let mut added = 0usize;
  for (id, row) in &unique {
    if master.contains(id) {
      if let Some(existing) = master.get(id)
        && !existing.is_active()
      {
        debug!(identity = %id, "soft-deleted identity reappeared; not reactivated");
      }
      master.touch(id, data_date)?;
    } else {
      master.insert(SponsorRecord {
        organisation: row.organisation.clone(),
        city:         row.city.clone(),
        county:       row.county.clone(),
        rating:       row.rating.clone(),
        route:        row.route.clone(),
        extra:        row.extra.clone(),
        identity:     id.clone(),
        first_seen:   data_date,
        last_updated: data_date,
        removed_date: None,
      })?;
      added += 1;
    }
  }

  let removed = absent.len();
  info!(%data_date, added, removed, "applied snapshot to master table");

  Ok(DiffSummary { data_date, added, removed })
}
