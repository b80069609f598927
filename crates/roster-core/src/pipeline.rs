//! End-to-end orchestration of one tracker run.
//!
//! A run is all-or-nothing: the new master table is fully computed in
//! memory before any artifact is written, so a failure anywhere leaves the
//! previously persisted state untouched. The derived artifacts (stats,
//! history, delta) are each computed independently from the same updated
//! table.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::info;

use crate::{delta, diff, snapshot::Snapshot, stats, store::RegisterStore};

/// Headline figures for one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
  pub data_date:    NaiveDate,
  /// Cumulative additions for the data date (master rows with
  /// `first_seen == data_date`), matching the stats and ledger figures.
  pub added:        usize,
  pub removed:      usize,
  pub total_active: usize,
}

#[derive(Debug, Error)]
pub enum RunError {
  #[error(transparent)]
  Core(#[from] crate::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Apply `snapshot` against the store's master table and regenerate every
/// derived artifact.
///
/// `generated_at` is the wall-clock timestamp stamped into the stats
/// document — pass `Utc::now()` outside of tests. All lifecycle dates come
/// from `snapshot.data_date`; the two clocks never mix.
pub fn run<S: RegisterStore>(
  store: &S,
  snapshot: &Snapshot,
  generated_at: DateTime<Utc>,
) -> Result<RunSummary, RunError> {
  let data_date = snapshot.data_date;
  info!(%data_date, rows = snapshot.len(), "starting tracker run");

  let mut master = store.load_master().map_err(box_store)?;
  diff::apply(&mut master, snapshot)?;

  // The master table is complete; persisting it is the commit point.
  store.save_master(&master).map_err(box_store)?;

  let stats_doc = stats::compute(&master, data_date, generated_at);
  store.save_stats(&stats_doc).map_err(box_store)?;

  let mut history = store.load_history().map_err(box_store)?;
  history.upsert(&master, data_date);
  store.save_history(&history).map_err(box_store)?;

  let delta_doc = delta::derive(&master, data_date);
  store.save_delta(&delta_doc).map_err(box_store)?;

  let summary = RunSummary {
    data_date,
    added: stats_doc.daily_metrics.added_today,
    removed: stats_doc.daily_metrics.removed_today,
    total_active: stats_doc.daily_metrics.total_active_sponsors,
  };
  info!(
    added = summary.added,
    removed = summary.removed,
    total_active = summary.total_active,
    "tracker run complete"
  );
  Ok(summary)
}

fn box_store<E: std::error::Error + Send + Sync + 'static>(e: E) -> RunError {
  RunError::Store(Box::new(e))
}
