//! Stats Aggregator — the cross-sectional statistics document.
//!
//! Everything here is a pure function of the master table and a reference
//! date. Daily counts are re-derived from the table by date equality rather
//! than carried over from the diff engine, so the aggregator is idempotent
//! and its numbers provably agree with the history ledger's.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{
  Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap,
};
use tracing::info;

use crate::{
  master::MasterTable,
  record::{AddedRow, RemovedRow},
};

/// Inclusive window, in days, for the "recently added" list.
pub const ADDED_WINDOW_DAYS: u64 = 7;
/// Inclusive window, in days, for the "recently removed" list.
pub const REMOVED_WINDOW_DAYS: u64 = 14;
/// Ranking length.
pub const TOP_N: usize = 5;
/// Cap on the "recently added" list; the removed list is uncapped.
pub const ADDED_LIST_CAP: usize = 1000;
/// Same-day additions above this share of the active count mean a bulk
/// import (first-ever load); the added list is suppressed for that run.
pub const BULK_IMPORT_RATIO: f64 = 0.9;

// ─── Document shape ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMetrics {
  pub added_today:           usize,
  pub removed_today:         usize,
  pub total_active_sponsors: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalTotals {
  pub unique_organisations: usize,
  pub unique_cities:        usize,
  pub unique_routes:        usize,
}

/// Top-N value counts, most frequent first; ties break by value so the
/// order is stable across runs. Serializes as a JSON object
/// (value → count) in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ranking(pub Vec<(String, usize)>);

impl Serialize for Ranking {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (value, count) in &self.0 {
      map.serialize_entry(value, count)?;
    }
    map.end()
  }
}

impl<'de> Deserialize<'de> for Ranking {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
      type Value = Ranking;

      fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a map of value to count")
      }

      fn visit_map<A: serde::de::MapAccess<'de>>(
        self,
        mut access: A,
      ) -> Result<Ranking, A::Error> {
        let mut entries = Vec::new();
        while let Some((value, count)) = access.next_entry::<String, usize>()? {
          entries.push((value, count));
        }
        Ok(Ranking(entries))
      }
    }
    deserializer.deserialize_map(Visitor)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rankings {
  pub top_routes:  Ranking,
  pub top_cities:  Ranking,
  pub top_ratings: Ranking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recency {
  pub added_last_7_days:    Vec<AddedRow>,
  pub removed_last_14_days: Vec<RemovedRow>,
}

/// The full stats document, overwritten wholesale each run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
  /// Wall-clock generation time — the only place the run clock appears;
  /// every other date in the document is on the data clock.
  pub generated_at:       DateTime<Utc>,
  pub daily_metrics:      DailyMetrics,
  pub categorical_totals: CategoricalTotals,
  pub rankings:           Rankings,
  pub recency:            Recency,
}

// ─── Daily counts (shared with the history ledger) ───────────────────────────

/// Master rows whose `first_seen` equals `date` — cumulative over the whole
/// table, not a per-run figure.
pub fn added_on(master: &MasterTable, date: NaiveDate) -> usize {
  master.iter().filter(|r| r.first_seen == date).count()
}

/// Master rows whose `removed_date` equals `date`.
pub fn removed_on(master: &MasterTable, date: NaiveDate) -> usize {
  master.iter().filter(|r| r.removed_date == Some(date)).count()
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

fn distinct_count<'a>(values: impl Iterator<Item = &'a str>) -> usize {
  values.collect::<std::collections::HashSet<_>>().len()
}

fn top_n<'a>(values: impl Iterator<Item = &'a str>, n: usize) -> Ranking {
  let mut counts: HashMap<&str, usize> = HashMap::new();
  for v in values {
    *counts.entry(v).or_insert(0) += 1;
  }
  let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
  entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
  entries.truncate(n);
  Ranking(entries.into_iter().map(|(v, c)| (v.to_string(), c)).collect())
}

/// Compute the stats document for `master` as of `data_date`.
///
/// `generated_at` is supplied by the caller (normally `Utc::now()`) so the
/// function stays a pure map from its inputs.
pub fn compute(
  master: &MasterTable,
  data_date: NaiveDate,
  generated_at: DateTime<Utc>,
) -> StatsSnapshot {
  let added_today = added_on(master, data_date);
  let removed_today = removed_on(master, data_date);
  let total_active = master.active_count();

  let categorical_totals = CategoricalTotals {
    unique_organisations: distinct_count(
      master.active().map(|r| r.organisation.as_str()),
    ),
    unique_cities: distinct_count(master.active().map(|r| r.city.as_str())),
    unique_routes: distinct_count(master.active().map(|r| r.route.as_str())),
  };

  let rankings = Rankings {
    top_routes:  top_n(master.active().map(|r| r.route.as_str()), TOP_N),
    top_cities:  top_n(master.active().map(|r| r.city.as_str()), TOP_N),
    top_ratings: top_n(master.active().map(|r| r.rating.as_str()), TOP_N),
  };

  // The guard triggers on proportion alone: on a first-ever load the whole
  // table is same-day, and listing it all as "new" would be noise.
  let bulk_import =
    added_today as f64 > total_active as f64 * BULK_IMPORT_RATIO;
  let added_last_7_days = if bulk_import {
    info!(added_today, total_active, "bulk import detected; suppressing added list");
    Vec::new()
  } else {
    let window_start = data_date
      .checked_sub_days(Days::new(ADDED_WINDOW_DAYS))
      .unwrap_or(NaiveDate::MIN);
    let mut rows: Vec<AddedRow> = master
      .active()
      .filter(|r| r.first_seen >= window_start && r.first_seen <= data_date)
      .map(AddedRow::from_record)
      .collect();
    rows.sort_by(|a, b| b.first_seen.cmp(&a.first_seen));
    rows.truncate(ADDED_LIST_CAP);
    rows
  };

  let removed_window_start = data_date
    .checked_sub_days(Days::new(REMOVED_WINDOW_DAYS))
    .unwrap_or(NaiveDate::MIN);
  let mut removed_last_14_days: Vec<RemovedRow> = master
    .iter()
    .filter(|r| {
      r.removed_date
        .is_some_and(|d| d >= removed_window_start && d <= data_date)
    })
    .map(RemovedRow::from_record)
    .collect();
  removed_last_14_days.sort_by(|a, b| b.removed_date.cmp(&a.removed_date));

  StatsSnapshot {
    generated_at,
    daily_metrics: DailyMetrics {
      added_today,
      removed_today,
      total_active_sponsors: total_active,
    },
    categorical_totals,
    rankings,
    recency: Recency { added_last_7_days, removed_last_14_days },
  }
}
