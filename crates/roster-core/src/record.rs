//! Sponsor records — the rows of the master table.
//!
//! A record is the union of the register's descriptive fields and the three
//! lifecycle dates the tracker maintains. Records are created when an
//! identity is first observed and are never physically deleted; removal from
//! the register is the soft state of a set `removed_date`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::identity;

/// Column names of the published register and the persisted master table.
pub mod columns {
  pub const ORGANISATION: &str = "Organisation Name";
  pub const CITY: &str = "Town/City";
  pub const COUNTY: &str = "County";
  pub const RATING: &str = "Type & Rating";
  pub const ROUTE: &str = "Route";

  pub const IDENTITY: &str = "identity";
  pub const FIRST_SEEN: &str = "first_seen";
  pub const LAST_UPDATED: &str = "last_updated";
  pub const REMOVED_DATE: &str = "removed_date";

  /// The five descriptive columns, in identity-derivation order.
  pub const DESCRIPTIVE: [&str; 5] = [ORGANISATION, CITY, COUNTY, RATING, ROUTE];

  /// The lifecycle columns appended to the master table.
  pub const LIFECYCLE: [&str; 4] =
    [IDENTITY, FIRST_SEEN, LAST_UPDATED, REMOVED_DATE];
}

// ─── SponsorRecord ───────────────────────────────────────────────────────────

/// One row of the master table: one sponsor identity ever observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorRecord {
  pub organisation: String,
  /// Stored in canonical title case (see [`identity::normalize_city`]).
  pub city:         String,
  pub county:       String,
  pub rating:       String,
  pub route:        String,
  /// Source columns outside the known five, carried through untouched.
  pub extra:        BTreeMap<String, String>,

  /// Composite key derived from the descriptive fields; unique per row.
  pub identity:     String,
  /// Date the identity first appeared in any snapshot; immutable once set.
  pub first_seen:   NaiveDate,
  /// Date of the most recent snapshot in which the identity was present.
  pub last_updated: NaiveDate,
  /// Date the identity was first found absent after having been active.
  /// `None` while active; once set, never cleared.
  pub removed_date: Option<NaiveDate>,
}

impl SponsorRecord {
  pub fn is_active(&self) -> bool { self.removed_date.is_none() }

  /// Re-derive the identity from the descriptive fields. Used to backfill
  /// legacy master tables persisted without an identity column.
  pub fn derive_identity(&self) -> String {
    identity::derive(
      &self.organisation,
      &self.city,
      &self.county,
      &self.rating,
      &self.route,
    )
  }
}

// ─── Reduced projections ─────────────────────────────────────────────────────

/// Reduced projection of a recently added sponsor, as published in the
/// stats snapshot and the delta record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedRow {
  pub organisation: String,
  pub city:         String,
  pub route:        String,
  pub first_seen:   NaiveDate,
}

/// Reduced projection of a recently removed sponsor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedRow {
  pub organisation: String,
  pub city:         String,
  pub route:        String,
  pub removed_date: NaiveDate,
}

impl AddedRow {
  pub fn from_record(r: &SponsorRecord) -> Self {
    Self {
      organisation: r.organisation.clone(),
      city:         r.city.clone(),
      route:        r.route.clone(),
      first_seen:   r.first_seen,
    }
  }
}

impl RemovedRow {
  /// Panics in debug builds if the record is still active; callers filter
  /// on `removed_date` first.
  pub fn from_record(r: &SponsorRecord) -> Self {
    debug_assert!(r.removed_date.is_some());
    Self {
      organisation: r.organisation.clone(),
      city:         r.city.clone(),
      route:        r.route.clone(),
      removed_date: r.removed_date.unwrap_or(r.last_updated),
    }
  }
}
