//! The `RegisterStore` trait and an in-memory backend.
//!
//! The trait is implemented by persistence backends (e.g.
//! `roster-store-fs`). The pipeline depends on this abstraction, not on any
//! concrete backend. Everything is synchronous: a run is a single-threaded
//! batch with no concurrent writers (by contract, not by locking).

use std::cell::RefCell;
use std::convert::Infallible;

use crate::{
  delta::DeltaRecord, history::History, master::MasterTable,
  stats::StatsSnapshot,
};

/// Abstraction over the durable artifacts of one register.
///
/// Load methods are expected to treat a missing artifact as empty, and an
/// unparsable secondary artifact (master table, history) as empty with a
/// logged warning — never as a fatal error. Save methods must replace the
/// previous artifact wholesale.
pub trait RegisterStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load the master table; empty if none has been persisted yet.
  fn load_master(&self) -> Result<MasterTable, Self::Error>;

  /// Persist `master`, replacing any previous table.
  fn save_master(&self, master: &MasterTable) -> Result<(), Self::Error>;

  /// Load the history ledger; empty if none has been persisted yet.
  fn load_history(&self) -> Result<History, Self::Error>;

  fn save_history(&self, history: &History) -> Result<(), Self::Error>;

  fn save_stats(&self, stats: &StatsSnapshot) -> Result<(), Self::Error>;

  fn save_delta(&self, delta: &DeltaRecord) -> Result<(), Self::Error>;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A store that keeps every artifact in memory — useful for testing and for
/// dry runs. Single-threaded by design, like the rest of the pipeline.
#[derive(Debug, Default)]
pub struct MemoryStore {
  master:  RefCell<Option<MasterTable>>,
  history: RefCell<Option<History>>,
  stats:   RefCell<Option<StatsSnapshot>>,
  delta:   RefCell<Option<DeltaRecord>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// The last persisted stats document, if any run has completed.
  pub fn stats(&self) -> Option<StatsSnapshot> {
    self.stats.borrow().clone()
  }

  pub fn delta(&self) -> Option<DeltaRecord> { self.delta.borrow().clone() }

  pub fn history(&self) -> Option<History> { self.history.borrow().clone() }
}

impl RegisterStore for MemoryStore {
  type Error = Infallible;

  fn load_master(&self) -> Result<MasterTable, Infallible> {
    Ok(self.master.borrow().clone().unwrap_or_default())
  }

  fn save_master(&self, master: &MasterTable) -> Result<(), Infallible> {
    *self.master.borrow_mut() = Some(master.clone());
    Ok(())
  }

  fn load_history(&self) -> Result<History, Infallible> {
    Ok(self.history.borrow().clone().unwrap_or_default())
  }

  fn save_history(&self, history: &History) -> Result<(), Infallible> {
    *self.history.borrow_mut() = Some(history.clone());
    Ok(())
  }

  fn save_stats(&self, stats: &StatsSnapshot) -> Result<(), Infallible> {
    *self.stats.borrow_mut() = Some(stats.clone());
    Ok(())
  }

  fn save_delta(&self, delta: &DeltaRecord) -> Result<(), Infallible> {
    *self.delta.borrow_mut() = Some(delta.clone());
    Ok(())
  }
}
