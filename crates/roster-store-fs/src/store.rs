//! [`FsStore`] — the plain-file implementation of [`RegisterStore`].
//!
//! One directory holds the four artifacts of one register: the master
//! table as CSV and stats/history/delta as JSON. Every write goes through
//! a temp file in the same directory followed by a rename, so a crashed or
//! failed run can never leave a half-written artifact behind.

use std::{
  fs, io,
  io::Write as _,
  path::{Path, PathBuf},
};

use roster_core::{
  delta::DeltaRecord,
  history::History,
  master::MasterTable,
  stats::StatsSnapshot,
  store::RegisterStore,
};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::{
  Error, Result,
  encode::{Layout, encode_record, header},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A register store backed by plain files in one directory.
#[derive(Debug, Clone)]
pub struct FsStore {
  master_path:  PathBuf,
  stats_path:   PathBuf,
  history_path: PathBuf,
  delta_path:   PathBuf,
}

impl FsStore {
  pub const MASTER_FILE: &'static str = "master_register.csv";
  pub const STATS_FILE: &'static str = "stats.json";
  pub const HISTORY_FILE: &'static str = "history.json";
  pub const DELTA_FILE: &'static str = "delta.json";

  /// Open a store rooted at `dir`, creating the directory if needed, with
  /// the default artifact file names.
  pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    Ok(Self {
      master_path:  dir.join(Self::MASTER_FILE),
      stats_path:   dir.join(Self::STATS_FILE),
      history_path: dir.join(Self::HISTORY_FILE),
      delta_path:   dir.join(Self::DELTA_FILE),
    })
  }

  /// Build a store with explicit artifact paths, for callers that keep
  /// artifacts in separate locations.
  pub fn with_paths(
    master_path: PathBuf,
    stats_path: PathBuf,
    history_path: PathBuf,
    delta_path: PathBuf,
  ) -> Self {
    Self { master_path, stats_path, history_path, delta_path }
  }

  pub fn master_path(&self) -> &Path { &self.master_path }

  // ── Encoding ──────────────────────────────────────────────────────────────

  fn encode_master(master: &MasterTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header(master.extra_columns()))?;
    for record in master.iter() {
      writer.write_record(encode_record(record, master.extra_columns()))?;
    }
    writer
      .into_inner()
      .map_err(|e| Error::Io(io::Error::other(e.to_string())))
  }

  fn decode_master(bytes: &[u8]) -> Result<MasterTable> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
      return Err(Error::MissingHeader);
    }
    let layout = Layout::resolve(&headers)?;

    let mut records = Vec::new();
    for record in reader.records() {
      records.push(layout.decode_record(&record?)?);
    }
    Ok(MasterTable::from_records(records, layout.extra_columns())?)
  }

  // ── Atomic writes ─────────────────────────────────────────────────────────

  fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
      Some(dir) => NamedTempFile::new_in(dir)?,
      None => NamedTempFile::new()?,
    };
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
  }

  fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Self::write_atomic(path, &bytes)
  }
}

// ─── RegisterStore impl ──────────────────────────────────────────────────────

impl RegisterStore for FsStore {
  type Error = Error;

  /// Missing file: a fresh register, empty table. Unparsable file: logged
  /// and treated as empty — the next run re-classifies every snapshot row
  /// as newly added, which is the accepted degradation. Any other I/O
  /// failure is fatal.
  fn load_master(&self) -> Result<MasterTable> {
    let bytes = match fs::read(&self.master_path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Ok(MasterTable::new());
      }
      Err(e) => return Err(e.into()),
    };

    match Self::decode_master(&bytes) {
      Ok(master) => Ok(master),
      Err(e) => {
        warn!(
          path = %self.master_path.display(),
          error = %e,
          "master table unparsable; starting from empty"
        );
        Ok(MasterTable::new())
      }
    }
  }

  fn save_master(&self, master: &MasterTable) -> Result<()> {
    let bytes = Self::encode_master(master)?;
    Self::write_atomic(&self.master_path, &bytes)
  }

  fn load_history(&self) -> Result<History> {
    let bytes = match fs::read(&self.history_path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Ok(History::new());
      }
      Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice(&bytes) {
      Ok(history) => Ok(history),
      Err(e) => {
        warn!(
          path = %self.history_path.display(),
          error = %e,
          "history ledger unparsable; rebuilding from empty"
        );
        Ok(History::new())
      }
    }
  }

  fn save_history(&self, history: &History) -> Result<()> {
    Self::write_json(&self.history_path, history)
  }

  fn save_stats(&self, stats: &StatsSnapshot) -> Result<()> {
    Self::write_json(&self.stats_path, stats)
  }

  fn save_delta(&self, delta: &DeltaRecord) -> Result<()> {
    Self::write_json(&self.delta_path, delta)
  }
}
