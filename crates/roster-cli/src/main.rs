//! `roster` — batch runner for the sponsor-register tracker.
//!
//! Processes one snapshot CSV end-to-end: diff against the master table,
//! then regenerate the stats, history, and delta artifacts. Fetching the
//! CSV from the publication page is the caller's job (curl, cron, etc.);
//! this binary only reads a local file.
//!
//! # Usage
//!
//! ```
//! roster --snapshot 2026-01-15_-_Worker_and_Temporary_Worker.csv
//! roster --snapshot register.csv --date 2026-01-15 --data-dir /var/lib/roster
//! roster --config ~/.config/roster/config.toml --snapshot register.csv
//! ```
//!
//! The data date is taken from `--date`, else from the snapshot file
//! name's `YYYY-MM-DD` prefix, else today's (UTC) date.

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use roster_store_fs::FsStore;
use serde::Deserialize;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Sponsor-register lifecycle tracker")]
struct Args {
  /// Path to a TOML config file (data_dir).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Path to the snapshot CSV to process.
  #[arg(short, long, value_name = "FILE")]
  snapshot: PathBuf,

  /// Nominal data date of the snapshot (YYYY-MM-DD). Defaults to the date
  /// in the snapshot file name, else today.
  #[arg(long, value_name = "DATE")]
  date: Option<NaiveDate>,

  /// Directory holding the master table and derived artifacts.
  #[arg(long, env = "ROSTER_DATA_DIR", value_name = "DIR")]
  data_dir: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  data_dir: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let data_dir = args
    .data_dir
    .clone()
    .or(file_cfg.data_dir)
    .unwrap_or_else(|| PathBuf::from("."));

  let data_date = resolve_data_date(&args);

  let file = File::open(&args.snapshot)
    .with_context(|| format!("opening snapshot {}", args.snapshot.display()))?;
  let snapshot = roster_feed::parse_snapshot(file, data_date)
    .context("parsing snapshot CSV")?;
  info!(rows = snapshot.len(), %data_date, "snapshot parsed");

  let store = FsStore::open(&data_dir)
    .with_context(|| format!("opening store in {}", data_dir.display()))?;

  let summary = roster_core::pipeline::run(&store, &snapshot, Utc::now())
    .context("tracker run failed")?;

  println!(
    "{}: {} added, {} removed, {} active",
    summary.data_date, summary.added, summary.removed, summary.total_active
  );
  Ok(())
}

/// `--date` wins; else the file-name prefix; else today, with a warning
/// since a wall-clock fallback mislabels late-processed snapshots.
fn resolve_data_date(args: &Args) -> NaiveDate {
  if let Some(date) = args.date {
    return date;
  }
  let from_name = args
    .snapshot
    .file_name()
    .and_then(|n| n.to_str())
    .and_then(roster_feed::data_date_from_filename);
  match from_name {
    Some(date) => {
      info!(%date, "data date taken from snapshot file name");
      date
    }
    None => {
      let today = Utc::now().date_naive();
      warn!(%today, "no data date given or derivable; using today");
      today
    }
  }
}
