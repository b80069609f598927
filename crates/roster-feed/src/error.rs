//! Error types for the roster-feed codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("snapshot has no header row")]
  MissingHeader,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
