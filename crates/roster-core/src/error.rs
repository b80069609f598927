//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Inserting a master row whose identity is already present.
  #[error("duplicate identity in master table: {0}")]
  DuplicateIdentity(String),

  /// Stamping a lifecycle field on an identity the master table does not
  /// hold.
  #[error("identity not found in master table: {0}")]
  IdentityNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
