//! Plain-file backend for the roster register store.
//!
//! The master table lives as a CSV next to the three JSON artifacts
//! (stats, history, delta). Loads are tolerant of missing or corrupt
//! secondary files per the recovery policy documented on
//! [`roster_core::store::RegisterStore`]; writes are atomic
//! (temp-file-then-rename).

mod encode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FsStore;

#[cfg(test)]
mod tests;
