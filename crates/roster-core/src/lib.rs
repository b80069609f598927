//! Core types and engines for the roster sponsor-register tracker.
//!
//! This crate is deliberately free of file-system and network dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//!
//! The flow for one run: a [`snapshot::Snapshot`] goes through
//! [`diff::apply`], which mutates the [`master::MasterTable`]; the stats
//! aggregator, history ledger, and delta reporter then each derive their
//! artifact independently from the updated table. [`pipeline::run`] wires
//! the whole sequence up against any [`store::RegisterStore`] backend.

pub mod delta;
pub mod diff;
pub mod error;
pub mod history;
pub mod identity;
pub mod master;
pub mod pipeline;
pub mod record;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
