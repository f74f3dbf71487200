//! cst - Circus Skills Tracker
//!
//! Skill catalog with weekly applicability, class plan composition and a
//! per-student progress ledger over one SQLite store.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod planner;
pub mod progress;
pub mod roster;
pub mod storage;
pub mod test_utils;

pub use error::{CstError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
