//! Storage layer for cst
//!
//! A single SQLite file. Row helpers take `&Connection` so they run the same
//! on the plain handle and inside [`Database::with_transaction`].

pub mod migrations;
pub mod plans;
pub mod progress;
pub mod roster;
pub mod skills;
pub mod sqlite;

pub use sqlite::{Database, now_timestamp};
