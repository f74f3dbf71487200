//! Library-level workflows against on-disk stores.

mod fixture;
mod import_tests;
mod plan_tests;
mod progress_tests;
