//! SQLite execution capability and bundled demo database
//!
//! One statement per call, each inside its own transaction scope so a failed
//! attempt leaves no partial side effects visible to the next attempt.

pub mod database;
pub mod seed;

pub use database::{Database, ResultSet};
