//! Snapshot export and import.

mod snapshot;

pub use snapshot::*;
