//! Application-level constants.

use chrono::NaiveDate;

pub const APP_NAME: &str = "MedLab";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version written into exported snapshots.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Major snapshot version this build can import.
pub const SNAPSHOT_MAJOR: u64 = 1;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medlab_core=info"
}

/// Suggested file name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("medlab_data_{}.json", date.format("%Y-%m-%d"))
}
