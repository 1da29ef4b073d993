//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config;

/// Install a formatting subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let result = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    if result.is_ok() {
        tracing::info!("{} core v{} logging initialized", config::APP_NAME, config::APP_VERSION);
    }
}
