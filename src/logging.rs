//! Logger bootstrap for the CLI and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output and the
/// default is info.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // A second call (several tests in one binary) finds a logger installed
    // already; that is fine.
    let _ = Builder::from_env(env).format_timestamp_millis().try_init();
}
