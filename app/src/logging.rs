//! FILENAME: app/src/logging.rs
// PURPOSE: Logger setup for the command-line tool.

use env_logger::{Builder, Env};

/// Install the global logger. `RUST_LOG` overrides the default `info` filter.
/// Calling this more than once is harmless.
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
