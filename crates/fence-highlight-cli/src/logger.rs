//! Logging to stderr using env_logger
//!
//! Stdout carries the rendered HTML, so all log output goes to stderr.
//! `RUST_LOG` overrides the default level (`warn`, or `debug` with `--verbose`).

use env_logger::{Builder, Env, Target};

/// Initialize stderr logging
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Stderr)
        .format_timestamp_millis()
        .init();
}
