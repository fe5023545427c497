//! Diagnostics for the liftlog binary.
//!
//! The rendered workout summary is the program's output and goes to stdout.
//! Tracing events are diagnostics and go to stderr, filtered by `RUST_LOG`
//! when it is set.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level used when `RUST_LOG` is unset
pub const DEFAULT_LEVEL: &str = "info";

/// Install the stderr subscriber at [`DEFAULT_LEVEL`]
///
/// Config loads, undo and export are reported; per-clause rule matches need
/// `RUST_LOG=liftlog_core=trace`.
pub fn init() {
    init_with_level(DEFAULT_LEVEL)
}

/// Install the stderr subscriber with `default_level` unless `RUST_LOG` is set
pub fn init_with_level(default_level: &str) {
    tracing_subscriber::registry()
        .with(filter(default_level))
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Route events through the test harness so they show with failing tests
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
