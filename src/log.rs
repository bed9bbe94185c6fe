// src/log.rs
//
// Thin macro layer over `tracing` so call sites stay short and uniform.
// The subscriber is installed once by the binary (or a test) via `init`.

use tracing_subscriber::{fmt, EnvFilter};

#[doc(hidden)]
pub use tracing;

/// Environment variable holding an `EnvFilter` directive (e.g. `fonds_scrape=debug`).
pub const LOG_ENV: &str = "FONDS_LOG";

/// Install the stderr subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::log::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::log::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        $crate::log::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::log::tracing::error!($($arg)*)
    };
}
