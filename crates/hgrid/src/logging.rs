#![forbid(unsafe_code)]

//! Opt-in log output for applications.
//!
//! The hgrid crates only emit `tracing` events; they never install a
//! subscriber. Applications that have no subscriber of their own can call
//! [`init`] once at startup.
//!
//! The filter is read from `HGRID_LOG` using `EnvFilter` directive syntax
//! (`HGRID_LOG=hgrid_runtime=debug,warn`) and defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const ENV_VAR: &str = "HGRID_LOG";

/// Filter used when `HGRID_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter [`init`] would install.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global fmt subscriber.
///
/// Returns `false` if a global subscriber was already set, in which case
/// nothing changes.
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
        .is_ok()
}
