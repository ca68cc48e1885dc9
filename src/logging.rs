//! Tracing subscriber setup for binaries and tests embedding the crate.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
#[must_use]
pub fn default_directive(debug: bool) -> &'static str {
    if debug { "codedup=debug" } else { "codedup=info" }
}

/// Installs a stderr fmt subscriber filtered by `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init(debug: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
