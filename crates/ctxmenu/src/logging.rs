//! Log output for native hosts.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, `info` when unset.
///
/// Returns `false` when a global subscriber is already installed.
pub fn init() -> bool {
    init_with("info")
}

/// Like [`init`], with `default` as the filter when `RUST_LOG` is unset.
pub fn init_with(default: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
