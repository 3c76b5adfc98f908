//! Log output for binaries embedding Escapade.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `info`. Does nothing if a subscriber is already installed.
pub fn init() {
    init_with("info");
}

/// Like [`init`], with a custom fallback directive such as
/// `"escapade_room=debug,info"`.
pub fn init_with(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
