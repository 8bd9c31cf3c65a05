//! Logging setup shared by the server binaries.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise `default_level` is applied
/// to the given binary crate and `tower_http`, with `info` for everything
/// else.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    // Cargo bin names use hyphens, tracing targets use underscores
    let crate_target = bin_name.replace('-', "_");
    let default_directives =
        format!("info,{crate_target}={default_level},peercode={default_level},tower_http=debug");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
