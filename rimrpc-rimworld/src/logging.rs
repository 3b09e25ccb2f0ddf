//! `tracing` subscriber setup.
//!
//! `RUST_LOG` wins over the configured level when set.

use rimrpc_core::config::GeneralConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed (the host or a
/// test harness got there first); that is not an error.
pub fn init(config: &GeneralConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rimrpc_core={0},rimrpc_discord={0},rimrpc_rimworld={0}",
            config.log_level
        ))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.with_target(false).try_init()
    };
    result.is_ok()
}
