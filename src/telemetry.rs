//! Tracing setup for the valuation service.
//!
//! Logging stays off unless `VALUATION_DEV_LOG=1` and the process runs in a
//! dev environment (debug build, or `SHUTTLE_ENV` of local/development/dev).
//! `RUST_LOG` overrides the default per-target filter.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_DEV_LOG: &str = "VALUATION_DEV_LOG";
pub const ENV_SHUTTLE_ENV: &str = "SHUTTLE_ENV";

/// Filter used when `RUST_LOG` is unset: engine/api batch profiles at debug,
/// config reloads at info, everything else at warn.
pub const DEFAULT_FILTER: &str = "engine=debug,api=debug,config=info,warn";

/// Whether the dev subscriber should be installed for these settings.
pub fn dev_logging_requested(dev_log: Option<&str>, shuttle_env: Option<&str>, debug_build: bool) -> bool {
    if dev_log.map(str::trim) != Some("1") {
        return false;
    }
    debug_build
        || shuttle_env.is_some_and(|env| {
            matches!(
                env.trim().to_ascii_lowercase().as_str(),
                "local" | "development" | "dev"
            )
        })
}

/// Install a compact fmt subscriber when dev logging is requested.
/// Returns whether a subscriber was installed.
pub fn init_dev_tracing() -> bool {
    let dev_log = std::env::var(ENV_DEV_LOG).ok();
    let shuttle_env = std::env::var(ENV_SHUTTLE_ENV).ok();
    if !dev_logging_requested(dev_log.as_deref(), shuttle_env.as_deref(), cfg!(debug_assertions)) {
        return false;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_without_flag() {
        assert!(!dev_logging_requested(None, Some("local"), true));
        assert!(!dev_logging_requested(Some("0"), Some("dev"), true));
    }

    #[test]
    fn debug_build_is_enough_with_flag() {
        assert!(dev_logging_requested(Some("1"), None, true));
    }

    #[test]
    fn release_build_needs_dev_shuttle_env() {
        assert!(!dev_logging_requested(Some("1"), None, false));
        assert!(!dev_logging_requested(Some("1"), Some("production"), false));
        assert!(dev_logging_requested(Some("1"), Some("Development"), false));
        assert!(dev_logging_requested(Some(" 1 "), Some("local"), false));
    }

    #[test]
    fn default_filter_parses() {
        assert!(DEFAULT_FILTER.parse::<EnvFilter>().is_ok());
    }
}
