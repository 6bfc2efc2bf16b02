//! Basic `tracing` subscriber setup driven by configuration.
//!
//! Enabled with the `tracing-basic` feature. The filter comes from
//! `RUST_LOG` when set, otherwise from [`LOG_LEVEL_KEY`], otherwise `info`.

use tracing_subscriber::EnvFilter;

use crate::errors::{CapkitError, CapkitResult};
use crate::store::ConfigStore;

/// Configuration key holding an `EnvFilter` directive, e.g. `debug` or
/// `capkit_core=debug,info`.
pub const LOG_LEVEL_KEY: &str = "app.logging.level";

pub fn filter_from(config: &ConfigStore) -> CapkitResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = config.get_string_or(LOG_LEVEL_KEY, "info");
    EnvFilter::try_new(&directive)
        .map_err(|e| CapkitError::Telemetry(format!("bad filter '{directive}': {e}")))
}

/// Install a global `fmt` subscriber. Fails if one is already installed.
pub fn init_tracing(config: &ConfigStore) -> CapkitResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_from(config)?)
        .try_init()
        .map_err(|e| CapkitError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_configured_directive() {
        let config = ConfigStore::from_pairs([(LOG_LEVEL_KEY, "capkit_core=debug,warn")]);
        assert!(filter_from(&config).is_ok());
    }

    #[test]
    fn second_install_fails() {
        let config = ConfigStore::new();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
