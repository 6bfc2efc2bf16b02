//! # capkit-config: file-backed configuration providers
//!
//! Registers one [`FileConfiguration`] candidate per [`DocumentFormat`].
//! Each candidate looks for `<dir>/<name>.<ext>`; the most preferred
//! format whose document loads cleanly becomes the context's
//! configuration.
//!
//! ```rust,no_run
//! use capkit_core::Registry;
//!
//! let mut registry = Registry::new();
//! // collaborators register their own candidates here
//!
//! let ctx = capkit_config::bootstrap(registry)?;
//! let config = ctx.configuration()?;
//! let url = config.get_string_or("app.device.web.url", "http://localhost:4444");
//! # Ok::<(), capkit_core::CapkitError>(())
//! ```
//!
//! | format     | files                        | priority |
//! |------------|------------------------------|----------|
//! | properties | `<name>.properties`          | 10       |
//! | yaml       | `<name>.yaml`, `<name>.yml`  | 20       |
//! | json       | `<name>.json`                | 30       |
//!
//! `<name>` defaults to `application` and `<dir>` to the working
//! directory; see [`ConfigLocator::from_env`] for the overrides.

pub mod error;
pub mod file;
pub mod format;
pub mod locator;

use std::sync::Arc;

use capkit_core::{CapabilityContext, CapkitResult, ConfigurationProvider, Registry};
use tracing::info;

pub use error::{ConfigError, ConfigResult};
pub use file::FileConfiguration;
pub use format::DocumentFormat;
pub use locator::{ConfigLocator, CONFIG_DIR_ENV, CONFIG_NAME_ENV, DEFAULT_CONFIG_NAME};

/// Register every file format, located through the environment.
pub fn register_defaults(registry: &mut Registry) -> &mut Registry {
    register_with(registry, ConfigLocator::from_env())
}

/// Register every file format, located through `locator`.
pub fn register_with(registry: &mut Registry, locator: ConfigLocator) -> &mut Registry {
    for format in DocumentFormat::ALL {
        let locator = locator.clone();
        registry.register::<dyn ConfigurationProvider, _>(move |_| {
            Ok(Arc::new(FileConfiguration::load(&locator, format)))
        });
    }
    registry
}

/// Add the file providers to `registry` and resolve configuration.
///
/// Configuration is mandatory, so a context is only returned once a
/// provider has been selected.
pub fn bootstrap(registry: Registry) -> CapkitResult<CapabilityContext> {
    bootstrap_with(registry, ConfigLocator::from_env())
}

/// [`bootstrap`] with an explicit locator.
pub fn bootstrap_with(mut registry: Registry, locator: ConfigLocator) -> CapkitResult<CapabilityContext> {
    register_with(&mut registry, locator);
    let ctx = CapabilityContext::new(registry);
    let config = ctx.configuration()?;
    info!("Configuration ready: {} keys from {}", config.len(), config.source());
    Ok(ctx)
}
