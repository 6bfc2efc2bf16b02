//! The configuration capability.
//!
//! Configuration is selected like any other capability: several document
//! formats may compete, and the winner's [`ConfigStore`] becomes the one
//! configuration source for the context. See `capkit-config` for the
//! file-backed providers.

use std::sync::Arc;

use crate::capability::{Capability, LOWEST_PRIORITY};
use crate::capability_contract;
use crate::store::ConfigStore;

/// A source of configuration.
///
/// Implementations report `is_usable() == true` only when their backing
/// document was found, read and parsed.
pub trait ConfigurationProvider: Capability {
    fn store(&self) -> &Arc<ConfigStore>;
}

capability_contract!(dyn ConfigurationProvider, "configuration");

/// In-memory configuration, always usable.
///
/// Handy for tests and for embedders that assemble configuration in code.
#[derive(Debug, Clone)]
pub struct StaticConfiguration {
    store: Arc<ConfigStore>,
    priority: i32,
}

impl StaticConfiguration {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store: Arc::new(store),
            priority: LOWEST_PRIORITY,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Capability for StaticConfiguration {
    fn is_usable(&self) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn name(&self) -> &str {
        "static"
    }
}

impl ConfigurationProvider for StaticConfiguration {
    fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }
}
