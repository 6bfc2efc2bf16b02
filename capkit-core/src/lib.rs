//! capkit-core: capability selection and configuration for pluggable tooling.
//!
//! Two pieces every capkit collaborator relies on:
//! - a [`Registry`] of competing implementations per capability contract,
//!   resolved once per [`CapabilityContext`] by usability and priority
//! - a [`ConfigStore`] that exposes any nested document as dotted paths
//!   with typed, default-aware getters

pub mod capability;
pub mod coerce;
pub mod context;
pub mod errors;
pub mod flatten;
pub mod provider;
pub mod registry;
pub mod store;
#[cfg(feature = "tracing-basic")]
pub mod telemetry;

pub use capability::{Capability, CapabilityContract, LOWEST_PRIORITY};
pub use context::CapabilityContext;
pub use errors::{CapkitError, CapkitResult};
pub use flatten::{flatten, try_flatten, Flattened, MAX_DEPTH};
pub use provider::{ConfigurationProvider, StaticConfiguration};
pub use registry::{Factory, Registry};
pub use store::{ConfigSource, ConfigStore};
