//! # Capabilities
//!
//! A capability is one pluggable feature (configuration, logging,
//! notification, issue tracking, ...). Each feature is described by a
//! *contract*: a trait that extends [`Capability`]. Any number of
//! implementations may be registered for a contract, and the
//! [`CapabilityContext`](crate::CapabilityContext) picks one.
//!
//! ```rust
//! use capkit_core::{capability_contract, Capability};
//!
//! pub trait Notifier: Capability {
//!     fn notify(&self, message: &str) -> anyhow::Result<()>;
//! }
//!
//! capability_contract!(dyn Notifier, "notifier");
//! ```

/// The priority of a candidate that does not override [`Capability::priority`].
pub const LOWEST_PRIORITY: i32 = i32::MAX;

/// Base trait of every capability contract.
pub trait Capability: Send + Sync {
    /// Whether this implementation can serve requests in the current
    /// environment. Checked once, at selection time.
    fn is_usable(&self) -> bool;

    /// Lower values are preferred.
    fn priority(&self) -> i32 {
        LOWEST_PRIORITY
    }

    /// Name used in log lines.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Marks a trait-object type as a selectable contract.
///
/// Implemented for `dyn YourContract` via [`capability_contract!`].
pub trait CapabilityContract: Capability + 'static {
    /// Human-readable kind, used in logs and errors.
    const KIND: &'static str;
}

/// Declare a contract trait as selectable:
/// `capability_contract!(dyn Notifier, "notifier");`
#[macro_export]
macro_rules! capability_contract {
    (dyn $contract:path, $kind:expr) => {
        impl $crate::capability::CapabilityContract for dyn $contract {
            const KIND: &'static str = $kind;
        }
    };
}
