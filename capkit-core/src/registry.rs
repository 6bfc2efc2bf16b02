use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::capability::CapabilityContract;
use crate::context::CapabilityContext;

/// Builds one candidate for contract `C`.
///
/// Factories receive the context so they can resolve the capabilities
/// they depend on (usually configuration).
pub type Factory<C> =
    Arc<dyn Fn(&CapabilityContext) -> anyhow::Result<Arc<C>> + Send + Sync>;

struct Entry {
    kind: &'static str,
    // Vec<Factory<C>> for the contract this entry is keyed by
    factories: Box<dyn Any + Send + Sync>,
}

/// Registration table mapping a contract type to its candidate factories.
///
/// Collaborator crates add their implementations at process start;
/// the table is then handed to a [`CapabilityContext`] and never changes.
/// Candidates are built in registration order, which says nothing about
/// preference. Preference is [`Capability::priority`](crate::Capability::priority).
#[derive(Default)]
pub struct Registry {
    entries: HashMap<TypeId, Entry>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a factory for contract `C`.
    pub fn register<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: CapabilityContract + ?Sized,
        F: Fn(&CapabilityContext) -> anyhow::Result<Arc<C>> + Send + Sync + 'static,
    {
        let entry = self.entries.entry(TypeId::of::<C>()).or_insert_with(|| Entry {
            kind: C::KIND,
            factories: Box::new(Vec::<Factory<C>>::new()),
        });

        if let Some(list) = entry.factories.downcast_mut::<Vec<Factory<C>>>() {
            list.push(Arc::new(factory));
            debug!("Registered '{}' candidate #{}", C::KIND, list.len() - 1);
        }
        self
    }

    /// Register an already-built instance.
    pub fn register_instance<C>(&mut self, instance: Arc<C>) -> &mut Self
    where
        C: CapabilityContract + ?Sized,
    {
        self.register::<C, _>(move |_| Ok(Arc::clone(&instance)))
    }

    fn factories<C>(&self) -> &[Factory<C>]
    where
        C: CapabilityContract + ?Sized,
    {
        self.entries
            .get(&TypeId::of::<C>())
            .and_then(|e| e.factories.downcast_ref::<Vec<Factory<C>>>())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn registered_count<C>(&self) -> usize
    where
        C: CapabilityContract + ?Sized,
    {
        self.factories::<C>().len()
    }

    pub fn is_registered<C>(&self) -> bool
    where
        C: CapabilityContract + ?Sized,
    {
        self.registered_count::<C>() > 0
    }

    /// Kinds of every contract with at least one registration, sorted.
    pub fn registered_kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.entries.values().map(|e| e.kind).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build every registered candidate for `C`, in registration order.
    ///
    /// A factory that errors or panics is logged and skipped.
    pub fn candidates<C>(&self, ctx: &CapabilityContext) -> Vec<Arc<C>>
    where
        C: CapabilityContract + ?Sized,
    {
        let mut out = Vec::new();
        for (index, factory) in self.factories::<C>().iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| factory(ctx))) {
                Ok(Ok(candidate)) => out.push(candidate),
                Ok(Err(e)) => {
                    warn!("Dropping '{}' candidate #{}: construction failed: {:#}", C::KIND, index, e);
                }
                Err(panic) => {
                    warn!(
                        "Dropping '{}' candidate #{}: construction panicked: {}",
                        C::KIND,
                        index,
                        panic_message(panic.as_ref())
                    );
                }
            }
        }
        out
    }

    /// Every candidate for `C` that reports itself usable.
    pub fn all_usable<C>(&self, ctx: &CapabilityContext) -> Vec<Arc<C>>
    where
        C: CapabilityContract + ?Sized,
    {
        self.candidates::<C>(ctx)
            .into_iter()
            .filter(|candidate| {
                match catch_unwind(AssertUnwindSafe(|| candidate.is_usable())) {
                    Ok(usable) => {
                        debug!("'{}' candidate {} usable: {}", C::KIND, candidate.name(), usable);
                        usable
                    }
                    Err(panic) => {
                        warn!(
                            "'{}' candidate {} panicked in is_usable: {}",
                            C::KIND,
                            candidate.name(),
                            panic_message(panic.as_ref())
                        );
                        false
                    }
                }
            })
            .collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
