use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::capability::CapabilityContract;
use crate::errors::{CapkitError, CapkitResult};
use crate::provider::ConfigurationProvider;
use crate::registry::Registry;
use crate::store::ConfigStore;

type Selection<C> = OnceCell<Option<Arc<C>>>;

thread_local! {
    // (context, contract, kind) selections running on this thread, outermost first
    static RESOLVING: RefCell<Vec<(usize, TypeId, &'static str)>> = RefCell::new(Vec::new());
}

/// Marks a contract as being selected on this thread until dropped.
struct Resolving;

impl Resolving {
    /// Fails with the dependency chain when `contract` is already being
    /// selected for the same context further up this thread's stack.
    fn enter(context: usize, contract: TypeId, kind: &'static str) -> Result<Self, String> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(start) = stack.iter().position(|(c, t, _)| *c == context && *t == contract) {
                let chain: Vec<&str> = stack[start..]
                    .iter()
                    .filter(|(c, _, _)| *c == context)
                    .map(|(_, _, k)| *k)
                    .chain(std::iter::once(kind))
                    .collect();
                return Err(chain.join(" -> "));
            }
            stack.push((context, contract, kind));
            Ok(Resolving)
        })
    }
}

impl Drop for Resolving {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

struct ContextInner {
    registry: Registry,
    // TypeId of the contract -> Arc<Selection<C>>
    selected: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

/// CapabilityContext resolves one implementation per contract and keeps it.
///
/// Holds:
/// - the frozen registration table
/// - one compute-once selection cell per contract type
///
/// Cloning is cheap and every clone shares the same selections, so a
/// context can be handed to threads and to collaborator factories.
#[derive(Clone)]
pub struct CapabilityContext {
    inner: Arc<ContextInner>,
}

impl CapabilityContext {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                registry,
                selected: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    fn selection<C>(&self) -> Arc<Selection<C>>
    where
        C: CapabilityContract + ?Sized,
    {
        let mut selected = self.inner.selected.lock();
        let slot = selected
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Arc::new(Selection::<C>::new()) as Arc<dyn Any + Send + Sync>);

        // keyed by TypeId::of::<C>, so the downcast always matches
        Arc::clone(slot)
            .downcast::<Selection<C>>()
            .unwrap_or_else(|_| Arc::new(Selection::<C>::new()))
    }

    /// The preferred usable implementation of `C`, or `None`.
    ///
    /// Discovery runs at most once per contract for the life of this
    /// context. Concurrent first callers block until the single running
    /// selection finishes, then all receive the same `Arc`.
    ///
    /// Factories may resolve other contracts through the context they are
    /// given. A factory that (directly or through another contract's
    /// factories) asks for the contract currently being selected gets
    /// `None` and a warning naming the cycle; the outer selection carries on.
    pub fn first_available<C>(&self) -> Option<Arc<C>>
    where
        C: CapabilityContract + ?Sized,
    {
        // map lock is released before selection runs
        let cell = self.selection::<C>();
        if let Some(selected) = cell.get() {
            return selected.clone();
        }

        let context = Arc::as_ptr(&self.inner) as usize;
        let _resolving = match Resolving::enter(context, TypeId::of::<C>(), C::KIND) {
            Ok(guard) => guard,
            Err(chain) => {
                warn!("Capability cycle while selecting '{}': {}", C::KIND, chain);
                return None;
            }
        };
        cell.get_or_init(|| self.select::<C>()).clone()
    }

    /// Like [`CapabilityContext::first_available`], for capabilities the
    /// process cannot run without.
    pub fn require<C>(&self) -> CapkitResult<Arc<C>>
    where
        C: CapabilityContract + ?Sized,
    {
        self.first_available::<C>().ok_or_else(|| {
            CapkitError::no_usable(C::KIND, self.registry().registered_count::<C>())
        })
    }

    /// Whether selection for `C` has already run.
    pub fn is_resolved<C>(&self) -> bool
    where
        C: CapabilityContract + ?Sized,
    {
        self.inner
            .selected
            .lock()
            .get(&TypeId::of::<C>())
            .and_then(|slot| slot.downcast_ref::<Selection<C>>())
            .is_some_and(|cell| cell.get().is_some())
    }

    /// The configuration store of the selected configuration provider.
    ///
    /// Configuration is mandatory: with no usable provider this fails.
    pub fn configuration(&self) -> CapkitResult<Arc<ConfigStore>> {
        let provider = self.require::<dyn ConfigurationProvider>()?;
        Ok(Arc::clone(provider.store()))
    }

    fn select<C>(&self) -> Option<Arc<C>>
    where
        C: CapabilityContract + ?Sized,
    {
        let mut usable = self.registry().all_usable::<C>(self);
        // stable: equal priorities keep registration order
        usable.sort_by_key(|candidate| candidate.priority());

        match usable.into_iter().next() {
            Some(chosen) => {
                info!(
                    "Selected {} for '{}' (priority {})",
                    chosen.name(),
                    C::KIND,
                    chosen.priority()
                );
                Some(chosen)
            }
            None => {
                warn!(
                    "No usable implementation for '{}' ({} registered)",
                    C::KIND,
                    self.registry().registered_count::<C>()
                );
                None
            }
        }
    }
}
