use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tracing::info;

use super::{GlobalState, StoreConfig};
use crate::dispatch::{resolve_validated, validate_action};
use crate::error::Result;
use crate::registry::Registry;
use crate::value::Value;

type Subscriber = Arc<dyn Fn(&GlobalState) + Send + Sync>;
type TransitionObserver = Arc<dyn Fn(&Transition) + Send + Sync>;

/// One committed state change, as seen by transition observers.
#[derive(Clone, Debug)]
pub struct Transition {
    pub action_type: String,
    pub previous: GlobalState,
    pub next: GlobalState,
}

/// Outcome of a successful dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// A handler ran and a new snapshot was committed.
    Changed,
    /// No handler is registered for the action type; nothing was committed.
    Unchanged,
}

struct StoreInner {
    registry: Arc<Registry>,
    config: StoreConfig,
    state: RwLock<GlobalState>,
    // Serializes validate -> resolve -> commit -> notify. Reentrant so a
    // subscriber may dispatch from inside its callback.
    commit: ReentrantMutex<()>,
    // Committed transitions not yet delivered, oldest first. Only touched
    // while `commit` is held.
    pending: Mutex<VecDeque<Transition>>,
    publishing: AtomicBool,
    subscribers: RwLock<Vec<(usize, Subscriber)>>,
    observers: RwLock<Vec<(usize, TransitionObserver)>>,
    next_listener_id: AtomicUsize,
}

impl StoreInner {
    fn dispatch(&self, action: &Value) -> Result<Dispatched> {
        let _commit = self.commit.lock();

        let (action_type, payload) = validate_action(action)?;
        let previous = self.state.read().clone();
        let next = resolve_validated(&previous, action_type, payload, &self.registry);

        if next.ptr_eq(&previous) {
            return Ok(Dispatched::Unchanged);
        }

        *self.state.write() = next.clone();
        self.pending.lock().push_back(Transition {
            action_type: action_type.to_owned(),
            previous,
            next,
        });

        // A dispatch made from inside a listener only queues its transition;
        // the outermost dispatch delivers it once the current one is done.
        if self.publishing.swap(true, Ordering::SeqCst) {
            return Ok(Dispatched::Changed);
        }
        let _publishing = PublishingGuard(self);
        loop {
            let Some(transition) = self.pending.lock().pop_front() else {
                break;
            };
            self.publish(&transition);
        }
        Ok(Dispatched::Changed)
    }

    /// Notify observers and subscribers of a committed transition.
    fn publish(&self, transition: &Transition) {
        if self.config.logging {
            info!(
                action = %transition.action_type,
                previous = %transition.previous,
                next = %transition.next,
                "state transition"
            );
            let observers: Vec<TransitionObserver> = self
                .observers
                .read()
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect();
            for observer in observers {
                observer(transition);
            }
        }

        let subscribers: Vec<Subscriber> = self
            .subscribers
            .read()
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber(&transition.next);
        }
    }

    fn next_id(&self) -> usize {
        self.next_listener_id.fetch_add(1, Ordering::SeqCst)
    }
}

/// Clears the publishing flag, and anything left undelivered if a listener
/// panicked.
struct PublishingGuard<'a>(&'a StoreInner);

impl Drop for PublishingGuard<'_> {
    fn drop(&mut self) {
        self.0.pending.lock().clear();
        self.0.publishing.store(false, Ordering::SeqCst);
    }
}

/// The live holder of global state.
///
/// A store owns the current [`GlobalState`] snapshot and commits the result
/// of every dispatched action. Clones share the same state, listeners and
/// dispatcher; pass a clone to each consumer instead of reaching for a
/// global.
///
/// # Examples
///
/// ```
/// use slicebox::{Action, Entity, Registry, Store, StoreConfig, Value};
///
/// let registry = Registry::builder()
///     .entity("counter", Entity::new(0).effect("INCREMENT", |s, p| {
///         Value::from(s.as_f64().unwrap() + p.as_f64().unwrap())
///     }))
///     .build()
///     .unwrap();
///
/// let store = Store::new(registry, StoreConfig::default());
/// store.dispatch(&Action::new("INCREMENT", 1)).unwrap();
/// assert_eq!(store.state().get("counter"), Some(&Value::from(1)));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Create a store holding the registry's initial state.
    pub fn new(registry: impl Into<Arc<Registry>>, config: StoreConfig) -> Self {
        let registry = registry.into();
        let state = registry.initial_global_state();
        Self {
            inner: Arc::new(StoreInner {
                registry,
                config,
                state: RwLock::new(state),
                commit: ReentrantMutex::new(()),
                pending: Mutex::new(VecDeque::new()),
                publishing: AtomicBool::new(false),
                subscribers: RwLock::new(Vec::new()),
                observers: RwLock::new(Vec::new()),
                next_listener_id: AtomicUsize::new(0),
            }),
        }
    }

    /// The current snapshot. Later commits never affect it.
    pub fn state(&self) -> GlobalState {
        self.inner.state.read().clone()
    }

    /// Run `f` against the current snapshot. The store is not locked while
    /// `f` runs, so it may dispatch.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&GlobalState) -> R,
    {
        let state = self.state();
        f(&state)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.inner.registry
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// The dispatch entry point. Every call on the same store (or a clone of
    /// it) returns a handle that is [`ptr_eq`](Dispatcher::ptr_eq) to the
    /// others.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Validate, resolve and commit one action.
    ///
    /// On error nothing is committed and the previous state stays current.
    /// Listeners see commits in order: when a listener dispatches, its commit
    /// is delivered after every listener has seen the commit that triggered
    /// it.
    pub fn dispatch(&self, action: &Value) -> Result<Dispatched> {
        self.inner.dispatch(action)
    }

    /// Subscribe to committed state changes.
    ///
    /// The callback receives the new snapshot after every dispatch that
    /// changes state. Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&GlobalState) + Send + Sync + 'static,
    {
        let id = self.inner.next_id();
        self.inner.subscribers.write().push((id, Arc::new(callback)));
        Subscription::new(id, Channel::State, &self.inner)
    }

    /// Observe every logged transition (previous state, next state, action
    /// type). Only called while [`StoreConfig::logging`] is enabled.
    pub fn observe_transitions<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Transition) + Send + Sync + 'static,
    {
        let id = self.inner.next_id();
        self.inner.observers.write().push((id, Arc::new(callback)));
        Subscription::new(id, Channel::Transitions, &self.inner)
    }

    pub fn ptr_eq(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.read())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Create a store from a registry. Shorthand for [`Store::new`].
pub fn create_store(registry: impl Into<Arc<Registry>>, config: StoreConfig) -> Store {
    Store::new(registry, config)
}

/// A handle that dispatches actions into one store.
///
/// Handed to consumers in place of the store itself.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<StoreInner>,
}

impl Dispatcher {
    pub fn dispatch(&self, action: &Value) -> Result<Dispatched> {
        self.inner.dispatch(action)
    }

    /// Whether both handles dispatch into the same store.
    pub fn ptr_eq(&self, other: &Dispatcher) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// A handle that does not keep the store alive. Listeners registered on
    /// the store hold this instead of a [`Dispatcher`].
    pub(crate) fn downgrade(&self) -> WeakDispatcher {
        WeakDispatcher(Arc::downgrade(&self.inner))
    }
}

#[derive(Clone)]
pub(crate) struct WeakDispatcher(Weak<StoreInner>);

impl WeakDispatcher {
    pub(crate) fn upgrade(&self) -> Option<Dispatcher> {
        self.0.upgrade().map(|inner| Dispatcher { inner })
    }
}

impl PartialEq for Dispatcher {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Dispatcher {}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dispatcher({:p})", Arc::as_ptr(&self.inner))
    }
}

#[derive(Clone, Copy, Debug)]
enum Channel {
    State,
    Transitions,
}

/// RAII guard for store listeners. Dropping it removes the listener.
pub struct Subscription {
    id: usize,
    channel: Channel,
    store: Weak<StoreInner>,
}

impl Subscription {
    fn new(id: usize, channel: Channel, store: &Arc<StoreInner>) -> Self {
        Self {
            id,
            channel,
            store: Arc::downgrade(store),
        }
    }

    /// A subscription attached to nothing.
    pub(crate) fn detached() -> Self {
        Self {
            id: usize::MAX,
            channel: Channel::State,
            store: Weak::new(),
        }
    }

    /// Whether the listener is still registered with a live store.
    pub fn is_active(&self) -> bool {
        let Some(store) = self.store.upgrade() else {
            return false;
        };
        match self.channel {
            Channel::State => store.subscribers.read().iter().any(|(id, _)| *id == self.id),
            Channel::Transitions => store.observers.read().iter().any(|(id, _)| *id == self.id),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            match self.channel {
                Channel::State => store.subscribers.write().retain(|(id, _)| *id != self.id),
                Channel::Transitions => store.observers.write().retain(|(id, _)| *id != self.id),
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .field("active", &self.is_active())
            .finish()
    }
}
