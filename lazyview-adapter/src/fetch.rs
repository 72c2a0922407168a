//! Cache-backed fetch coordination.
//!
//! A [`FetchCoordinator`] drives one consumer's `{status, data, error}` view of a remote
//! resource. It consults a [`SharedCache`] before retrieving and writes successful results back,
//! so coordinators that share a cache also share each other's results.
//!
//! There is no single-flight deduplication: two resolutions of the same uncached key, on the
//! same coordinator or on different ones, each call their own `retrieve`.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::future::Future;

use lazyview::{BoundedCache, FetchState, FetchStatus, LazyViewOptions, RequestDescriptor};

/// A cache handle shared by every coordinator of one consumer scope.
///
/// The scope that creates it owns it: it decides the capacity, when to `clear` it, and drops it
/// when the scope ends. Coordinators only borrow it for the duration of a lookup or a write.
pub type SharedCache<T> = Rc<RefCell<BoundedCache<T>>>;

/// Creates an empty shared cache holding at most `capacity` entries.
pub fn shared_cache<T>(capacity: usize) -> SharedCache<T> {
    Rc::new(RefCell::new(BoundedCache::new(capacity)))
}

/// Creates an empty shared cache sized by [`LazyViewOptions::cache_capacity`].
pub fn shared_cache_from_options<T>(options: &LazyViewOptions) -> SharedCache<T> {
    Rc::new(RefCell::new(BoundedCache::from_options(options)))
}

type Listener<T, E> = Rc<dyn Fn(&FetchState<T, E>)>;

struct ListenerSlot<T, E> {
    id: u64,
    // Shared with the `Subscription`; cleared on cancel even when the slot cannot be removed yet.
    active: Rc<Cell<bool>>,
    call: Listener<T, E>,
}

// Each field borrows on its own and no borrow is held while caller code runs, so listeners and
// callers may re-enter the coordinator freely.
struct Inner<T, E> {
    state: RefCell<FetchState<T, E>>,
    key: RefCell<Option<String>>,
    // Bumped by every resolution and by dispose; a completion only applies while it still
    // matches.
    generation: Cell<u64>,
    disposed: Cell<bool>,
    listeners: RefCell<Vec<ListenerSlot<T, E>>>,
    next_listener_id: Cell<u64>,
}

impl<T, E> Inner<T, E> {
    fn is_current(&self, generation: u64) -> bool {
        !self.disposed.get() && self.generation.get() == generation
    }

    fn bump_generation(&self) -> u64 {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        generation
    }

    fn teardown(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.bump_generation();
        let released = match self.listeners.try_borrow_mut() {
            Ok(mut slots) => core::mem::take(&mut *slots),
            Err(_) => Vec::new(),
        };
        for slot in &released {
            slot.active.set(false);
        }
        // Closures may own subscriptions; they drop here, after the borrow is gone.
        drop(released);
    }
}

/// Resolves keyed resources through a shared cache and exposes the resulting [`FetchState`].
///
/// Dropping the coordinator (or calling [`dispose`](Self::dispose)) tears it down: results of
/// retrievals still in flight are discarded on arrival, without touching the state or the
/// cache, and listeners are released.
pub struct FetchCoordinator<T, E> {
    cache: SharedCache<T>,
    inner: Rc<Inner<T, E>>,
}

impl<T: Clone + 'static, E: Clone + 'static> FetchCoordinator<T, E> {
    /// Creates an idle coordinator backed by `cache`.
    pub fn new(cache: SharedCache<T>) -> Self {
        Self {
            cache,
            inner: Rc::new(Inner {
                state: RefCell::new(FetchState::Idle),
                key: RefCell::new(None),
                generation: Cell::new(0),
                disposed: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
            }),
        }
    }

    pub fn cache(&self) -> &SharedCache<T> {
        &self.cache
    }

    pub fn state(&self) -> FetchState<T, E> {
        self.inner.state.borrow().clone()
    }

    /// Runs `f` against a snapshot of the current state. `f` may call back into the
    /// coordinator.
    pub fn with_state<R>(&self, f: impl FnOnce(&FetchState<T, E>) -> R) -> R {
        let snapshot = self.state();
        f(&snapshot)
    }

    pub fn status(&self) -> FetchStatus {
        self.inner.state.borrow().status()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data().cloned()
    }

    pub fn error(&self) -> Option<E> {
        self.inner.state.borrow().error().cloned()
    }

    /// The key of the most recent resolution, if any.
    pub fn current_key(&self) -> Option<String> {
        self.inner.key.borrow().clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Resolves `key`: a cache hit becomes `Success` without calling `retrieve`; a miss moves to
    /// `Loading`, awaits `retrieve()`, then caches and publishes `Success`, or publishes
    /// `Failed` without caching.
    ///
    /// The returned future does not borrow the coordinator, so it can be handed to a local
    /// executor while the consumer keeps the coordinator. It resolves to the state this
    /// resolution produced, or to the current state if it was superseded by a newer resolution
    /// or the coordinator was disposed in the meantime.
    pub fn resolve<K, F, Fut>(
        &self,
        key: K,
        retrieve: F,
    ) -> impl Future<Output = FetchState<T, E>> + use<K, T, E, F, Fut>
    where
        K: Into<String>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = key.into();
        let cache = Rc::clone(&self.cache);
        let inner = Rc::clone(&self.inner);

        async move {
            if inner.disposed.get() {
                return current_state(&inner);
            }
            let generation = inner.bump_generation();
            *inner.key.borrow_mut() = Some(key.clone());

            let cached = cache.borrow().get(&key).cloned();
            if let Some(value) = cached {
                ltrace!(key = key.as_str(), "FetchCoordinator: cache hit");
                return transition(&inner, generation, FetchState::Success(value));
            }

            ltrace!(key = key.as_str(), "FetchCoordinator: cache miss, retrieving");
            transition(&inner, generation, FetchState::Loading);
            let result = retrieve().await;

            let current = inner.is_current(generation);
            match result {
                Ok(value) => {
                    if inner.disposed.get() {
                        ldebug!(key = key.as_str(), "FetchCoordinator: result discarded");
                        return current_state(&inner);
                    }
                    // A superseded result is still valid data for the shared cache.
                    cache.borrow_mut().set(key, value.clone());
                    if !current {
                        return current_state(&inner);
                    }
                    transition(&inner, generation, FetchState::Success(value))
                }
                Err(err) => {
                    if !current {
                        return current_state(&inner);
                    }
                    lwarn!(key = key.as_str(), "FetchCoordinator: retrieval failed");
                    transition(&inner, generation, FetchState::Failed(err))
                }
            }
        }
    }

    /// Resolves a request through its canonical [`RequestDescriptor::cache_key`].
    pub fn resolve_request<F, Fut>(
        &self,
        request: &RequestDescriptor,
        retrieve: F,
    ) -> impl Future<Output = FetchState<T, E>> + use<T, E, F, Fut>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.resolve(request.cache_key(), retrieve)
    }

    /// Registers `listener` to be called after every state change.
    ///
    /// The listener stays registered while the returned [`Subscription`] is alive.
    pub fn subscribe(
        &self,
        listener: impl Fn(&FetchState<T, E>) + 'static,
    ) -> Subscription<T, E> {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id.wrapping_add(1));
        let active = Rc::new(Cell::new(!self.inner.disposed.get()));
        if active.get() {
            self.inner.listeners.borrow_mut().push(ListenerSlot {
                id,
                active: Rc::clone(&active),
                call: Rc::new(listener),
            });
        }
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
            active,
        }
    }

    /// Tears the coordinator down. Idempotent.
    pub fn dispose(&self) {
        ldebug!(key = ?self.inner.key.borrow(), "FetchCoordinator::dispose");
        self.inner.teardown();
    }
}

impl<T, E> Drop for FetchCoordinator<T, E> {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for FetchCoordinator<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("state", &*self.inner.state.borrow())
            .field("key", &*self.inner.key.borrow())
            .field("disposed", &self.inner.disposed.get())
            .finish_non_exhaustive()
    }
}

fn current_state<T: Clone, E: Clone>(inner: &Inner<T, E>) -> FetchState<T, E> {
    inner.state.borrow().clone()
}

fn transition<T: Clone, E: Clone>(
    inner: &Inner<T, E>,
    generation: u64,
    next: FetchState<T, E>,
) -> FetchState<T, E> {
    if !inner.is_current(generation) {
        return current_state(inner);
    }
    *inner.state.borrow_mut() = next.clone();
    let listeners: Vec<(Rc<Cell<bool>>, Listener<T, E>)> = {
        let mut slots = inner.listeners.borrow_mut();
        slots.retain(|slot| slot.active.get());
        slots
            .iter()
            .map(|slot| (Rc::clone(&slot.active), Rc::clone(&slot.call)))
            .collect()
    };
    // An earlier listener may cancel a later one or tear the coordinator down.
    for (active, call) in listeners {
        if active.get() && inner.is_current(generation) {
            call(&next);
        }
    }
    next
}

/// Keeps a [`FetchCoordinator::subscribe`] listener registered; cancels it on drop.
pub struct Subscription<T, E> {
    inner: Weak<Inner<T, E>>,
    id: u64,
    active: Rc<Cell<bool>>,
}

impl<T, E> Subscription<T, E> {
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Unregisters the listener. It is never called again, even if the coordinator is busy and
    /// the slot is only pruned at the next state change. Safe to call any number of times, also
    /// after the coordinator is gone.
    pub fn cancel(&mut self) {
        if !self.active.replace(false) {
            return;
        }
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let removed = match inner.listeners.try_borrow_mut() {
            Ok(mut slots) => {
                let id = self.id;
                slots
                    .iter()
                    .position(|slot| slot.id == id)
                    .map(|index| slots.remove(index))
            }
            Err(_) => None,
        };
        drop(removed);
    }
}

impl<T, E> Drop for Subscription<T, E> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<T, E> fmt::Debug for Subscription<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish_non_exhaustive()
    }
}
