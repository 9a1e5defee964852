use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use log::{error, warn};

use crate::constants::{Callback, EventPayload, DEFAULT_CAPACITY, NEW_LISTENER, REMOVED_LISTENER};
use crate::event_handler::EventHandler;
use crate::key::EventKey;
use crate::listener::{Listener, OnceWrapper, RawListener};

/// Everything one emitter owns: the per-key listener sequences, the record of
/// keys that ever had a registration, and the shared capacity limit.
struct EmitterState<T> {
    capacity: Cell<usize>,
    registry: RefCell<HashMap<EventKey, Vec<Listener<T>>>>,
    known_keys: RefCell<Vec<EventKey>>,
}

/// A synchronous, in-process event emitter.
///
/// Listeners register against an [`EventKey`] (a text label or an opaque
/// [`Token`](crate::Token)) and run in registration order when the key is
/// dispatched. Dispatch is plain nested function calls: listeners may
/// re-enter the emitter freely, including dispatching the key currently
/// being dispatched.
///
/// All methods take `&self`; the state sits behind interior mutability, and
/// no internal borrow is held while a listener runs. The emitter is
/// single-threaded by design and is neither `Send` nor `Sync`.
///
/// `Clone` hands out another handle to the *same* emitter: clones share
/// listeners, known keys, and the capacity limit. Move a clone into a
/// callback to mutate the emitter from inside a dispatch.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use sync_events::{EventEmitter, EventHandler};
///
/// let emitter = EventEmitter::<String>::default();
/// emitter.register("chime", Arc::new(|args| {
///     assert_eq!(args[0].as_str(), "ding");
/// }));
/// assert!(emitter.dispatch("chime", &[Arc::new("ding".to_string())]));
/// ```
pub struct EventEmitter<T> {
    state: Rc<EmitterState<T>>,
}

impl<T> EventEmitter<T> {
    /// Creates a new `EventEmitter<T>` with the given per-key listener
    /// capacity.
    ///
    /// # Example
    /// ```
    /// use sync_events::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::<String>::new(20);
    /// assert_eq!(emitter.capacity(), 20);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Rc::new(EmitterState {
                capacity: Cell::new(capacity),
                registry: RefCell::new(HashMap::new()),
                known_keys: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Listener count for `key` on `emitter`.
    #[deprecated(note = "call `count` on the emitter instead")]
    pub fn count_of(emitter: &EventEmitter<T>, key: impl Into<EventKey>) -> usize {
        warn!("EventEmitter::count_of is deprecated, call count on the emitter instead");
        emitter.count(key)
    }
}

impl<T> Default for EventEmitter<T> {
    /// Creates a new `EventEmitter<T>` with the default capacity of 10.
    ///
    /// # Example
    /// ```
    /// use sync_events::{EventEmitter, EventHandler, DEFAULT_CAPACITY};
    ///
    /// let emitter: EventEmitter<String> = EventEmitter::default();
    /// assert_eq!(emitter.capacity(), DEFAULT_CAPACITY);
    /// ```
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<T> Clone for EventEmitter<T> {
    /// Another handle to the same emitter, not a copy of its state.
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T> EventHandler<T> for EventEmitter<T> {
    /// Appends `callback` to the listener sequence for `key`.
    ///
    /// If the sequence is already at [`capacity`](EventHandler::capacity),
    /// the registration is refused and reported through the log facade; the
    /// emitter keeps working. Otherwise the reserved
    /// [`NEW_LISTENER`](crate::NEW_LISTENER) channel fires (with no
    /// arguments) *before* the append, and `key` is recorded for
    /// [`event_keys`](EventHandler::event_keys).
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use sync_events::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::<String>::default();
    /// emitter
    ///     .register("connect", Arc::new(|_| {}))
    ///     .register("connect", Arc::new(|_| {}));
    /// assert_eq!(emitter.count("connect"), 2);
    /// ```
    fn register(&self, key: impl Into<EventKey>, callback: Callback<T>) -> &Self {
        let key = key.into();
        if self.count(key.clone()) < self.capacity() {
            self.dispatch(NEW_LISTENER, &[]);
            self.state
                .registry
                .borrow_mut()
                .entry(key.clone())
                .or_default()
                .push(Listener::new(callback, false));
            let mut known = self.state.known_keys.borrow_mut();
            if !known.contains(&key) {
                known.push(key);
            }
        } else {
            error!(
                "register: capacity limit {} reached for '{}', listener not added",
                self.capacity(),
                key
            );
        }
        self
    }

    /// Appends `callback` as a single-fire listener: the next dispatch of
    /// `key` invokes it once, then removes it.
    ///
    /// Registration goes through [`register`](EventHandler::register) and is
    /// subject to the same capacity refusal. A registration that lands
    /// exactly on the capacity limit is kept but stays persistent; the
    /// skipped single-fire marking is reported through the log facade.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use sync_events::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::<String>::default();
    /// emitter.register_once("boot", Arc::new(|_| {}));
    /// emitter.dispatch("boot", &[]);
    /// assert_eq!(emitter.count("boot"), 0);
    /// ```
    fn register_once(&self, key: impl Into<EventKey>, callback: Callback<T>) -> &Self {
        let key = key.into();
        self.register(key.clone(), callback);
        if self.count(key.clone()) < self.capacity() {
            let mut registry = self.state.registry.borrow_mut();
            if let Some(slot) = registry.get_mut(&key).and_then(|sequence| sequence.last_mut()) {
                slot.mark_once();
            }
        } else {
            error!(
                "register_once: capacity limit {} reached for '{}'",
                self.capacity(),
                key
            );
        }
        self
    }

    /// Inserts `callback` at the front of `key`'s sequence; every existing
    /// listener moves one position later.
    ///
    /// Prepending bypasses the capacity limit, fires no reserved channel,
    /// and does not record `key` for [`event_keys`](EventHandler::event_keys).
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use sync_events::{Callback, EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::<String>::default();
    /// let first: Callback<String> = Arc::new(|_| {});
    /// emitter.register("draw", Arc::new(|_| {}));
    /// emitter.prepend("draw", Arc::clone(&first));
    /// assert!(Arc::ptr_eq(&emitter.listeners("draw")[0], &first));
    /// ```
    fn prepend(&self, key: impl Into<EventKey>, callback: Callback<T>) -> &Self {
        self.state
            .registry
            .borrow_mut()
            .entry(key.into())
            .or_default()
            .insert(0, Listener::new(callback, false));
        self
    }

    /// Inserts `callback` at the front of `key`'s sequence as a single-fire
    /// listener. Like [`prepend`](EventHandler::prepend), not subject to the
    /// capacity limit.
    fn prepend_once(&self, key: impl Into<EventKey>, callback: Callback<T>) -> &Self {
        let key = key.into();
        self.prepend(key.clone(), callback);
        let mut registry = self.state.registry.borrow_mut();
        if let Some(slot) = registry.get_mut(&key).and_then(|sequence| sequence.first_mut()) {
            slot.mark_once();
        }
        self
    }

    /// Synchronously invokes every listener of `key` in order, passing
    /// `args` to each, and returns whether any listener ran.
    ///
    /// The fan-out runs over the handle list as it stood when the dispatch
    /// began; listeners added during the fan-out wait for the next dispatch.
    /// A listener panic is not caught: it aborts the remaining fan-out and
    /// propagates to the caller.
    ///
    /// After the fan-out, every slot *currently* flagged single-fire is
    /// removed — the purge reads the sequence as it stands after the
    /// listeners ran, not a pre-dispatch snapshot, so a single-fire listener
    /// registered reentrantly during the fan-out is dropped without ever
    /// firing. Finally the reserved
    /// [`REMOVED_LISTENER`](crate::REMOVED_LISTENER) channel fires (with no
    /// arguments) whether or not anything was purged.
    ///
    /// A *persistent* listener registered on the removed-listener channel
    /// makes every non-empty dispatch recurse without bound; single-fire
    /// listeners on that channel are purged before the cascade re-reads it
    /// and are safe.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use sync_events::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::<u64>::default();
    /// assert!(!emitter.dispatch("sum", &[]));
    ///
    /// emitter.register("sum", Arc::new(|args| {
    ///     let total: u64 = args.iter().map(|n| **n).sum();
    ///     assert_eq!(total, 12);
    /// }));
    /// assert!(emitter.dispatch("sum", &[Arc::new(4), Arc::new(8)]));
    /// ```
    fn dispatch(&self, key: impl Into<EventKey>, args: &[EventPayload<T>]) -> bool {
        let key = key.into();
        let sequence: Vec<Listener<T>> = self
            .state
            .registry
            .borrow_mut()
            .entry(key.clone())
            .or_default()
            .clone();
        if sequence.is_empty() {
            return false;
        }
        for listener in &sequence {
            listener.call(args);
        }
        if let Some(current) = self.state.registry.borrow_mut().get_mut(&key) {
            current.retain(|listener| !listener.is_once());
        }
        self.dispatch(REMOVED_LISTENER, &[]);
        true
    }

    /// Removes the first occurrence of `callback` from `key`'s sequence,
    /// scanning front to back and matching by identity. A callback
    /// registered several times needs as many `unregister` calls.
    ///
    /// Match or not, the reserved
    /// [`REMOVED_LISTENER`](crate::REMOVED_LISTENER) channel fires
    /// afterward.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use sync_events::{Callback, EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::<String>::default();
    /// let callback: Callback<String> = Arc::new(|_| {});
    /// emitter.register("tick", Arc::clone(&callback));
    /// emitter.register("tick", Arc::clone(&callback));
    ///
    /// emitter.unregister("tick", &callback);
    /// assert_eq!(emitter.count("tick"), 1);
    /// ```
    fn unregister(&self, key: impl Into<EventKey>, callback: &Callback<T>) -> &Self {
        let key = key.into();
        {
            let mut registry = self.state.registry.borrow_mut();
            let sequence = registry.entry(key).or_default();
            if let Some(position) = sequence.iter().position(|listener| listener.is(callback)) {
                sequence.remove(position);
            }
        }
        self.dispatch(REMOVED_LISTENER, &[]);
        self
    }

    /// Unregisters every listener currently held for `key`, one
    /// [`unregister`](EventHandler::unregister) at a time over a snapshot of
    /// the sequence, so the removed-listener channel fires once per
    /// listener.
    fn unregister_all(&self, key: impl Into<EventKey>) -> &Self {
        let key = key.into();
        for callback in self.listeners(key.clone()) {
            self.unregister(key.clone(), &callback);
        }
        self
    }

    /// [`unregister_all`](EventHandler::unregister_all) for every key in
    /// [`event_keys`](EventHandler::event_keys). The known-key record is
    /// left intact: the keys remain listed afterward, with zero listeners.
    fn unregister_all_keys(&self) -> &Self {
        for key in self.event_keys() {
            self.unregister_all(key);
        }
        self
    }

    /// Number of listeners currently held for `key`. Returns 0, not an
    /// error, for a key never seen.
    ///
    /// # Example
    /// ```
    /// use sync_events::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::<String>::default();
    /// assert_eq!(emitter.count("never-registered"), 0);
    /// ```
    fn count(&self, key: impl Into<EventKey>) -> usize {
        self.state
            .registry
            .borrow_mut()
            .entry(key.into())
            .or_default()
            .len()
    }

    /// A fresh copy of `key`'s listener handles in invocation order. Every
    /// call builds a new container; mutating it never touches the emitter.
    fn listeners(&self, key: impl Into<EventKey>) -> Vec<Callback<T>> {
        self.state
            .registry
            .borrow_mut()
            .entry(key.into())
            .or_default()
            .iter()
            .map(|listener| Arc::clone(listener.callback()))
            .collect()
    }

    /// Like [`listeners`](EventHandler::listeners), but positions currently
    /// flagged single-fire come back as [`RawListener::Once`] wrappers:
    /// calling the wrapper unregisters that callback and then invokes it,
    /// while the wrapper's `listener()` accessor invokes without removal.
    /// Persistent positions come back as the bare handle.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use sync_events::{EventEmitter, EventHandler, RawListener};
    ///
    /// let emitter = EventEmitter::<String>::default();
    /// emitter.register_once("load", Arc::new(|_| {}));
    ///
    /// let raw = emitter.raw_listeners("load");
    /// assert!(raw[0].is_once());
    /// raw[0].call(&[]);
    /// assert_eq!(emitter.count("load"), 0);
    /// ```
    fn raw_listeners(&self, key: impl Into<EventKey>) -> Vec<RawListener<T>> {
        let key = key.into();
        let mut registry = self.state.registry.borrow_mut();
        let sequence = registry.entry(key.clone()).or_default();
        sequence
            .iter()
            .map(|listener| {
                if listener.is_once() {
                    RawListener::Once(OnceWrapper::new(
                        self.clone(),
                        key.clone(),
                        Arc::clone(listener.callback()),
                    ))
                } else {
                    RawListener::Persistent(Arc::clone(listener.callback()))
                }
            })
            .collect()
    }

    /// Every key that has ever had a listener registered, in
    /// first-registration order, as a fresh container. Keys stay listed
    /// after their last listener is removed.
    fn event_keys(&self) -> Vec<EventKey> {
        self.state.known_keys.borrow().clone()
    }

    /// The per-key listener capacity.
    fn capacity(&self) -> usize {
        self.state.capacity.get()
    }

    /// Replaces the per-key listener capacity. Takes effect for subsequent
    /// registrations only; sequences already over the new limit keep their
    /// listeners.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use sync_events::{EventEmitter, EventHandler};
    ///
    /// let emitter = EventEmitter::<String>::default();
    /// emitter.set_capacity(0).register("blocked", Arc::new(|_| {}));
    /// assert_eq!(emitter.count("blocked"), 0);
    /// ```
    fn set_capacity(&self, capacity: usize) -> &Self {
        self.state.capacity.set(capacity);
        self
    }
}
