use std::fmt;
use std::sync::Arc;

use crate::constants::{Callback, EventPayload};
use crate::event_emitter::EventEmitter;
use crate::event_handler::EventHandler;
use crate::key::EventKey;

/// One registered slot in an event's listener sequence: the callback handle
/// plus its single-fire flag. The flag travels with the slot, so prepends and
/// removals never need separate index bookkeeping.
pub(crate) struct Listener<T> {
    callback: Callback<T>,
    once: bool,
}

impl<T> Listener<T> {
    pub(crate) fn new(callback: Callback<T>, once: bool) -> Self {
        Self { callback, once }
    }

    /// Synchronously invoke the callback with the dispatch arguments.
    #[inline]
    pub(crate) fn call(&self, args: &[EventPayload<T>]) {
        (self.callback)(args);
    }

    pub(crate) fn callback(&self) -> &Callback<T> {
        &self.callback
    }

    #[inline]
    pub(crate) fn is_once(&self) -> bool {
        self.once
    }

    pub(crate) fn mark_once(&mut self) {
        self.once = true;
    }

    /// Whether this slot holds `callback`, by pointer identity.
    #[inline]
    pub(crate) fn is(&self, callback: &Callback<T>) -> bool {
        Arc::ptr_eq(&self.callback, callback)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
            once: self.once,
        }
    }
}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("once", &self.once).finish()
    }
}

/// Self-removing view of a single-fire listener, handed out by
/// `raw_listeners`.
///
/// Invoking the wrapper through [`OnceWrapper::call`] first unregisters the
/// underlying callback from its channel (firing the removed-listener channel
/// on the way, exactly like a plain `unregister`), then runs it. The original
/// callback is reachable through [`OnceWrapper::listener`] for invocation
/// without removal.
pub struct OnceWrapper<T> {
    emitter: EventEmitter<T>,
    key: EventKey,
    callback: Callback<T>,
}

impl<T> OnceWrapper<T> {
    pub(crate) fn new(emitter: EventEmitter<T>, key: EventKey, callback: Callback<T>) -> Self {
        Self { emitter, key, callback }
    }

    /// Unregisters the wrapped callback from its channel, then invokes it
    /// with `args`.
    ///
    /// Removal matches the first occurrence of the callback by identity, so
    /// with duplicate registrations the earliest position goes, not
    /// necessarily the once-flagged one this wrapper was built from.
    pub fn call(&self, args: &[EventPayload<T>]) {
        self.emitter.unregister(self.key.clone(), &self.callback);
        (self.callback)(args);
    }

    /// The original callback. Invoking it directly leaves the registry
    /// untouched.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use sync_events::{Callback, EventEmitter, EventHandler, RawListener};
    ///
    /// let emitter = EventEmitter::<String>::default();
    /// let callback: Callback<String> = Arc::new(|_| {});
    /// emitter.register_once("boot", callback);
    ///
    /// match &emitter.raw_listeners("boot")[0] {
    ///     RawListener::Once(wrapper) => {
    ///         wrapper.listener()(&[]);
    ///         assert_eq!(emitter.count("boot"), 1);
    ///     }
    ///     RawListener::Persistent(_) => unreachable!(),
    /// }
    /// ```
    pub fn listener(&self) -> Callback<T> {
        Arc::clone(&self.callback)
    }

    /// The channel this wrapper removes from.
    pub fn key(&self) -> &EventKey {
        &self.key
    }
}

impl<T> Clone for OnceWrapper<T> {
    fn clone(&self) -> Self {
        Self {
            emitter: self.emitter.clone(),
            key: self.key.clone(),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T> fmt::Debug for OnceWrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnceWrapper").field("key", &self.key).finish()
    }
}

/// A listener as returned by `raw_listeners`: persistent positions come back
/// as the bare callback handle, single-fire positions as an [`OnceWrapper`].
pub enum RawListener<T> {
    /// Persistent listener, the registered handle itself.
    Persistent(Callback<T>),
    /// Single-fire listener behind its self-removing wrapper.
    Once(OnceWrapper<T>),
}

impl<T> RawListener<T> {
    /// Invokes the listener with `args`; a [`RawListener::Once`] position
    /// unregisters itself first.
    pub fn call(&self, args: &[EventPayload<T>]) {
        match self {
            RawListener::Persistent(callback) => callback(args),
            RawListener::Once(wrapper) => wrapper.call(args),
        }
    }

    /// The underlying callback, invocable without any removal.
    pub fn listener(&self) -> Callback<T> {
        match self {
            RawListener::Persistent(callback) => Arc::clone(callback),
            RawListener::Once(wrapper) => wrapper.listener(),
        }
    }

    pub fn is_once(&self) -> bool {
        matches!(self, RawListener::Once(_))
    }
}

impl<T> Clone for RawListener<T> {
    fn clone(&self) -> Self {
        match self {
            RawListener::Persistent(callback) => RawListener::Persistent(Arc::clone(callback)),
            RawListener::Once(wrapper) => RawListener::Once(wrapper.clone()),
        }
    }
}

impl<T> fmt::Debug for RawListener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawListener::Persistent(_) => f.write_str("RawListener::Persistent"),
            RawListener::Once(wrapper) => write!(f, "RawListener::Once({:?})", wrapper.key),
        }
    }
}
