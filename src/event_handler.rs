use crate::constants::{Callback, EventPayload};
use crate::key::EventKey;
use crate::listener::RawListener;

/// The operation surface of an event emitter: registering, dispatching,
/// removing, and querying listeners keyed by [`EventKey`].
///
/// Registration and removal methods return `&Self` so calls chain; their
/// failure modes (capacity refusals) are reported through the `log` facade
/// and never interrupt the chain.
pub trait EventHandler<T> {
    /// Append a persistent listener to `key`, capacity permitting. The
    /// reserved new-listener channel fires before the listener is appended.
    fn register(&self, key: impl Into<EventKey>, callback: Callback<T>) -> &Self;

    /// Append a single-fire listener to `key`, capacity permitting: the next
    /// dispatch of `key` runs it, then drops it.
    fn register_once(&self, key: impl Into<EventKey>, callback: Callback<T>) -> &Self;

    /// Insert a persistent listener at the front of `key`'s sequence. Not
    /// subject to the capacity limit.
    fn prepend(&self, key: impl Into<EventKey>, callback: Callback<T>) -> &Self;

    /// Insert a single-fire listener at the front of `key`'s sequence. Not
    /// subject to the capacity limit.
    fn prepend_once(&self, key: impl Into<EventKey>, callback: Callback<T>) -> &Self;

    /// Synchronously invoke every listener of `key` in order, passing `args`
    /// to each, then drop the single-fire ones. Returns `true` iff the
    /// sequence was non-empty.
    fn dispatch(&self, key: impl Into<EventKey>, args: &[EventPayload<T>]) -> bool;

    /// Remove the first occurrence of `callback` (by identity) from `key`'s
    /// sequence, if present. The reserved removed-listener channel fires
    /// afterward either way.
    fn unregister(&self, key: impl Into<EventKey>, callback: &Callback<T>) -> &Self;

    /// Unregister every listener currently held for `key`, one at a time.
    fn unregister_all(&self, key: impl Into<EventKey>) -> &Self;

    /// [`unregister_all`](EventHandler::unregister_all) for every key ever
    /// registered. The known-key record itself survives.
    fn unregister_all_keys(&self) -> &Self;

    /// Number of listeners currently held for `key`; 0 for a key never seen.
    fn count(&self, key: impl Into<EventKey>) -> usize;

    /// Whether `key` currently has any listeners.
    fn has_listeners(&self, key: impl Into<EventKey>) -> bool {
        self.count(key) > 0
    }

    /// A fresh copy of `key`'s listener handles, in invocation order.
    fn listeners(&self, key: impl Into<EventKey>) -> Vec<Callback<T>>;

    /// Like [`listeners`](EventHandler::listeners), but single-fire positions
    /// come back behind their self-removing [`RawListener::Once`] wrapper.
    fn raw_listeners(&self, key: impl Into<EventKey>) -> Vec<RawListener<T>>;

    /// Every key that has ever had a listener registered, in
    /// first-registration order.
    fn event_keys(&self) -> Vec<EventKey>;

    /// The per-key listener capacity.
    fn capacity(&self) -> usize;

    /// Replace the per-key listener capacity.
    fn set_capacity(&self, capacity: usize) -> &Self;
}
