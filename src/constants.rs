use std::sync::Arc;

/// Reserved channel dispatched by `register`/`register_once` right before a
/// listener is appended. Carries no payload. Ordinary in every other way:
/// callers may register on it themselves.
pub const NEW_LISTENER: &str = "new-listener";

/// Reserved channel dispatched after every non-empty `dispatch` and after
/// every `unregister`, whether or not a listener was actually removed.
/// Carries no payload.
pub const REMOVED_LISTENER: &str = "removed-listener";

/// Listener capacity per event key on a freshly constructed emitter.
pub const DEFAULT_CAPACITY: usize = 10;

/// Type alias for an event payload pointer.
///
/// Payloads are shared with every listener of a dispatch, so they travel
/// behind an `Arc`.
///
/// # Example
/// ```
/// use sync_events::EventPayload;
///
/// let payload: EventPayload<String> = EventPayload::new(String::from("emitted value"));
/// ```
pub type EventPayload<T> = Arc<T>;

/// Type alias for a callback pointer.
///
/// A callback receives the dispatch arguments as an ordered slice of shared
/// payloads; its return value is discarded. The `Arc` is also the callback's
/// identity: registering one clone several times occupies several positions,
/// and `unregister` matches by pointer, never by behavior.
///
/// # Example
/// ```
/// use sync_events::{Callback, EventPayload};
///
/// let callback: Callback<String> = std::sync::Arc::new(|args: &[EventPayload<String>]| {
///     for value in args {
///         println!("received: {value}");
///     }
/// });
/// ```
pub type Callback<T> = Arc<dyn Fn(&[EventPayload<T>])>;
