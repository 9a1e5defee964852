//! # Sync Events Crate
//!
//! A synchronous, in-process event emitter: callbacks register against named
//! channels and run in registration order when the channel is dispatched.
//!
//! - **EventKey / Token**: channels named by text labels (equal by value) or
//!   opaque tokens (equal by identity only).
//! - **EventEmitter**: owns the listener registry, the known-key record, and
//!   the per-key capacity limit.
//! - **EventHandler**: trait defining the registration/dispatch API.
//! - **RawListener / OnceWrapper**: introspection view of a channel's
//!   listeners, with self-removing wrappers around single-fire positions.
//!
//! Dispatch is purely synchronous fan-out over an in-memory list; listeners
//! may re-enter the emitter mid-dispatch, including adding and removing
//! listeners for the channel currently firing. Registration refusals (the
//! per-key capacity limit) are reported through the [`log`] facade rather
//! than returned, so registration chains never break.

mod constants;
mod event_emitter;
mod event_handler;
mod key;
mod listener;

pub use constants::{Callback, EventPayload, DEFAULT_CAPACITY, NEW_LISTENER, REMOVED_LISTENER};
pub use event_emitter::EventEmitter;
pub use event_handler::EventHandler;
pub use key::{EventKey, Token};
pub use listener::{OnceWrapper, RawListener};

#[cfg(test)]
mod tests;
