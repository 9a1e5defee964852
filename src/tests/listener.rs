use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::{Callback, EventEmitter, EventHandler, EventKey, RawListener, REMOVED_LISTENER};

fn counter() -> (Arc<AtomicU64>, Callback<String>) {
    let hits = Arc::new(AtomicU64::new(0));
    let inner = Arc::clone(&hits);
    let callback: Callback<String> = Arc::new(move |_| {
        inner.fetch_add(1, Ordering::SeqCst);
    });
    (hits, callback)
}

/// Single-fire position: the unwrapped listener fires without removal, the
/// wrapper fires and removes; persistent positions come back bare
#[test]
fn raw_listener_wrapper_round() {
    let emitter = EventEmitter::<String>::default();
    let (hits, callback) = counter();

    emitter.register_once("increment", Arc::clone(&callback));
    let raw = emitter.raw_listeners("increment");
    assert_eq!(raw.len(), 1);
    assert!(raw[0].is_once());

    raw[0].listener()(&[]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(emitter.count("increment"), 1);

    raw[0].call(&[]);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(emitter.count("increment"), 0);

    emitter.register("increment", Arc::clone(&callback));
    let raw = emitter.raw_listeners("increment");
    assert!(!raw[0].is_once());

    raw[0].call(&[]);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(emitter.count("increment"), 1);

    assert!(emitter.dispatch("increment", &[]));
    assert_eq!(hits.load(Ordering::SeqCst), 4);
    assert_eq!(emitter.count("increment"), 1);
}

/// Unknown keys yield an empty view, not an error
#[test]
fn raw_listeners_unknown_key_is_empty() {
    let emitter = EventEmitter::<String>::default();
    assert!(emitter.raw_listeners("never-seen").is_empty());
}

/// Wrapping follows the current flag per position and hands back the
/// original handles
#[test]
fn raw_listeners_mirror_positions() {
    let emitter = EventEmitter::<String>::default();
    let (_, f) = counter();
    let (_, g) = counter();
    let (_, h) = counter();

    emitter.register("mix", Arc::clone(&f));
    emitter.register_once("mix", Arc::clone(&g));
    emitter.prepend_once("mix", Arc::clone(&h));

    let raw = emitter.raw_listeners("mix");
    assert_eq!(raw.len(), 3);
    assert!(raw[0].is_once());
    assert!(!raw[1].is_once());
    assert!(raw[2].is_once());
    assert!(Arc::ptr_eq(&raw[0].listener(), &h));
    assert!(Arc::ptr_eq(&raw[1].listener(), &f));
    assert!(Arc::ptr_eq(&raw[2].listener(), &g));

    match &raw[0] {
        RawListener::Once(wrapper) => assert_eq!(wrapper.key(), &EventKey::from("mix")),
        RawListener::Persistent(_) => panic!("front position lost its flag"),
    }
}

/// The wrapper removes by identity, front to back, like unregister
#[test]
fn wrapper_removes_first_identity_match() {
    let emitter = EventEmitter::<String>::default();
    let (hits, callback) = counter();

    emitter.register("dup", Arc::clone(&callback));
    emitter.register_once("dup", Arc::clone(&callback));

    let raw = emitter.raw_listeners("dup");
    assert!(!raw[0].is_once());
    assert!(raw[1].is_once());

    // removal hits the persistent front occurrence; the flagged slot stays
    raw[1].call(&[]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(emitter.count("dup"), 1);
    assert!(emitter.raw_listeners("dup")[0].is_once());

    assert!(emitter.dispatch("dup", &[]));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(emitter.count("dup"), 0);
}

/// Wrapper removal goes through unregister, so the removed-listener channel
/// fires
#[test]
fn wrapper_removal_fires_removed_listener() {
    let emitter = EventEmitter::<String>::default();
    let (_, target) = counter();
    let (r_hits, audit) = counter();

    emitter.register_once("load", target);
    emitter.register_once(REMOVED_LISTENER, audit);

    emitter.raw_listeners("load")[0].call(&[]);
    assert_eq!(r_hits.load(Ordering::SeqCst), 1);
    assert_eq!(emitter.count("load"), 0);
}
