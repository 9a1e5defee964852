//! Example: auditing registrations through the reserved channels
//!
//! Run with `RUST_LOG=error` to see the capacity refusal report.
use std::sync::Arc;

use sync_events::{Callback, EventEmitter, EventHandler, Token, NEW_LISTENER, REMOVED_LISTENER};

fn main() {
    env_logger::init();

    let emitter = EventEmitter::<String>::new(2);

    let audit = emitter.clone();
    emitter.register(
        NEW_LISTENER,
        Arc::new(move |_| {
            println!(
                "about to add a listener ({} on 'sensor' so far)",
                audit.count("sensor")
            );
        }),
    );
    // single-fire on purpose: a persistent listener here would re-trigger
    // itself through the removal pass of its own dispatch
    emitter.register_once(
        REMOVED_LISTENER,
        Arc::new(|_| {
            println!("a removal pass ran");
        }),
    );

    let reading: Callback<String> = Arc::new(|args| {
        for value in args {
            println!("sensor reading: {value}");
        }
    });
    emitter.register("sensor", Arc::clone(&reading));
    emitter.register("sensor", Arc::clone(&reading));
    // a third registration is over capacity and reported through the log
    emitter.register("sensor", Arc::clone(&reading));

    emitter.dispatch("sensor", &[Arc::new("21.5C".to_string())]);

    // tokens are channels of their own even with matching text
    let private = Token::new("sensor");
    emitter.register(&private, Arc::new(|_| println!("token channel fired")));
    emitter.dispatch(&private, &[]);
}
