//! Example: GUI button click events
use std::sync::Arc;

use sync_events::{EventEmitter, EventHandler};

fn main() {
    env_logger::init();

    let emitter = EventEmitter::<String>::default();
    emitter
        .register(
            "button_click",
            Arc::new(|args| {
                if let Some(label) = args.first() {
                    println!("clicked: {label}");
                }
            }),
        )
        .register_once(
            "button_click",
            Arc::new(|_| {
                println!("first click only");
            }),
        );

    // Simulate two clicks
    emitter.dispatch("button_click", &[Arc::new("OK".to_string())]);
    emitter.dispatch("button_click", &[Arc::new("OK".to_string())]);
}
