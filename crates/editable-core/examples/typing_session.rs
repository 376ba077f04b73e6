//! Replays a short typing session with logging enabled.
//!
//! Run with `RUST_LOG=editable_core=trace` to see gap growth, undo grouping and cache
//! evictions.

use editable_core::{BufferConfig, EditEvent, TextBuffer};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Types `text` at the caret, one keystroke every 60ms after an initial `pause`.
fn type_text(buffer: &mut TextBuffer, clock: &mut Duration, text: &str, pause: u64) {
    *clock += Duration::from_millis(pause);
    for ch in text.chars() {
        *clock += Duration::from_millis(60);
        let caret = buffer.selection_start();
        let mut utf8 = [0; 4];
        if let Err(err) = buffer.insert(caret, ch.encode_utf8(&mut utf8), true, *clock) {
            tracing::error!(%err, "keystroke dropped");
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "editable_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BufferConfig::default().with_initial_capacity(4);
    let mut buffer = TextBuffer::with_config("", config);
    buffer.subscribe(|event: &EditEvent| {
        tracing::info!(
            kind = ?event.kind,
            start = event.start,
            end = event.end,
            text = %event.text.escape_debug(),
            "edit"
        );
    });

    let mut clock = Duration::ZERO;
    type_text(&mut buffer, &mut clock, "fn main() {", 0);
    clock += Duration::from_secs(1);
    if let Err(err) = buffer.enter_newline(clock) {
        tracing::error!(%err, "newline dropped");
    }
    type_text(&mut buffer, &mut clock, "    println!(\"hi\");", 1_000);
    type_text(&mut buffer, &mut clock, "\n}", 1_000);

    // A stray comment erased again with quick backspaces.
    type_text(&mut buffer, &mut clock, "//x", 1_000);
    for _ in 0..3 {
        clock += Duration::from_millis(80);
        let _ = buffer.backspace(clock);
    }

    println!("{buffer}");
    println!("{buffer:?}");

    while let Some(caret) = buffer.undo() {
        println!("undo -> caret {caret}: {:?}", buffer.to_string());
    }
}
