use rdev::{listen, EventType, Key};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

/// Raises `quit` when `Q` is pressed anywhere, not only while the progress
/// window has focus. The app forwards it to the running worker on its next poll.
pub fn spawn_quit_listener(quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let result = listen(move |event| {
            if let EventType::KeyPress(Key::KeyQ) = event.event_type {
                if !quit.swap(true, Ordering::Relaxed) {
                    tracing::info!("global 'q' pressed, cancelling");
                }
            }
        });
        if let Err(e) = result {
            tracing::error!(error = ?e, "global key listener stopped");
        }
    });
}
