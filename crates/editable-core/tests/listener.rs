use editable_core::{BufferError, EditEvent, EditKind, EditListener, TextBuffer};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every notification it receives.
#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<EditEvent>>>,
}

impl Recorder {
    fn take(&self) -> Vec<EditEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl EditListener for Recorder {
    fn on_edit(&mut self, event: &EditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn recorded(text: &str) -> (TextBuffer, Recorder) {
    let recorder = Recorder::default();
    let mut buffer = TextBuffer::from_text(text);
    buffer
        .set_listener(Some(Box::new(recorder.clone())))
        .unwrap();
    (buffer, recorder)
}

#[test]
fn test_insert_and_delete_notifications() {
    let (mut buffer, recorder) = recorded("hello");

    buffer.insert(5, "!", true, Duration::ZERO).unwrap();
    buffer.delete(0, 2, true, Duration::from_secs(1)).unwrap();

    assert_eq!(
        recorder.take(),
        vec![
            EditEvent::inserted(5, "!"),
            EditEvent::deleted(0, "he"),
        ]
    );
}

#[test]
fn test_rejected_edits_do_not_notify() {
    let (mut buffer, recorder) = recorded("abc");

    assert!(buffer.insert(9, "x", true, Duration::ZERO).is_err());
    assert!(buffer.delete(2, 1, true, Duration::ZERO).is_err());
    buffer.insert(1, "", true, Duration::ZERO).unwrap();

    assert!(recorder.take().is_empty());
}

#[test]
fn test_undo_and_redo_notify_like_edits() {
    let (mut buffer, recorder) = recorded("abc");
    buffer.insert(3, "def", true, Duration::ZERO).unwrap();
    recorder.take();

    buffer.undo();
    assert_eq!(recorder.take(), vec![EditEvent::deleted(3, "def")]);

    buffer.redo();
    assert_eq!(recorder.take(), vec![EditEvent::inserted(3, "def")]);
}

#[test]
fn test_undo_of_backspace_run_reports_restored_text() {
    let (mut buffer, recorder) = recorded("abcd");
    buffer.backspace(Duration::ZERO).unwrap();
    buffer.backspace(Duration::from_millis(10)).unwrap();
    recorder.take();

    buffer.undo();
    assert_eq!(recorder.take(), vec![EditEvent::inserted(2, "cd")]);
}

#[test]
fn test_set_text_reports_replace() {
    let (mut buffer, recorder) = recorded("old");
    buffer.set_text("brand new");

    let events = recorder.take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EditKind::Replace);
    assert_eq!((events[0].start, events[0].end), (0, 3));
    assert_eq!(events[0].text, "brand new");
}

#[test]
fn test_null_listener_is_rejected() {
    let (mut buffer, recorder) = recorded("x");

    assert_eq!(buffer.set_listener(None), Err(BufferError::NullListener));
    buffer.append("y", false, Duration::ZERO).unwrap();
    assert_eq!(recorder.take().len(), 1);
}

#[test]
fn test_take_listener_stops_notifications() {
    let (mut buffer, recorder) = recorded("x");

    assert!(buffer.take_listener().is_some());
    buffer.append("y", false, Duration::ZERO).unwrap();
    assert!(recorder.take().is_empty());
}
