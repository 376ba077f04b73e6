use editable_core::{BufferConfig, TextBuffer};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_undo_redo_captured_insert() {
    let mut buffer = TextBuffer::from_text("hello");

    buffer.insert(5, " world", true, ms(0)).unwrap();
    assert_eq!(buffer.to_string(), "hello world");
    assert!(buffer.can_undo());
    assert!(!buffer.can_redo());

    assert_eq!(buffer.undo(), Some(5));
    assert_eq!(buffer.to_string(), "hello");
    assert!(!buffer.can_undo());
    assert!(buffer.can_redo());

    assert_eq!(buffer.redo(), Some(11));
    assert_eq!(buffer.to_string(), "hello world");
    assert!(buffer.can_undo());
    assert!(!buffer.can_redo());
}

#[test]
fn test_uncaptured_edits_are_not_undoable() {
    let mut buffer = TextBuffer::from_text("hello");
    buffer.insert(0, ">> ", false, ms(0)).unwrap();
    buffer.delete(0, 1, false, ms(0)).unwrap();

    assert_eq!(buffer.to_string(), "> hello");
    assert_eq!(buffer.undo(), None);
    assert_eq!(buffer.to_string(), "> hello");
}

#[test]
fn test_typing_within_merge_window_undoes_as_one_step() {
    let mut buffer = TextBuffer::new();
    for (i, ch) in ["a", "b", "c"].into_iter().enumerate() {
        buffer.insert(i, ch, true, ms(i as u64 * 100)).unwrap();
    }
    assert_eq!(buffer.to_string(), "abc");
    assert_eq!(buffer.undo_depth(), 1);

    assert_eq!(buffer.undo(), Some(0));
    assert_eq!(buffer.to_string(), "");
    assert_eq!(buffer.redo_depth(), 1);

    assert_eq!(buffer.redo(), Some(3));
    assert_eq!(buffer.to_string(), "abc");
}

#[test]
fn test_pause_longer_than_merge_window_splits_steps() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "a", true, ms(0)).unwrap();
    buffer.insert(1, "b", true, ms(800)).unwrap();
    assert_eq!(buffer.undo_depth(), 2);

    buffer.undo();
    assert_eq!(buffer.to_string(), "a");
    buffer.undo();
    assert_eq!(buffer.to_string(), "");
}

#[test]
fn test_custom_merge_window() {
    let config = BufferConfig::default().with_merge_window(ms(50));
    let mut buffer = TextBuffer::with_config("", config);
    buffer.insert(0, "a", true, ms(0)).unwrap();
    buffer.insert(1, "b", true, ms(100)).unwrap();

    buffer.undo();
    assert_eq!(buffer.to_string(), "a");
}

#[test]
fn test_non_contiguous_insert_starts_new_step() {
    let mut buffer = TextBuffer::from_text("0123456789");
    buffer.insert(2, "a", true, ms(0)).unwrap();
    buffer.insert(8, "b", true, ms(10)).unwrap();
    assert_eq!(buffer.to_string(), "01a23456b789");

    buffer.undo();
    assert_eq!(buffer.to_string(), "01a23456789");
    buffer.undo();
    assert_eq!(buffer.to_string(), "0123456789");
}

#[test]
fn test_backspace_run_undoes_as_one_step() {
    let mut buffer = TextBuffer::from_text("hello world");
    for i in 0..5 {
        buffer.backspace(ms(i * 50)).unwrap();
    }
    assert_eq!(buffer.to_string(), "hello ");
    assert_eq!(buffer.undo_depth(), 1);

    assert_eq!(buffer.undo(), Some(11));
    assert_eq!(buffer.to_string(), "hello world");
    assert_eq!(buffer.selection(), 11..11);

    assert_eq!(buffer.redo(), Some(6));
    assert_eq!(buffer.to_string(), "hello ");
}

#[test]
fn test_type_then_erase_then_type_again() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "cat", true, ms(0)).unwrap();
    buffer.backspace(ms(100)).unwrap();
    buffer.insert(2, "r", true, ms(200)).unwrap();
    assert_eq!(buffer.to_string(), "car");

    buffer.undo();
    assert_eq!(buffer.to_string(), "ca");
    buffer.undo();
    assert_eq!(buffer.to_string(), "cat");
    buffer.undo();
    assert_eq!(buffer.to_string(), "");

    while buffer.redo().is_some() {}
    assert_eq!(buffer.to_string(), "car");
}

#[test]
fn test_replace_undoes_in_one_step() {
    let mut buffer = TextBuffer::from_text("let x = 1;");
    buffer.replace(4, 5, "value", true, ms(0)).unwrap();
    assert_eq!(buffer.to_string(), "let value = 1;");

    buffer.undo();
    assert_eq!(buffer.to_string(), "let x = 1;");
    assert!(!buffer.can_undo());

    buffer.redo();
    assert_eq!(buffer.to_string(), "let value = 1;");
}

#[test]
fn test_batch_edit_groups_everything() {
    let mut buffer = TextBuffer::from_text("a\nb\nc");

    buffer.begin_batch_edit();
    assert!(buffer.is_batch_edit());
    buffer.insert(0, "// ", true, ms(0)).unwrap();
    buffer.insert(5, "// ", true, ms(5_000)).unwrap();
    buffer.insert(10, "// ", true, ms(10_000)).unwrap();
    buffer.end_batch_edit();
    assert!(!buffer.is_batch_edit());

    assert_eq!(buffer.to_string(), "// a\n// b\n// c");
    assert_eq!(buffer.undo_depth(), 3);

    buffer.undo();
    assert_eq!(buffer.to_string(), "a\nb\nc");
    assert!(!buffer.can_undo());

    buffer.redo();
    assert_eq!(buffer.to_string(), "// a\n// b\n// c");
}

#[test]
fn test_batch_does_not_absorb_previous_typing() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "x", true, ms(0)).unwrap();

    buffer.begin_batch_edit();
    buffer.insert(1, "y", true, ms(10)).unwrap();
    buffer.insert(2, "z", true, ms(20)).unwrap();
    buffer.end_batch_edit();

    buffer.undo();
    assert_eq!(buffer.to_string(), "x");
}

#[test]
fn test_edit_after_undo_discards_redo() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "one", true, ms(0)).unwrap();
    buffer.insert(3, " two", true, ms(1_000)).unwrap();

    buffer.undo();
    assert!(buffer.can_redo());

    buffer.insert(3, " three", true, ms(2_000)).unwrap();
    assert!(!buffer.can_redo());
    assert_eq!(buffer.redo(), None);
    assert_eq!(buffer.to_string(), "one three");
}

#[test]
fn test_log_keeps_at_most_max_actions() {
    let mut buffer = TextBuffer::new();
    for i in 0..1001u64 {
        buffer
            .insert(i as usize, "x", true, Duration::from_secs(i))
            .unwrap();
    }
    assert_eq!(buffer.undo_depth(), 1000);

    let mut undone = 0;
    while buffer.undo().is_some() {
        undone += 1;
    }
    assert_eq!(undone, 1000);
    assert_eq!(buffer.to_string(), "x");
}

#[test]
fn test_clear_history() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "abc", true, ms(0)).unwrap();
    buffer.clear_history();

    assert!(!buffer.can_undo());
    assert_eq!(buffer.undo(), None);
    assert_eq!(buffer.to_string(), "abc");
}

#[test]
fn test_selection_change_ends_coalescing() {
    let mut buffer = TextBuffer::new();
    buffer.insert(0, "ab", true, ms(0)).unwrap();
    buffer.set_selection(2, 2).unwrap();
    buffer.insert(2, "cd", true, ms(10)).unwrap();

    buffer.undo();
    assert_eq!(buffer.to_string(), "ab");
}

#[test]
fn test_undo_across_moved_gap() {
    let mut buffer = TextBuffer::from_text("0123456789");
    buffer.delete(7, 9, true, ms(0)).unwrap();
    // Selecting elsewhere moves the gap away from the deleted text.
    buffer.set_selection(0, 1).unwrap();
    buffer.insert(0, "X", false, ms(1)).unwrap();
    assert_eq!(buffer.to_string(), "X01234569");

    // Uncaptured edits shift the text under the log; the frozen text is replayed at its
    // recorded offset.
    buffer.undo();
    assert_eq!(buffer.to_string(), "X0123457869");
}

#[test]
fn test_groups_advance_per_step() {
    let mut buffer = TextBuffer::new();
    let first = buffer.current_group();

    buffer.insert(0, "a", true, ms(0)).unwrap();
    buffer.insert(1, "b", true, ms(10)).unwrap();
    assert_eq!(buffer.current_group(), first + 1);

    buffer.begin_batch_edit();
    buffer.insert(2, "c", true, ms(5_000)).unwrap();
    buffer.insert(0, "d", true, ms(6_000)).unwrap();
    assert_eq!(buffer.current_group(), first + 1);
    buffer.end_batch_edit();
    assert_eq!(buffer.current_group(), first + 2);
}

#[test]
fn test_undo_after_uncaptured_shrink_does_not_panic() {
    let mut buffer = TextBuffer::from_text("0123456789");
    buffer.insert(8, "ab", true, ms(0)).unwrap();
    buffer.delete(0, 12, false, ms(1)).unwrap();

    // The recorded span lies past the end; the delete is skipped.
    assert_eq!(buffer.undo(), Some(8));
    assert_eq!(buffer.to_string(), "");
    assert_eq!(buffer.selection(), 0..0);
    assert!(!buffer.can_undo());
    assert!(buffer.can_redo());
}

#[test]
fn test_redo_after_uncaptured_shrink_clamps_insert() {
    let mut buffer = TextBuffer::from_text("0123456789");
    buffer.insert(8, "ab", true, ms(0)).unwrap();
    buffer.undo();
    buffer.delete(0, 10, false, ms(1)).unwrap();

    // The recorded offset is clamped to the end of the shorter text.
    assert_eq!(buffer.redo(), Some(10));
    assert_eq!(buffer.to_string(), "ab");
    assert_eq!(buffer.selection(), 2..2);
    assert!(buffer.can_undo());
    assert!(!buffer.can_redo());
    assert_eq!(buffer.line_count(), 1);
}
