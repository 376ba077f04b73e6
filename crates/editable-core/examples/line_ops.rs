use editable_core::TextBuffer;
use std::time::Duration;

fn main() {
    let mut buffer = TextBuffer::from_text("a\nb\nc");

    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.line_start(2), Some(2));
    assert_eq!(buffer.line_end(2), Some(4));
    assert_eq!(buffer.line_of_offset(3), Some(2));

    // Open a new line after "b".
    buffer.set_selection(3, 3).unwrap();
    buffer.enter_newline(Duration::ZERO).unwrap();
    buffer.insert(4, "b2", true, Duration::from_millis(100)).unwrap();
    assert_eq!(buffer.to_string(), "a\nb\nb2\nc");

    for line in 1..=buffer.line_count() {
        let text = buffer.line_string(line).unwrap_or_default();
        println!("{line:>3} | {text}");
    }
}
