#![warn(missing_docs)]
//! Editable Core - Gap Buffer Text Model for Interactive Editors
//!
//! # Overview
//!
//! `editable-core` is the text model behind an editing widget: a mutable character sequence
//! tuned for the access pattern of a person typing. It holds no rendering state; collaborators
//! learn about changes through a single change listener.
//!
//! # Core Features
//!
//! - **Gap Buffer Storage**: O(1) amortized edits at the caret, O(distance) to move it
//! - **Line Addressing**: 1-based line queries accelerated by a small MRU checkpoint cache
//! - **Undo/Redo**: bounded history that merges continuous typing and supports batch edits
//! - **Selection**: selecting a range parks the gap at its end, so replacing it is cheap
//! - **Change Notifications**: one synchronous listener per buffer
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  TextBuffer (edits, selection, lines)       │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  UndoLog             │  EditListener        │  ← History & Notifications
//! ├──────────────────────┴──────────────────────┤
//! │  LineCache (line ↔ offset checkpoints)      │  ← Line Access
//! ├─────────────────────────────────────────────┤
//! │  GapBuffer Storage                          │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use editable_core::{EditEvent, TextBuffer};
//! use std::time::Duration;
//!
//! let mut buffer = TextBuffer::from_text("a\nb\nc");
//! buffer.subscribe(|event: &EditEvent| println!("{:?} at {}", event.kind, event.start));
//!
//! assert_eq!(buffer.line_count(), 3);
//! assert_eq!(buffer.line_start(2), Some(2));
//! assert_eq!(buffer.line_of_offset(4), Some(3));
//!
//! // Keystrokes 100ms apart merge into one undo step.
//! buffer.insert(5, "d", true, Duration::from_millis(0)).unwrap();
//! buffer.insert(6, "e", true, Duration::from_millis(100)).unwrap();
//! buffer.undo();
//! assert_eq!(buffer.to_string(), "a\nb\nc");
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - The [`TextBuffer`] facade
//! - [`storage`] - Gap buffer storage layer
//! - [`cache`] - Line/offset checkpoint cache
//! - [`undo`] - Grouped undo/redo log
//! - [`event`] - Change notifications
//! - [`config`] - Buffer configuration
//! - [`error`] - Error types
//! - [`shared`] - Thread-shareable buffer handle

pub mod buffer;
pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod shared;
pub mod storage;
pub mod undo;

pub use buffer::TextBuffer;
pub use cache::{Checkpoint, LineCache};
pub use config::BufferConfig;
pub use error::{BufferError, Result};
pub use event::{EditEvent, EditKind, EditListener};
pub use shared::SharedTextBuffer;
pub use storage::GapBuffer;
pub use undo::{Action, ActionKind, EditTarget, Timestamp, UndoLog};
