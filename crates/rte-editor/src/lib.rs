#![forbid(unsafe_code)]

//! Rich-text editor host.
//!
//! [`RichEditor`] owns a [`Document`] (content, selection, and the user veto
//! callbacks) and an [`UndoRedoManager`](rte_undo::UndoRedoManager) attached
//! to it. Every editing intent captures an undo record around the mutation:
//!
//! ```text
//!   intent ──► veto hooks ──► capture before ──► mutate ──► capture after
//!                 │                                             │
//!                 └─ vetoed: nothing changes                    ▼
//!                                                  record_operation + did-change
//! ```
//!
//! # Example
//!
//! ```
//! use rte_editor::RichEditor;
//! use rte_undo::UndoMode;
//!
//! let mut editor = RichEditor::new(UndoMode::StyledString);
//! editor.insert_value("hello");
//! editor.delete_backward(2);
//! assert_eq!(editor.text(), "hel");
//!
//! assert!(editor.handle_on_undo_action());
//! assert_eq!(editor.text(), "hello");
//! ```

pub mod document;
pub mod editor;

pub use document::{AboutToDeleteFn, DidChangeFn, Document, WillChangeFn};
pub use editor::RichEditor;

/// Tracing target for editor events.
pub const LOG_TARGET: &str = "rte.editor";
