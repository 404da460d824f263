#![forbid(unsafe_code)]

//! Undo/redo record management for a rich-text editor.
//!
//! An editing host (the component that owns the document, selection, and
//! listeners) reports every edit to an [`UndoRedoManager`] as a pair of
//! before/after snapshots. The manager keeps those [`UndoRedoRecord`]s on two
//! bounded stacks and replays them onto the host on undo and redo.
//!
//! - **Two capture modes**: snapshots as span strings, or as span creation
//!   options rebuilt by [`StyledStringBuilder`]
//! - **Preview coalescing**: an IME composition becomes one record
//! - **Batches**: records counted between `start_counting_record` and
//!   `end_counting_record` undo as one step
//! - **Veto hooks**: replays go through the same will-change checks as edits
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       UndoRedoManager                           │
//! │  ┌──────────────────┐          ┌──────────────────┐             │
//! │  │   undo_records   │          │   redo_records   │             │
//! │  │  ┌────────────┐  │  undo    │  ┌────────────┐  │             │
//! │  │  │ RecordN    │  │ ──────►  │  │ Record1    │  │             │
//! │  │  ├────────────┤  │          │  ├────────────┤  │             │
//! │  │  │ Record2    │  │  ◄────── │  │ Record2    │  │             │
//! │  │  ├────────────┤  │  redo    │  ├────────────┤  │             │
//! │  │  │ Record1    │  │          │  │ RecordN    │  │             │
//! │  │  └────────────┘  │          │  └────────────┘  │             │
//! │  └──────────────────┘          └──────────────────┘             │
//! │          ▲ record_operation          │ replay                   │
//! └──────────┼───────────────────────────┼──────────────────────────┘
//!            │                           ▼
//!      ┌───────────────────── EditorHost (weak) ─────────────────┐
//!      │ content / selection / replace_range / veto hooks        │
//!      └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! let mut manager = UndoRedoManager::attach(&host, UndoMode::StyledString, UndoConfig::default());
//!
//! let mut record = UndoRedoRecord::new();
//! manager.update_record_before_change(start, removed_len, &mut record, false);
//! host.borrow_mut().replace_range(range, &inserted);
//! manager.update_record_after_change(start, inserted.len(), &mut record);
//! manager.record_operation(record, false);
//!
//! manager.handle_on_undo_action();
//! ```

pub mod builder;
pub mod config;
pub mod host;
pub mod manager;
pub mod options;
pub mod record;
pub mod recorder;

pub use builder::{ResultObject, SelectSpanType, StyledStringBuilder};
pub use config::{ConfigError, DEFAULT_MAX_RECORDS, UndoConfig};
pub use host::{ChangeReason, ChangeValue, DeleteValue, EditorHost, check_change};
pub use manager::{PreviewPhase, UndoRedoManager};
pub use options::{
    BuilderSpanOptions, ImageSpanOptions, OptionsList, SpanOptions, SymbolSpanOptions,
    TextSpanOptions, options_list_len, options_list_text,
};
pub use record::UndoRedoRecord;
pub use recorder::{
    RecordContent, RecordHalf, SpansRecorder, StyledStringRecorder, UndoMode, UndoRecorder,
};

/// Log target for manager and recorder events.
pub const LOG_TARGET: &str = "rte.undo";
