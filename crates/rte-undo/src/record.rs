#![forbid(unsafe_code)]

//! The undo/redo record.
//!
//! A record pairs a "before" half (the range and content an edit replaced)
//! with an "after" half (the range and content it produced). Undo replaces the
//! after range with the before content; redo does the opposite.
//!
//! # Invariants
//!
//! 1. A half is valid when its range is present and well formed, and a
//!    non-empty range carries content (a styled string or an options list)
//! 2. A record is valid when both halves are valid
//! 3. Once pushed onto a stack a record is never mutated
//!
//! Content is held as `Arc<SpanString>`, shared with whatever the host took
//! the snapshot from. Nothing mutates it in place.

use std::sync::Arc;

use rte_text::{SpanString, SpanTypes, TextRange};

use crate::options::{OptionsList, SpanOptions, options_list_len, options_list_text};

/// Before/after snapshot of one edit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UndoRedoRecord {
    /// Affected range before the edit.
    pub range_before: Option<TextRange>,
    /// Affected range after the edit.
    pub range_after: Option<TextRange>,
    /// Caret or selection to restore on undo.
    pub selection_before: Option<TextRange>,
    /// Content the edit removed or replaced.
    pub styled_string_before: Option<Arc<SpanString>>,
    /// Content the edit inserted.
    pub styled_string_after: Option<Arc<SpanString>>,
    /// Structural form of the removed content (spans mode).
    pub options_list_before: Option<OptionsList>,
    /// Structural form of the inserted content (spans mode).
    pub options_list_after: Option<OptionsList>,
    /// Only style metadata changed; the text is untouched.
    pub is_only_style_change: bool,
    /// Style dimensions touched by a style-only edit.
    pub update_span_types: SpanTypes,
    /// Builder spans must be re-materialized exactly on replay.
    pub restore_builder_span: bool,
    /// Batch the record was counted into, if any.
    pub batch_id: Option<u64>,
}

impl UndoRedoRecord {
    /// An empty, invalid record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A pure insertion of `content` at `pos`.
    #[must_use]
    pub fn insertion(pos: usize, content: impl Into<Arc<SpanString>>) -> Self {
        let content = content.into();
        Self {
            range_before: Some(TextRange::collapsed(pos)),
            range_after: Some(TextRange::from_len(pos, content.len())),
            selection_before: Some(TextRange::collapsed(pos)),
            styled_string_after: Some(content),
            ..Self::default()
        }
    }

    /// Return every field to its empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set the before range and the selection to restore on undo.
    pub fn set_operation_before(&mut self, range: TextRange, selection: TextRange) {
        self.range_before = Some(range);
        self.selection_before = Some(selection);
    }

    /// Set the after range.
    pub fn set_operation_after(&mut self, range: TextRange) {
        self.range_after = Some(range);
    }

    /// Whether the before half can be replayed.
    #[must_use]
    pub fn is_before_state_valid(&self) -> bool {
        half_is_valid(
            self.range_before,
            self.styled_string_before.is_some() || self.options_list_before.is_some(),
        )
    }

    /// Whether the after half can be replayed.
    #[must_use]
    pub fn is_after_state_valid(&self) -> bool {
        half_is_valid(
            self.range_after,
            self.styled_string_after.is_some() || self.options_list_after.is_some(),
        )
    }

    /// Whether both halves can be replayed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_before_state_valid() && self.is_after_state_valid()
    }

    /// Flat text of the before content.
    ///
    /// The options list wins when present; otherwise the styled string is
    /// used. A half with neither yields an empty string.
    #[must_use]
    pub fn string_before(&self) -> String {
        flat_text(
            self.options_list_before.as_deref(),
            self.styled_string_before.as_deref(),
        )
    }

    /// Flat text of the after content.
    #[must_use]
    pub fn string_after(&self) -> String {
        flat_text(
            self.options_list_after.as_deref(),
            self.styled_string_after.as_deref(),
        )
    }

    /// Character length of the before content.
    #[must_use]
    pub fn len_before(&self) -> usize {
        content_len(
            self.options_list_before.as_deref(),
            self.styled_string_before.as_deref(),
        )
    }

    /// Character length of the after content.
    #[must_use]
    pub fn len_after(&self) -> usize {
        content_len(
            self.options_list_after.as_deref(),
            self.styled_string_after.as_deref(),
        )
    }

    /// Swap the before and after halves.
    ///
    /// The selection is left alone: it describes the caret to restore on
    /// undo, whichever way the record is read.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.range_before, &mut self.range_after);
        std::mem::swap(&mut self.styled_string_before, &mut self.styled_string_after);
        std::mem::swap(&mut self.options_list_before, &mut self.options_list_after);
    }

    /// Whether the edit changed neither text nor range.
    #[must_use]
    pub(crate) fn is_text_noop(&self) -> bool {
        self.range_before.map(|r| r.len()) == self.range_after.map(|r| r.len())
            && self.string_before() == self.string_after()
    }
}

fn half_is_valid(range: Option<TextRange>, has_content: bool) -> bool {
    match range {
        Some(range) => range.is_well_formed() && (range.is_empty() || has_content),
        None => false,
    }
}

fn flat_text(options: Option<&[SpanOptions]>, styled: Option<&SpanString>) -> String {
    match (options, styled) {
        (Some(list), _) => options_list_text(list),
        (None, Some(value)) => value.string().to_string(),
        (None, None) => String::new(),
    }
}

fn content_len(options: Option<&[SpanOptions]>, styled: Option<&SpanString>) -> usize {
    match (options, styled) {
        (Some(list), _) => options_list_len(list),
        (None, Some(value)) => value.len(),
        (None, None) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{SymbolSpanOptions, TextSpanOptions};

    fn deletion(start: usize, text: &str) -> UndoRedoRecord {
        let content = SpanString::new(text);
        UndoRedoRecord {
            range_before: Some(TextRange::from_len(start, content.len())),
            range_after: Some(TextRange::collapsed(start)),
            selection_before: Some(TextRange::collapsed(start + content.len())),
            styled_string_before: Some(Arc::new(content)),
            ..UndoRedoRecord::default()
        }
    }

    #[test]
    fn new_record_is_invalid() {
        let record = UndoRedoRecord::new();
        assert!(!record.is_before_state_valid());
        assert!(!record.is_after_state_valid());
        assert!(!record.is_valid());
    }

    #[test]
    fn insertion_is_valid_without_before_content() {
        let record = UndoRedoRecord::insertion(3, SpanString::new("hello1"));
        assert!(record.is_valid());
        assert_eq!(record.range_after, Some(TextRange::new(3, 9)));
        assert_eq!(record.string_before(), "");
        assert_eq!(record.string_after(), "hello1");
    }

    #[test]
    fn non_empty_range_needs_content() {
        let mut record = deletion(0, "abc");
        assert!(record.is_valid());
        record.styled_string_before = None;
        assert!(!record.is_before_state_valid());
        record.options_list_before = Some(vec![SpanOptions::Text(TextSpanOptions::new("abc"))]);
        assert!(record.is_before_state_valid());
    }

    #[test]
    fn malformed_range_is_invalid() {
        let mut record = deletion(0, "abc");
        record.range_after = Some(TextRange { start: 4, end: 2 });
        assert!(!record.is_after_state_valid());
        assert!(!record.is_valid());
    }

    #[test]
    fn options_list_wins_for_flat_text() {
        let mut record = deletion(0, "ignored");
        record.options_list_before = Some(vec![
            SpanOptions::Text(TextSpanOptions::new("ab")),
            SpanOptions::Symbol(SymbolSpanOptions::default()),
        ]);
        assert_eq!(record.string_before().chars().count(), 4);
        assert!(record.string_before().starts_with("ab"));
        assert_eq!(record.len_before(), 4);
    }

    #[test]
    fn reverse_swaps_halves_and_keeps_selection() {
        let mut record = deletion(2, "xy");
        let selection = record.selection_before;
        record.reverse();
        assert_eq!(record.range_before, Some(TextRange::collapsed(2)));
        assert_eq!(record.range_after, Some(TextRange::new(2, 4)));
        assert_eq!(record.string_after(), "xy");
        assert!(record.styled_string_before.is_none());
        assert_eq!(record.selection_before, selection);
        record.reverse();
        assert_eq!(record, deletion(2, "xy"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut record = deletion(0, "abc");
        record.batch_id = Some(4);
        record.restore_builder_span = true;
        record.reset();
        assert_eq!(record, UndoRedoRecord::default());
    }

    #[test]
    fn set_operation_halves() {
        let mut record = UndoRedoRecord::new();
        record.set_operation_before(TextRange::collapsed(5), TextRange::new(1, 5));
        record.set_operation_after(TextRange::new(5, 7));
        assert_eq!(record.selection_before, Some(TextRange::new(1, 5)));
        assert!(record.is_before_state_valid());
        // Non-empty after range without content.
        assert!(!record.is_after_state_valid());
    }

    #[test]
    fn noop_detection_compares_text_and_length() {
        let mut record = deletion(0, "ab");
        record.range_after = Some(TextRange::new(0, 2));
        record.styled_string_after = Some(Arc::new(SpanString::new("ab")));
        assert!(record.is_text_noop());
        record.styled_string_after = Some(Arc::new(SpanString::new("ac")));
        assert!(!record.is_text_noop());
    }
}
