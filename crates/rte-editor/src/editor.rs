#![forbid(unsafe_code)]

//! The rich-text editor.
//!
//! [`RichEditor`] turns editing intents into document mutations and undo
//! records. Each intent runs the document's veto callbacks first; a vetoed
//! intent leaves the document and the history untouched.
//!
//! # Composition
//!
//! IME preview text is written straight into the document while it is being
//! composed. The first [`RichEditor::set_preview_text`] opens a preview record
//! in the manager; later updates coalesce into it, so the finished
//! composition becomes one undo step. Any other intent commits a pending
//! composition before it runs.
//!
//! # Drag and drop
//!
//! An internal drop is two records: the deletion at the drag source, then the
//! insertion at the destination. A destination after the source is shifted
//! left by the source length, since the deletion happens first. Dropping
//! inside the source range does nothing.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use rte_text::{
    ParagraphStyle, Span, SpanKind, SpanString, SpanType, SpanTypes, TextRange, TextStyle,
};
use rte_undo::{
    BuilderSpanOptions, ChangeReason, ChangeValue, EditorHost, ImageSpanOptions, ResultObject,
    SpanOptions, StyledStringBuilder, SymbolSpanOptions, TextSpanOptions, UndoConfig, UndoMode,
    UndoRedoManager, UndoRedoRecord, check_change,
};

use crate::LOG_TARGET;
use crate::document::{AboutToDeleteFn, DidChangeFn, Document, WillChangeFn};

/// An IME composition in progress.
#[derive(Debug, Clone)]
struct Composition {
    /// Where the preview text currently sits.
    range: TextRange,
    /// Range the composition replaced when it started.
    replaced: TextRange,
    /// Spans of the replaced range, for the did-change notification.
    original_spans: Vec<ResultObject>,
}

/// A rich-text editor with undo/redo.
#[derive(Debug)]
pub struct RichEditor {
    document: Rc<RefCell<Document>>,
    undo: UndoRedoManager,
    drag_range: Option<TextRange>,
    composition: Option<Composition>,
}

impl RichEditor {
    /// Empty editor recording in `mode` with the default configuration.
    #[must_use]
    pub fn new(mode: UndoMode) -> Self {
        Self::with_config(mode, UndoConfig::default())
    }

    /// Empty editor recording in `mode`.
    #[must_use]
    pub fn with_config(mode: UndoMode, config: UndoConfig) -> Self {
        let document = Rc::new(RefCell::new(Document::default()));
        let undo = UndoRedoManager::attach(&document, mode, config);
        Self {
            document,
            undo,
            drag_range: None,
            composition: None,
        }
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Replace the whole content and clear the history.
    ///
    /// No callbacks run and nothing is recorded.
    pub fn set_styled_string(&mut self, value: SpanString) {
        self.composition = None;
        self.drag_range = None;
        self.document.borrow_mut().reset(value);
        self.undo.clear_undo_redo_records();
    }

    /// Current content.
    #[must_use]
    pub fn content(&self) -> Arc<SpanString> {
        self.document.borrow().content()
    }

    /// Flat text of the content.
    #[must_use]
    pub fn text(&self) -> String {
        self.content().string().to_owned()
    }

    /// Length of the content in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.document.borrow().len()
    }

    /// Whether the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Caret and selection
    // ========================================================================

    #[must_use]
    pub fn selection(&self) -> TextRange {
        self.document.borrow().selection()
    }

    #[must_use]
    pub fn caret_position(&self) -> usize {
        self.selection().end
    }

    pub fn set_caret_position(&mut self, pos: usize) {
        self.document
            .borrow_mut()
            .set_selection(TextRange::collapsed(pos));
    }

    /// Select `range`. Reversed bounds are swapped and both are clamped.
    pub fn set_selection(&mut self, range: TextRange) {
        let range = TextRange::new(range.start.min(range.end), range.start.max(range.end));
        self.document.borrow_mut().set_selection(range);
    }

    // ========================================================================
    // Text intents
    // ========================================================================

    /// Type `text` over the selection.
    pub fn insert_value(&mut self, text: &str) -> bool {
        let selection = self.selection();
        self.edit(selection, &SpanString::new(text), ChangeReason::Input)
            .is_some()
    }

    /// Delete the selection, or `count` characters after the caret.
    pub fn delete_forward(&mut self, count: usize) -> bool {
        let selection = self.selection();
        let range = if selection.is_empty() {
            TextRange::from_len(selection.start, count)
        } else {
            selection
        };
        self.edit(range, &SpanString::empty(), ChangeReason::Input)
            .is_some()
    }

    /// Delete the selection, or `count` characters before the caret.
    pub fn delete_backward(&mut self, count: usize) -> bool {
        let selection = self.selection();
        let range = if selection.is_empty() {
            TextRange::new(selection.start.saturating_sub(count), selection.start)
        } else {
            selection
        };
        self.edit(range, &SpanString::empty(), ChangeReason::Input)
            .is_some()
    }

    /// Remove the selection and return it.
    pub fn cut(&mut self) -> Option<SpanString> {
        let selection = self.selection();
        if selection.is_empty() {
            return None;
        }
        let removed = self.content().substring_range(selection);
        self.edit(selection, &SpanString::empty(), ChangeReason::Cut)?;
        Some(removed)
    }

    /// Paste plain text over the selection.
    pub fn paste(&mut self, text: &str) -> bool {
        self.paste_styled_string(&SpanString::new(text))
    }

    /// Paste styled content over the selection.
    pub fn paste_styled_string(&mut self, value: &SpanString) -> bool {
        let selection = self.selection();
        self.edit(selection, value, ChangeReason::Paste).is_some()
    }

    // ========================================================================
    // Span intents
    // ========================================================================

    /// Insert a text run at its offset, or at the caret.
    ///
    /// Returns the offset the run landed at.
    pub fn add_text_span(&mut self, options: TextSpanOptions) -> Option<usize> {
        self.add_span(SpanOptions::Text(options))
    }

    pub fn add_image_span(&mut self, options: ImageSpanOptions) -> Option<usize> {
        self.add_span(SpanOptions::Image(options))
    }

    pub fn add_symbol_span(&mut self, options: SymbolSpanOptions) -> Option<usize> {
        self.add_span(SpanOptions::Symbol(options))
    }

    pub fn add_builder_span(&mut self, options: BuilderSpanOptions) -> Option<usize> {
        self.add_span(SpanOptions::Builder(options))
    }

    fn add_span(&mut self, options: SpanOptions) -> Option<usize> {
        let pos = options
            .offset()
            .unwrap_or_else(|| self.caret_position())
            .min(self.len());
        let value = options.to_styled_string(true);
        self.edit(TextRange::collapsed(pos), &value, ChangeReason::Controller)?;
        Some(pos)
    }

    /// Delete every span in `range`.
    pub fn delete_spans(&mut self, range: TextRange) -> bool {
        self.edit(range, &SpanString::empty(), ChangeReason::Controller)
            .is_some()
    }

    /// Apply the set parts of `style` over `range`.
    pub fn update_span_style(&mut self, range: TextRange, style: &TextStyle) -> bool {
        self.restyle(range, style.to_kinds())
    }

    pub fn update_paragraph_style(&mut self, range: TextRange, style: ParagraphStyle) -> bool {
        self.restyle(range, vec![SpanKind::Paragraph(style)])
    }

    // ========================================================================
    // Drag and drop
    // ========================================================================

    /// Mark `range` as the content being dragged.
    pub fn set_drag_range(&mut self, range: TextRange) {
        let range = range.clamped(self.len());
        self.drag_range = (!range.is_empty()).then_some(range);
    }

    #[must_use]
    pub fn drag_range(&self) -> Option<TextRange> {
        self.drag_range
    }

    /// Drop the dragged content at `dest` as plain text.
    pub fn handle_on_drag_drop_text(&mut self, dest: usize) -> bool {
        self.drag_drop(dest, false)
    }

    /// Drop the dragged content at `dest` with its spans.
    pub fn handle_on_drag_drop_styled_string(&mut self, dest: usize) -> bool {
        self.drag_drop(dest, true)
    }

    fn drag_drop(&mut self, dest: usize, keep_spans: bool) -> bool {
        self.commit_composition();
        let Some(source) = self.drag_range.take() else {
            tracing::debug!(target: LOG_TARGET, dest, "drop without drag range");
            return false;
        };
        let source = source.clamped(self.len());
        if source.is_empty() || (source.start..=source.end).contains(&dest) {
            tracing::debug!(target: LOG_TARGET, %source, dest, "drop inside drag source ignored");
            return false;
        }
        let dest = dest.min(self.len());
        let content = self.content();
        let moved = if keep_spans {
            content.substring_range(source)
        } else {
            SpanString::new(content.substring_range(source).string())
        };
        let insert_at = if dest > source.end {
            dest - source.len()
        } else {
            dest
        };

        // Both halves are vetted before either is applied.
        let (removal, insertion) = {
            let mut document = self.document.borrow_mut();
            let removal =
                ChangeValue::describe(ChangeReason::Drag, &*document, source, &SpanString::empty());
            if !check_change(&mut *document, &removal, true) {
                return false;
            }
            let insertion = ChangeValue::describe(
                ChangeReason::Drag,
                &*document,
                TextRange::collapsed(insert_at),
                &moved,
            );
            if !check_change(&mut *document, &insertion, true) {
                return false;
            }
            (removal, insertion)
        };

        self.apply(removal, &SpanString::empty(), StyledStringBuilder::process_drag_delete_record);
        self.apply(insertion, &moved, |_| {});
        self.document
            .borrow_mut()
            .set_selection(TextRange::from_len(insert_at, moved.len()));
        tracing::debug!(
            target: LOG_TARGET,
            %source,
            dest = insert_at,
            len = moved.len(),
            "drag content moved"
        );
        true
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// Show `value` as the current composition text.
    ///
    /// The first call replaces the selection; later calls replace the
    /// previous preview text.
    pub fn set_preview_text(&mut self, value: &str) {
        let composition = match self.composition.take() {
            Some(composition) => composition,
            None => {
                let replaced = self.selection();
                Composition {
                    range: replaced,
                    replaced,
                    original_spans: self.document.borrow().span_results(replaced),
                }
            }
        };
        self.undo
            .record_preview_inputting_start(composition.replaced.start, composition.replaced.len());
        let value = SpanString::new(value);
        let range = TextRange::from_len(composition.range.start, value.len());
        {
            let mut document = self.document.borrow_mut();
            document.replace_range(composition.range, &value);
            document.set_selection(TextRange::collapsed(range.end));
        }
        tracing::trace!(target: LOG_TARGET, %range, "preview text updated");
        self.composition = Some(Composition { range, ..composition });
    }

    /// Commit the composition in progress.
    ///
    /// Returns `true` when it produced an undo record; a composition that
    /// left the text as it was produces none.
    pub fn finish_text_preview(&mut self) -> bool {
        let Some(composition) = self.composition.take() else {
            return false;
        };
        let mut candidate = UndoRedoRecord::new();
        candidate.set_operation_after(composition.range);
        if !self.undo.record_preview_inputting_end(candidate) {
            return false;
        }
        let mut document = self.document.borrow_mut();
        let change = ChangeValue {
            reason: ChangeReason::Input,
            range_before: composition.replaced,
            range_after: composition.range,
            original_spans: composition.original_spans,
            replaced_spans: document.span_results(composition.range),
        };
        document.on_did_change(&change);
        true
    }

    /// Whether a composition is in progress.
    #[must_use]
    pub fn is_previewing(&self) -> bool {
        self.composition.is_some()
    }

    fn commit_composition(&mut self) {
        if self.composition.is_some() {
            self.finish_text_preview();
        }
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Undo the last step. A composition in progress is committed first.
    pub fn handle_on_undo_action(&mut self) -> bool {
        self.commit_composition();
        self.undo.handle_on_undo_action()
    }

    pub fn handle_on_redo_action(&mut self) -> bool {
        self.commit_composition();
        self.undo.handle_on_redo_action()
    }

    /// Start grouping the following edits into one undo step.
    pub fn begin_batch(&mut self) {
        self.undo.start_counting_record();
    }

    /// Stop grouping and return how many records the batch holds.
    pub fn end_batch(&mut self) -> usize {
        self.undo.end_counting_record()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    #[must_use]
    pub fn undo_manager(&self) -> &UndoRedoManager {
        &self.undo
    }

    // ========================================================================
    // Callbacks
    // ========================================================================

    pub fn set_on_will_change(&mut self, callback: impl FnMut(&ChangeValue) -> bool + 'static) {
        let callback: WillChangeFn = Box::new(callback);
        self.document.borrow_mut().set_on_will_change(Some(callback));
    }

    pub fn set_on_did_change(&mut self, callback: impl FnMut(&ChangeValue) + 'static) {
        let callback: DidChangeFn = Box::new(callback);
        self.document.borrow_mut().set_on_did_change(Some(callback));
    }

    pub fn set_about_to_delete(
        &mut self,
        callback: impl FnMut(&rte_undo::DeleteValue) -> bool + 'static,
    ) {
        let callback: AboutToDeleteFn = Box::new(callback);
        self.document.borrow_mut().set_about_to_delete(Some(callback));
    }

    /// Remove every callback.
    pub fn clear_callbacks(&mut self) {
        let mut document = self.document.borrow_mut();
        document.set_on_will_change(None);
        document.set_on_did_change(None);
        document.set_about_to_delete(None);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Replace `range` with `value` as one recorded step, if the callbacks
    /// allow it.
    fn edit(
        &mut self,
        range: TextRange,
        value: &SpanString,
        reason: ChangeReason,
    ) -> Option<ChangeValue> {
        self.commit_composition();
        let range = range.clamped(self.len());
        if range.is_empty() && value.is_empty() {
            return None;
        }
        let change = {
            let mut document = self.document.borrow_mut();
            let change = ChangeValue::describe(reason, &*document, range, value);
            if !check_change(&mut *document, &change, true) {
                tracing::debug!(target: LOG_TARGET, %range, reason = reason.as_str(), "edit vetoed");
                return None;
            }
            change
        };
        Some(self.apply(change, value, |_| {}))
    }

    /// Apply an already vetted change and record it.
    ///
    /// `finish` sees the record after both halves are captured and before it
    /// is pushed.
    fn apply(
        &mut self,
        change: ChangeValue,
        value: &SpanString,
        finish: impl FnOnce(&mut UndoRedoRecord),
    ) -> ChangeValue {
        let range = change.range_before;
        let mut record = UndoRedoRecord::new();
        self.undo
            .update_record_before_change(range.start, range.len(), &mut record, false);
        record.restore_builder_span = self.content().has_span_in(SpanType::Builder, range)
            || value.has_span_in(SpanType::Builder, TextRange::new(0, value.len()));
        {
            let mut document = self.document.borrow_mut();
            document.replace_range(range, value);
            document.set_selection(TextRange::collapsed(change.range_after.end));
        }
        self.undo
            .update_record_after_change(range.start, value.len(), &mut record);
        finish(&mut record);
        self.undo.record_operation(record, false);
        tracing::debug!(
            target: LOG_TARGET,
            reason = change.reason.as_str(),
            from = %change.range_before,
            to = %change.range_after,
            "edit applied"
        );
        self.document.borrow_mut().on_did_change(&change);
        change
    }

    /// Record a style-only change of `kinds` over `range`.
    fn restyle(&mut self, range: TextRange, kinds: Vec<SpanKind>) -> bool {
        self.commit_composition();
        let range = range.clamped(self.len());
        let types = kinds
            .iter()
            .fold(SpanTypes::empty(), |types, kind| types | SpanTypes::from(kind.span_type()));
        if range.is_empty() || types.is_empty() {
            return false;
        }
        let mut restyled = self.content().substring_range(range);
        let whole = TextRange::new(0, restyled.len());
        for kind in kinds {
            restyled.add_span(Span::new(whole, kind));
        }
        let change = {
            let mut document = self.document.borrow_mut();
            let change = ChangeValue::describe(ChangeReason::Controller, &*document, range, &restyled);
            if !check_change(&mut *document, &change, false) {
                tracing::debug!(target: LOG_TARGET, %range, "style change vetoed");
                return false;
            }
            change
        };

        let mut record = UndoRedoRecord::new();
        record.update_span_types = types;
        self.undo
            .update_record_before_change(range.start, range.len(), &mut record, true);
        self.document
            .borrow_mut()
            .restore_styles(range, &restyled, types);
        self.undo
            .update_record_after_change(range.start, range.len(), &mut record);
        self.undo.record_operation(record, false);
        tracing::debug!(target: LOG_TARGET, %range, ?types, "style applied");
        self.document.borrow_mut().on_did_change(&change);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rte_text::{BuilderAttr, FontStyle, ImageAttr, SymbolAttr};

    fn editor_with(text: &str) -> RichEditor {
        let mut editor = RichEditor::new(UndoMode::StyledString);
        editor.set_styled_string(SpanString::new(text));
        editor
    }

    #[test]
    fn insert_replaces_selection_and_moves_caret() {
        let mut editor = editor_with("hello world");
        editor.set_selection(TextRange::new(6, 11));
        assert!(editor.insert_value("there"));
        assert_eq!(editor.text(), "hello there");
        assert_eq!(editor.selection(), TextRange::collapsed(11));
    }

    #[test]
    fn empty_insert_at_caret_records_nothing() {
        let mut editor = editor_with("abc");
        assert!(!editor.insert_value(""));
        assert!(!editor.can_undo());
    }

    #[test]
    fn delete_backward_at_start_does_nothing() {
        let mut editor = editor_with("abc");
        editor.set_caret_position(0);
        assert!(!editor.delete_backward(1));
        assert_eq!(editor.text(), "abc");
    }

    #[test]
    fn delete_forward_clamps_to_end() {
        let mut editor = editor_with("abc");
        editor.set_caret_position(1);
        assert!(editor.delete_forward(10));
        assert_eq!(editor.text(), "a");
        assert!(editor.handle_on_undo_action());
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.selection(), TextRange::collapsed(1));
    }

    #[test]
    fn reversed_selection_is_normalized() {
        let mut editor = editor_with("abcdef");
        editor.set_selection(TextRange::new(4, 1));
        assert_eq!(editor.selection(), TextRange::new(1, 4));
    }

    #[test]
    fn cut_returns_removed_content() {
        let mut editor = editor_with("abcdef");
        editor.set_selection(TextRange::new(1, 3));
        let removed = editor.cut().map(|s| s.string().to_owned());
        assert_eq!(removed.as_deref(), Some("bc"));
        assert_eq!(editor.text(), "adef");
        editor.set_caret_position(0);
        assert!(editor.cut().is_none());
    }

    #[test]
    fn set_styled_string_clears_history() {
        let mut editor = editor_with("");
        editor.insert_value("abc");
        assert!(editor.can_undo());
        editor.set_styled_string(SpanString::new("fresh"));
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
        assert_eq!(editor.caret_position(), 5);
    }

    #[test]
    fn span_intents_use_offset_or_caret() {
        let mut editor = editor_with("ab");
        editor.set_caret_position(1);
        let image = ImageSpanOptions {
            image: ImageAttr::new("cat.png"),
            ..ImageSpanOptions::default()
        };
        assert_eq!(editor.add_image_span(image), Some(1));
        let symbol = SymbolSpanOptions {
            offset: Some(0),
            symbol: SymbolAttr::new(7),
            ..SymbolSpanOptions::default()
        };
        assert_eq!(editor.add_symbol_span(symbol), Some(0));
        assert_eq!(editor.len(), 2 + 1 + 2);
        assert!(editor.content().has_span_in(SpanType::Image, TextRange::new(0, 5)));
        assert!(editor.content().has_span_in(SpanType::Symbol, TextRange::new(0, 2)));
    }

    #[test]
    fn add_text_span_clamps_offset() {
        let mut editor = editor_with("ab");
        let options = TextSpanOptions {
            offset: Some(99),
            ..TextSpanOptions::new("cd")
        };
        assert_eq!(editor.add_text_span(options), Some(2));
        assert_eq!(editor.text(), "abcd");
    }

    #[test]
    fn builder_records_restore_builder_spans() {
        let mut editor = RichEditor::new(UndoMode::Spans);
        editor.insert_value("ab");
        let options = BuilderSpanOptions {
            offset: Some(1),
            builder: BuilderAttr::new(3).with_placeholder_len(2),
            style: TextStyle::default(),
            paragraph_style: None,
        };
        assert_eq!(editor.add_builder_span(options), Some(1));
        let top = editor.undo_manager().undo_records().back().cloned();
        assert!(top.is_some_and(|record| record.restore_builder_span));

        assert!(editor.delete_spans(TextRange::new(1, 3)));
        assert_eq!(editor.text(), "ab");
        assert!(editor.handle_on_undo_action());
        assert!(editor.content().has_span_in(SpanType::Builder, TextRange::new(1, 3)));
    }

    #[test]
    fn restyle_records_style_only_change() {
        let mut editor = editor_with("hello");
        let style = TextStyle {
            font: Some(FontStyle::bold()),
            ..TextStyle::default()
        };
        assert!(editor.update_span_style(TextRange::new(0, 3), &style));
        let record = editor.undo_manager().undo_records().back().cloned();
        let Some(record) = record else {
            panic!("style change was not recorded");
        };
        assert!(record.is_only_style_change);
        assert_eq!(record.update_span_types, SpanTypes::FONT);
        assert!(editor.content().has_span_in(SpanType::Font, TextRange::new(0, 3)));

        assert!(editor.handle_on_undo_action());
        assert!(!editor.content().has_span_in(SpanType::Font, TextRange::new(0, 5)));
        assert_eq!(editor.len(), 5);
    }

    #[test]
    fn empty_style_is_rejected() {
        let mut editor = editor_with("hello");
        assert!(!editor.update_span_style(TextRange::new(0, 3), &TextStyle::default()));
        assert!(!editor.update_paragraph_style(TextRange::collapsed(2), ParagraphStyle::default()));
        assert!(!editor.can_undo());
    }

    #[test]
    fn drag_without_range_does_nothing() {
        let mut editor = editor_with("abc");
        assert!(!editor.handle_on_drag_drop_text(1));
        editor.set_drag_range(TextRange::new(2, 2));
        assert_eq!(editor.drag_range(), None);
    }

    #[test]
    fn plain_drop_discards_spans() {
        let mut editor = editor_with("abcdef");
        let style = TextStyle {
            font: Some(FontStyle::bold()),
            ..TextStyle::default()
        };
        editor.update_span_style(TextRange::new(0, 2), &style);
        editor.set_drag_range(TextRange::new(0, 2));
        assert!(editor.handle_on_drag_drop_text(6));
        assert_eq!(editor.text(), "cdefab");
        assert!(!editor.content().has_span_in(SpanType::Font, TextRange::new(0, 6)));
        assert_eq!(editor.selection(), TextRange::new(4, 6));
    }

    #[test]
    fn preview_end_without_preview_is_false() {
        let mut editor = editor_with("abc");
        assert!(!editor.finish_text_preview());
        assert!(!editor.is_previewing());
    }

    #[test]
    fn edit_during_preview_commits_it_first() {
        let mut editor = editor_with("");
        editor.set_preview_text("n");
        editor.set_preview_text("ni");
        assert!(editor.is_previewing());
        assert!(editor.insert_value("!"));
        assert!(!editor.is_previewing());
        assert_eq!(editor.text(), "ni!");
        assert_eq!(editor.undo_manager().undo_depth(), 2);
    }

    #[test]
    fn clear_callbacks_removes_vetoes() {
        let mut editor = editor_with("abc");
        editor.set_on_will_change(|_| false);
        assert!(!editor.insert_value("x"));
        editor.clear_callbacks();
        assert!(editor.insert_value("x"));
    }
}
