#![forbid(unsafe_code)]

//! Editor document: content, selection, and user callbacks.

use std::fmt;
use std::sync::Arc;

use rte_text::{SpanString, SpanTypes, TextRange};
use rte_undo::{ChangeValue, DeleteValue, EditorHost};

/// Veto callback run before a change.
pub type WillChangeFn = Box<dyn FnMut(&ChangeValue) -> bool>;
/// Notification run after a change.
pub type DidChangeFn = Box<dyn FnMut(&ChangeValue)>;
/// Veto callback run before builder spans are deleted.
pub type AboutToDeleteFn = Box<dyn FnMut(&DeleteValue) -> bool>;

/// The document edited by a [`RichEditor`](crate::RichEditor).
///
/// Content is shared as `Arc<SpanString>`; edits copy on write, so snapshots
/// held by undo records are never disturbed.
#[derive(Default)]
pub struct Document {
    content: Arc<SpanString>,
    selection: TextRange,
    on_will_change: Option<WillChangeFn>,
    on_did_change: Option<DidChangeFn>,
    about_to_delete: Option<AboutToDeleteFn>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.content.string())
            .field("spans", &self.content.spans().len())
            .field("selection", &self.selection)
            .field("on_will_change", &self.on_will_change.is_some())
            .field("on_did_change", &self.on_did_change.is_some())
            .field("about_to_delete", &self.about_to_delete.is_some())
            .finish()
    }
}

impl Document {
    /// Document holding `content`, caret at the end.
    #[must_use]
    pub fn new(content: SpanString) -> Self {
        let end = content.len();
        Self {
            content: Arc::new(content),
            selection: TextRange::collapsed(end),
            ..Self::default()
        }
    }

    /// Replace the whole content without notifying anyone.
    pub fn reset(&mut self, content: SpanString) {
        self.selection = TextRange::collapsed(content.len());
        self.content = Arc::new(content);
    }

    /// Number of characters in the content.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn set_on_will_change(&mut self, callback: Option<WillChangeFn>) {
        self.on_will_change = callback;
    }

    pub fn set_on_did_change(&mut self, callback: Option<DidChangeFn>) {
        self.on_did_change = callback;
    }

    pub fn set_about_to_delete(&mut self, callback: Option<AboutToDeleteFn>) {
        self.about_to_delete = callback;
    }
}

impl EditorHost for Document {
    fn content(&self) -> Arc<SpanString> {
        Arc::clone(&self.content)
    }

    fn selection(&self) -> TextRange {
        self.selection
    }

    fn replace_range(&mut self, range: TextRange, value: &SpanString) {
        Arc::make_mut(&mut self.content).replace(range.start, range.len(), value);
    }

    fn set_selection(&mut self, range: TextRange) {
        self.selection = range.clamped(self.content.len());
    }

    fn restore_styles(&mut self, range: TextRange, snapshot: &SpanString, types: SpanTypes) {
        Arc::make_mut(&mut self.content).apply_styles_from(range, snapshot, types);
    }

    fn about_to_delete(&mut self, value: &DeleteValue) -> bool {
        self.about_to_delete.as_mut().is_none_or(|f| f(value))
    }

    fn on_will_change(&mut self, value: &ChangeValue) -> bool {
        self.on_will_change.as_mut().is_none_or(|f| f(value))
    }

    fn on_did_change(&mut self, value: &ChangeValue) {
        if let Some(f) = self.on_did_change.as_mut() {
            f(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rte_undo::ChangeReason;

    #[test]
    fn new_puts_caret_at_end() {
        let doc = Document::new(SpanString::new("abc"));
        assert_eq!(doc.selection(), TextRange::collapsed(3));
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn selection_is_clamped() {
        let mut doc = Document::new(SpanString::new("abc"));
        doc.set_selection(TextRange::new(1, 10));
        assert_eq!(doc.selection(), TextRange::new(1, 3));
    }

    #[test]
    fn replace_does_not_touch_shared_snapshots() {
        let mut doc = Document::new(SpanString::new("abc"));
        let snapshot = doc.content();
        doc.replace_range(TextRange::new(0, 1), &SpanString::new("xy"));
        assert_eq!(snapshot.string(), "abc");
        assert_eq!(doc.content().string(), "xybc");
    }

    #[test]
    fn callbacks_default_to_allow() {
        let mut doc = Document::default();
        assert!(doc.on_will_change(&ChangeValue::default()));
        assert!(doc.about_to_delete(&DeleteValue::default()));
    }

    #[test]
    fn callbacks_are_forwarded() {
        let mut doc = Document::default();
        doc.set_on_will_change(Some(Box::new(|change: &ChangeValue| {
            change.reason != ChangeReason::Paste
        })));
        let paste = ChangeValue {
            reason: ChangeReason::Paste,
            ..ChangeValue::default()
        };
        assert!(!doc.on_will_change(&paste));
        assert!(doc.on_will_change(&ChangeValue::default()));
    }

    #[test]
    fn debug_reports_callbacks() {
        let mut doc = Document::new(SpanString::new("hi"));
        doc.set_on_did_change(Some(Box::new(|_: &ChangeValue| {})));
        let dbg = format!("{doc:?}");
        assert!(dbg.contains("\"hi\""));
        assert!(dbg.contains("on_did_change: true"));
    }
}
