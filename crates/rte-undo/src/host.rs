#![forbid(unsafe_code)]

//! The editing host seen from the undo manager.
//!
//! The manager holds only a weak reference to its host and reaches it through
//! [`EditorHost`]: read the content and selection, replace a range, restore
//! styles, and run the veto hooks that guard every edit.

use std::sync::Arc;

use rte_text::{SpanString, SpanType, SpanTypes, TextRange};

use crate::builder::{ResultObject, StyledStringBuilder};

/// Why the content is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChangeReason {
    /// Typing and deleting, including committed composition text.
    #[default]
    Input,
    /// Clipboard paste.
    Paste,
    /// Clipboard cut.
    Cut,
    /// Either half of a drag and drop move.
    Drag,
    /// Programmatic edit through the editor API.
    Controller,
    /// Replay of an undo record.
    Undo,
    /// Replay of a redo record.
    Redo,
}

impl ChangeReason {
    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Paste => "paste",
            Self::Cut => "cut",
            Self::Drag => "drag",
            Self::Controller => "controller",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

/// Payload of the will-change and did-change notifications.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChangeValue {
    pub reason: ChangeReason,
    /// Range being replaced, in the content before the change.
    pub range_before: TextRange,
    /// Range of the new content, in the content after the change.
    pub range_after: TextRange,
    /// Spans of the range being replaced.
    pub original_spans: Vec<ResultObject>,
    /// Spans of the content replacing it, in post-change coordinates.
    pub replaced_spans: Vec<ResultObject>,
}

impl ChangeValue {
    /// Describe replacing `range` of the host content with `incoming`.
    #[must_use]
    pub fn describe(
        reason: ChangeReason,
        host: &dyn EditorHost,
        range: TextRange,
        incoming: &SpanString,
    ) -> Self {
        let replaced_spans =
            StyledStringBuilder::result_objects(incoming, TextRange::new(0, incoming.len()))
                .into_iter()
                .map(|mut result| {
                    result.span_range = result.span_range.shifted_right(range.start);
                    result
                })
                .collect();
        Self {
            reason,
            range_before: range,
            range_after: TextRange::from_len(range.start, incoming.len()),
            original_spans: host.span_results(range),
            replaced_spans,
        }
    }
}

/// Payload of the about-to-delete notification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteValue {
    pub reason: ChangeReason,
    /// Range about to be removed.
    pub range: TextRange,
    /// Spans in that range.
    pub spans: Vec<ResultObject>,
}

/// The component that owns the document the manager records.
pub trait EditorHost {
    /// Current content.
    fn content(&self) -> Arc<SpanString>;

    /// Current caret or selection.
    fn selection(&self) -> TextRange;

    /// Replace `range` with `value`.
    fn replace_range(&mut self, range: TextRange, value: &SpanString);

    /// Move the caret or selection.
    fn set_selection(&mut self, range: TextRange);

    /// Overwrite the styles of `types` over `range` with those of `snapshot`.
    fn restore_styles(&mut self, range: TextRange, snapshot: &SpanString, types: SpanTypes);

    /// Describe the spans inside `range`.
    fn span_results(&self, range: TextRange) -> Vec<ResultObject> {
        StyledStringBuilder::result_objects(&self.content(), range)
    }

    /// Whether content holding builder spans may be deleted.
    fn about_to_delete(&mut self, _value: &DeleteValue) -> bool {
        true
    }

    /// Whether a change may proceed.
    fn on_will_change(&mut self, _value: &ChangeValue) -> bool {
        true
    }

    /// A change has been applied.
    fn on_did_change(&mut self, _value: &ChangeValue) {}
}

/// Run the host's veto hooks for `change`.
///
/// With `may_delete` set and builder spans inside the range being replaced,
/// the about-to-delete hook runs first. The will-change hook runs next. The
/// change may proceed only if both allow it.
pub fn check_change(host: &mut dyn EditorHost, change: &ChangeValue, may_delete: bool) -> bool {
    let range = change.range_before;
    let deletes_builder = may_delete
        && !range.is_empty()
        && host.content().has_span_in(SpanType::Builder, range);
    if deletes_builder {
        let value = DeleteValue {
            reason: change.reason,
            range,
            spans: change.original_spans.clone(),
        };
        if !host.about_to_delete(&value) {
            tracing::debug!(
                target: crate::LOG_TARGET,
                %range,
                reason = change.reason.as_str(),
                "about_to_delete vetoed"
            );
            return false;
        }
    }
    if !host.on_will_change(change) {
        tracing::debug!(
            target: crate::LOG_TARGET,
            %range,
            reason = change.reason.as_str(),
            "on_will_change vetoed"
        );
        return false;
    }
    true
}
