#![forbid(unsafe_code)]

//! Capture strategies.
//!
//! An [`UndoRecorder`] decides how the halves of a record are stored and how
//! they turn back into content on replay:
//!
//! - [`StyledStringRecorder`] keeps span-string snapshots
//! - [`SpansRecorder`] keeps span creation options and rebuilds content from
//!   them with [`StyledStringBuilder`]
//!
//! Style-only records are handled by the manager and always keep span-string
//! snapshots, whichever recorder is in use.

use std::sync::Arc;

use rte_text::{SpanString, TextRange};

use crate::builder::StyledStringBuilder;
use crate::host::EditorHost;
use crate::options::{SpanOptions, TextSpanOptions};
use crate::record::UndoRedoRecord;

/// Which capture strategy a manager uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UndoMode {
    /// Span-string snapshots.
    #[default]
    StyledString,
    /// Span creation options.
    Spans,
}

impl UndoMode {
    /// The recorder implementing this mode.
    #[must_use]
    pub fn recorder(self) -> Box<dyn UndoRecorder> {
        match self {
            Self::StyledString => Box::new(StyledStringRecorder),
            Self::Spans => Box::new(SpansRecorder),
        }
    }

    /// Stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StyledString => "styled_string",
            Self::Spans => "spans",
        }
    }
}

/// One half of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordHalf {
    /// Content replaced by the edit; written back on undo.
    Before,
    /// Content the edit put in place; written back on redo.
    After,
}

/// Content handed to `apply_operation_to_record`.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordContent {
    /// Plain text without spans.
    Text(String),
    /// Text with its spans.
    Styled(Arc<SpanString>),
}

impl RecordContent {
    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Styled(value) => value.len(),
        }
    }

    /// Whether the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The content as a shared span string.
    #[must_use]
    pub fn to_span_string(&self) -> Arc<SpanString> {
        match self {
            Self::Text(text) => Arc::new(SpanString::new(text.clone())),
            Self::Styled(value) => Arc::clone(value),
        }
    }
}

impl From<&str> for RecordContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RecordContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<SpanString> for RecordContent {
    fn from(value: SpanString) -> Self {
        Self::Styled(Arc::new(value))
    }
}

impl From<Arc<SpanString>> for RecordContent {
    fn from(value: Arc<SpanString>) -> Self {
        Self::Styled(value)
    }
}

/// How record halves are captured and replayed.
pub trait UndoRecorder {
    /// The mode this recorder implements.
    fn mode(&self) -> UndoMode;

    /// Store the host content of `range` as one half of `record`.
    fn capture(
        &self,
        host: &dyn EditorHost,
        range: TextRange,
        half: RecordHalf,
        record: &mut UndoRedoRecord,
    );

    /// Store explicit content as the after half of `record`.
    fn set_after_content(&self, content: &RecordContent, record: &mut UndoRedoRecord);

    /// Content to put into the document when replaying `half`.
    fn replay_content(&self, record: &UndoRedoRecord, half: RecordHalf) -> SpanString;
}

/// Keeps span-string snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledStringRecorder;

impl UndoRecorder for StyledStringRecorder {
    fn mode(&self) -> UndoMode {
        UndoMode::StyledString
    }

    fn capture(
        &self,
        host: &dyn EditorHost,
        range: TextRange,
        half: RecordHalf,
        record: &mut UndoRedoRecord,
    ) {
        let snapshot = Arc::new(host.content().substring_range(range));
        tracing::trace!(
            target: crate::LOG_TARGET,
            ?half,
            %range,
            text = snapshot.string(),
            "captured styled string"
        );
        match half {
            RecordHalf::Before => {
                record.styled_string_before = Some(snapshot);
                record.options_list_before = None;
            }
            RecordHalf::After => {
                record.styled_string_after = Some(snapshot);
                record.options_list_after = None;
            }
        }
    }

    fn set_after_content(&self, content: &RecordContent, record: &mut UndoRedoRecord) {
        record.styled_string_after = Some(content.to_span_string());
        record.options_list_after = None;
    }

    fn replay_content(&self, record: &UndoRedoRecord, half: RecordHalf) -> SpanString {
        let (styled, options) = halves(record, half);
        match (styled, options) {
            (Some(value), _) => value.as_ref().clone(),
            (None, Some(list)) => {
                StyledStringBuilder::build_styled_string(list, record.restore_builder_span)
            }
            (None, None) => SpanString::empty(),
        }
    }
}

/// Keeps span creation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpansRecorder;

impl UndoRecorder for SpansRecorder {
    fn mode(&self) -> UndoMode {
        UndoMode::Spans
    }

    fn capture(
        &self,
        host: &dyn EditorHost,
        range: TextRange,
        half: RecordHalf,
        record: &mut UndoRedoRecord,
    ) {
        let list = StyledStringBuilder::create_options_list(&host.span_results(range));
        tracing::trace!(
            target: crate::LOG_TARGET,
            ?half,
            %range,
            options = list.len(),
            "captured span options"
        );
        match half {
            RecordHalf::Before => {
                record.options_list_before = Some(list);
                record.styled_string_before = None;
            }
            RecordHalf::After => {
                record.options_list_after = Some(list);
                record.styled_string_after = None;
            }
        }
    }

    fn set_after_content(&self, content: &RecordContent, record: &mut UndoRedoRecord) {
        let list = match content {
            RecordContent::Text(text) if text.is_empty() => Vec::new(),
            RecordContent::Text(text) => vec![SpanOptions::Text(TextSpanOptions::new(text.clone()))],
            RecordContent::Styled(value) => StyledStringBuilder::options_list_from(value),
        };
        record.options_list_after = Some(list);
        record.styled_string_after = None;
    }

    fn replay_content(&self, record: &UndoRedoRecord, half: RecordHalf) -> SpanString {
        let (styled, options) = halves(record, half);
        match (options, styled) {
            (Some(list), _) => {
                StyledStringBuilder::build_styled_string(list, record.restore_builder_span)
            }
            (None, Some(value)) => value.as_ref().clone(),
            (None, None) => SpanString::empty(),
        }
    }
}

fn halves(
    record: &UndoRedoRecord,
    half: RecordHalf,
) -> (Option<&Arc<SpanString>>, Option<&Vec<SpanOptions>>) {
    match half {
        RecordHalf::Before => (
            record.styled_string_before.as_ref(),
            record.options_list_before.as_ref(),
        ),
        RecordHalf::After => (
            record.styled_string_after.as_ref(),
            record.options_list_after.as_ref(),
        ),
    }
}
