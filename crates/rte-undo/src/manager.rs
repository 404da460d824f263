#![forbid(unsafe_code)]

//! The undo/redo manager.
//!
//! [`UndoRedoManager`] owns the undo and redo stacks of one editor, the
//! in-flight preview record, and the batch counter. It reaches its host only
//! through a weak reference; every entry point is a no-op once the host is
//! gone.
//!
//! # Preview state machine
//!
//! ```text
//!            record_preview_inputting_start
//!   ┌──────┐ ─────────────────────────────► ┌──────┐
//!   │ Idle │                                │ Open │ ◄─┐ start while open
//!   └──────┘ ◄───┐                          └──────┘ ──┘ (coalesces)
//!                │                             │
//!                │   ┌────────────┐            │ record_preview_inputting_end
//!                └── │ Committing │ ◄──────────┘
//!                    └────────────┘
//!                  pushed, or dropped when the text did not change
//! ```
//!
//! # Invariants
//!
//! 1. Every stacked record is valid
//! 2. Neither stack holds more than `max_records` records; the oldest go first
//! 3. A fresh edit (`is_from_redo == false`) empties the redo stack
//! 4. A vetoed replay leaves both stacks and the document untouched
//!
//! # Batches
//!
//! Records pushed between [`UndoRedoManager::start_counting_record`] and
//! [`UndoRedoManager::end_counting_record`] share a batch id. With
//! [`UndoConfig::group_batches`] set, one undo or redo replays the whole
//! batch. Each record still goes through the veto hooks on its own, checked
//! against the document as it will look once the records above it are
//! replayed. Hooks all run before anything is written: one veto cancels the
//! whole batch.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use rte_text::{SpanString, SpanTypes, TextRange};

use crate::LOG_TARGET;
use crate::config::UndoConfig;
use crate::host::{ChangeReason, ChangeValue, DeleteValue, EditorHost, check_change};
use crate::record::UndoRedoRecord;
use crate::recorder::{RecordContent, RecordHalf, UndoMode, UndoRecorder};

/// Observable phase of the preview state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewPhase {
    /// No composition in progress.
    #[default]
    Idle,
    /// A composition is open; its record has a before half only.
    Open,
    /// The after half is being filled in.
    Committing,
}

#[derive(Debug, Default)]
enum PreviewState {
    #[default]
    Idle,
    Open(Box<UndoRedoRecord>),
    Committing,
}

#[derive(Debug, Clone, Copy)]
struct Counting {
    batch_id: u64,
    count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Undo,
    Redo,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    const fn reason(self) -> ChangeReason {
        match self {
            Self::Undo => ChangeReason::Undo,
            Self::Redo => ChangeReason::Redo,
        }
    }

    /// The record half whose content lands in the document.
    const fn half(self) -> RecordHalf {
        match self {
            Self::Undo => RecordHalf::Before,
            Self::Redo => RecordHalf::After,
        }
    }
}

/// A replay worked out against the current host state.
struct Replay {
    /// Document range being overwritten.
    target: TextRange,
    /// Content or style snapshot written over `target`.
    incoming: SpanString,
    change: ChangeValue,
}

impl Replay {
    fn write(&self, host: &mut dyn EditorHost, record: &UndoRedoRecord) {
        if record.is_only_style_change {
            host.restore_styles(self.target, &self.incoming, record.update_span_types);
        } else {
            host.replace_range(self.target, &self.incoming);
        }
    }
}

/// The host document with pending replays applied to a private copy.
///
/// Content edits stay local; the veto hooks go to the real host.
struct Staged<'a> {
    host: &'a mut dyn EditorHost,
    content: Arc<SpanString>,
    selection: TextRange,
}

impl<'a> Staged<'a> {
    fn new(host: &'a mut dyn EditorHost) -> Self {
        let content = host.content();
        let selection = host.selection();
        Self {
            host,
            content,
            selection,
        }
    }
}

impl EditorHost for Staged<'_> {
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
        self.selection = range;
    }

    fn restore_styles(&mut self, range: TextRange, snapshot: &SpanString, types: SpanTypes) {
        Arc::make_mut(&mut self.content).apply_styles_from(range, snapshot, types);
    }

    fn about_to_delete(&mut self, value: &DeleteValue) -> bool {
        self.host.about_to_delete(value)
    }

    fn on_will_change(&mut self, value: &ChangeValue) -> bool {
        self.host.on_will_change(value)
    }
}

/// Undo/redo stacks plus the preview and batch state of one editor.
pub struct UndoRedoManager {
    host: Weak<RefCell<dyn EditorHost>>,
    recorder: Box<dyn UndoRecorder>,
    config: UndoConfig,
    undo_records: VecDeque<UndoRedoRecord>,
    redo_records: VecDeque<UndoRedoRecord>,
    preview: PreviewState,
    counting: Option<Counting>,
    next_batch_id: u64,
}

impl fmt::Debug for UndoRedoManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoRedoManager")
            .field("mode", &self.recorder.mode())
            .field("undo_depth", &self.undo_records.len())
            .field("redo_depth", &self.redo_records.len())
            .field("preview", &self.preview_phase())
            .field("counting", &self.counting.map(|c| c.count))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UndoRedoManager {
    /// Create a manager for `host` with an explicit recorder.
    #[must_use]
    pub fn new(
        host: Weak<RefCell<dyn EditorHost>>,
        recorder: Box<dyn UndoRecorder>,
        config: UndoConfig,
    ) -> Self {
        for error in config.validate() {
            tracing::warn!(target: LOG_TARGET, %error, "invalid undo config");
        }
        Self {
            host,
            recorder,
            config,
            undo_records: VecDeque::new(),
            redo_records: VecDeque::new(),
            preview: PreviewState::Idle,
            counting: None,
            next_batch_id: 1,
        }
    }

    /// Create a manager holding a weak reference to `host`.
    #[must_use]
    pub fn attach<H: EditorHost + 'static>(
        host: &Rc<RefCell<H>>,
        mode: UndoMode,
        config: UndoConfig,
    ) -> Self {
        let weak: Weak<RefCell<H>> = Rc::downgrade(host);
        let weak: Weak<RefCell<dyn EditorHost>> = weak;
        Self::new(weak, mode.recorder(), config)
    }

    /// Manager keeping span-string snapshots.
    #[must_use]
    pub fn styled<H: EditorHost + 'static>(host: &Rc<RefCell<H>>) -> Self {
        Self::attach(host, UndoMode::StyledString, UndoConfig::default())
    }

    /// Manager keeping span creation options.
    #[must_use]
    pub fn spans<H: EditorHost + 'static>(host: &Rc<RefCell<H>>) -> Self {
        Self::attach(host, UndoMode::Spans, UndoConfig::default())
    }

    // ========================================================================
    // Capture
    // ========================================================================

    /// Capture the before half of `record` from `[start, start + length)`.
    ///
    /// Also records the current selection, to be restored on undo. Style-only
    /// captures always keep a span-string snapshot.
    pub fn update_record_before_change(
        &self,
        start: usize,
        length: usize,
        record: &mut UndoRedoRecord,
        is_only_style_change: bool,
    ) {
        let Some(host) = self.upgrade("update_record_before_change") else {
            return;
        };
        let Ok(host) = host.try_borrow() else {
            return host_busy("update_record_before_change");
        };
        let content = host.content();
        let range = TextRange::from_len(start, length).clamped(content.len());
        record.set_operation_before(range, host.selection());
        record.is_only_style_change = is_only_style_change;
        if is_only_style_change {
            record.styled_string_before = Some(Arc::new(content.substring_range(range)));
            record.options_list_before = None;
        } else {
            self.recorder
                .capture(&*host, range, RecordHalf::Before, record);
        }
    }

    /// Capture the after half of `record` from the current content.
    pub fn update_record_after_change(
        &self,
        start: usize,
        length: usize,
        record: &mut UndoRedoRecord,
    ) {
        let Some(host) = self.upgrade("update_record_after_change") else {
            return;
        };
        let Ok(host) = host.try_borrow() else {
            return host_busy("update_record_after_change");
        };
        let content = host.content();
        let range = TextRange::from_len(start, length).clamped(content.len());
        record.set_operation_after(range);
        if record.is_only_style_change {
            record.styled_string_after = Some(Arc::new(content.substring_range(range)));
            record.options_list_after = None;
        } else {
            self.recorder.capture(&*host, range, RecordHalf::After, record);
        }
    }

    /// Fill `record` for an edit that put `content` at `start`, replacing
    /// `length` characters.
    ///
    /// The before half is captured from the host unless it is already valid;
    /// the after half is taken from `content` directly.
    pub fn apply_operation_to_record(
        &self,
        start: usize,
        length: usize,
        content: impl Into<RecordContent>,
        record: &mut UndoRedoRecord,
    ) {
        let content = content.into();
        if !record.is_before_state_valid() {
            self.update_record_before_change(start, length, record, false);
            if !record.is_before_state_valid() {
                return;
            }
        }
        record.set_operation_after(TextRange::from_len(start, content.len()));
        self.recorder.set_after_content(&content, record);
    }

    // ========================================================================
    // Preview
    // ========================================================================

    /// Open a preview record over `[start, start + length)`.
    ///
    /// While a preview is open further calls do nothing, so a whole
    /// composition keeps the before half captured by the first call.
    pub fn record_preview_inputting_start(&mut self, start: usize, length: usize) {
        if let PreviewState::Open(record) = &self.preview {
            tracing::trace!(
                target: LOG_TARGET,
                range = ?record.range_before,
                "preview already open, coalescing"
            );
            return;
        }
        let mut record = UndoRedoRecord::new();
        self.update_record_before_change(start, length, &mut record, false);
        if !record.is_before_state_valid() {
            return;
        }
        tracing::debug!(target: LOG_TARGET, range = ?record.range_before, "preview opened");
        self.preview = PreviewState::Open(Box::new(record));
    }

    /// Close the open preview using the after half described by `candidate`.
    ///
    /// Missing after content is captured from the host. Returns `true` when a
    /// record was pushed and `false` when there was no open preview or the
    /// composition left the text unchanged.
    pub fn record_preview_inputting_end(&mut self, candidate: UndoRedoRecord) -> bool {
        let mut record = match std::mem::replace(&mut self.preview, PreviewState::Committing) {
            PreviewState::Open(record) => record,
            other => {
                self.preview = other;
                tracing::debug!(target: LOG_TARGET, "preview end without open preview");
                return false;
            }
        };
        let keep = self.commit_preview(&mut record, candidate);
        self.preview = PreviewState::Idle;
        if !keep {
            return false;
        }
        tracing::debug!(
            target: LOG_TARGET,
            before = %record.string_before(),
            after = %record.string_after(),
            "preview committed"
        );
        self.record_operation(*record, false)
    }

    fn commit_preview(&self, record: &mut UndoRedoRecord, candidate: UndoRedoRecord) -> bool {
        let Some(range_after) = candidate.range_after else {
            tracing::debug!(target: LOG_TARGET, "preview candidate has no after range, dropped");
            return false;
        };
        if candidate.styled_string_after.is_some() || candidate.options_list_after.is_some() {
            record.set_operation_after(range_after);
            record.styled_string_after = candidate.styled_string_after;
            record.options_list_after = candidate.options_list_after;
        } else {
            self.update_record_after_change(range_after.start, range_after.len(), record);
        }
        if record.is_text_noop() {
            tracing::debug!(target: LOG_TARGET, "preview left the text unchanged, dropped");
            return false;
        }
        true
    }

    // ========================================================================
    // Stacks
    // ========================================================================

    /// Push `record` onto the undo stack.
    ///
    /// Invalid records are refused. A fresh edit (`is_from_redo == false`)
    /// clears the redo stack and is counted into an open batch.
    pub fn record_operation(&mut self, mut record: UndoRedoRecord, is_from_redo: bool) -> bool {
        if !record.is_valid() {
            tracing::warn!(
                target: LOG_TARGET,
                range_before = ?record.range_before,
                range_after = ?record.range_after,
                "refusing invalid record"
            );
            return false;
        }
        if !is_from_redo {
            if !self.redo_records.is_empty() {
                tracing::debug!(
                    target: LOG_TARGET,
                    dropped = self.redo_records.len(),
                    "new edit clears redo history"
                );
                self.redo_records.clear();
            }
            record.batch_id = None;
            if let Some(counting) = self.counting.as_mut() {
                counting.count += 1;
                if self.config.group_batches {
                    record.batch_id = Some(counting.batch_id);
                }
            }
        }
        let batch = record.batch_id;
        self.undo_records.push_back(record);
        enforce_limit(&mut self.undo_records, self.config.max_records, "undo");
        tracing::debug!(
            target: LOG_TARGET,
            depth = self.undo_records.len(),
            is_from_redo,
            batch = ?batch,
            "record pushed"
        );
        true
    }

    /// Push a pure insertion.
    ///
    /// The before range must be a caret (empty range) and the after content
    /// must be present.
    pub fn record_insert_operation(&mut self, record: UndoRedoRecord) -> bool {
        let at_caret = record.range_before.is_some_and(|range| range.is_empty());
        let has_content =
            record.styled_string_after.is_some() || record.options_list_after.is_some();
        if !at_caret || !has_content {
            tracing::warn!(
                target: LOG_TARGET,
                range_before = ?record.range_before,
                has_content,
                "refusing insert record"
            );
            return false;
        }
        self.record_operation(record, false)
    }

    /// Drop every record on both stacks and any open preview.
    pub fn clear_undo_redo_records(&mut self) {
        tracing::debug!(
            target: LOG_TARGET,
            undo = self.undo_records.len(),
            redo = self.redo_records.len(),
            "history cleared"
        );
        self.undo_records.clear();
        self.redo_records.clear();
        self.preview = PreviewState::Idle;
    }

    // ========================================================================
    // Batches
    // ========================================================================

    /// Open a batch. Does nothing if one is already open.
    pub fn start_counting_record(&mut self) {
        if self.counting.is_some() {
            tracing::trace!(target: LOG_TARGET, "batch already open");
            return;
        }
        let batch_id = self.next_batch_id;
        self.next_batch_id += 1;
        self.counting = Some(Counting { batch_id, count: 0 });
        tracing::debug!(target: LOG_TARGET, batch_id, "batch opened");
    }

    /// Count one more record into the open batch.
    ///
    /// `record_operation` already counts every fresh record it pushes.
    pub fn count_record(&mut self) {
        if let Some(counting) = self.counting.as_mut() {
            counting.count += 1;
        }
    }

    /// Close the batch and return how many records it counted.
    pub fn end_counting_record(&mut self) -> usize {
        let Some(counting) = self.counting.take() else {
            return 0;
        };
        tracing::debug!(
            target: LOG_TARGET,
            batch_id = counting.batch_id,
            count = counting.count,
            "batch closed"
        );
        counting.count
    }

    // ========================================================================
    // Replay
    // ========================================================================

    /// Undo the most recent record, or the most recent batch.
    ///
    /// Returns `false` when there is nothing to undo, the host is gone, or the
    /// host vetoed any record of the batch. A vetoed batch is not replayed at
    /// all.
    pub fn handle_on_undo_action(&mut self) -> bool {
        self.replay_top(Direction::Undo)
    }

    /// Redo the most recently undone record, or batch.
    pub fn handle_on_redo_action(&mut self) -> bool {
        self.replay_top(Direction::Redo)
    }

    /// Run the host's veto hooks for replaying `record`.
    ///
    /// The about-to-delete hook runs first, and only when the range being
    /// overwritten holds builder spans. The will-change hook runs next with
    /// reason `Undo` or `Redo`. Both must allow the change.
    pub fn before_change_by_record(&self, record: &UndoRedoRecord, is_undo: bool) -> bool {
        let direction = if is_undo { Direction::Undo } else { Direction::Redo };
        let Some(host) = self.upgrade("before_change_by_record") else {
            return false;
        };
        let Ok(mut host) = host.try_borrow_mut() else {
            host_busy("before_change_by_record");
            return false;
        };
        match self.prepare(&*host, record, direction) {
            Some(replay) => check_change(&mut *host, &replay.change, !record.is_only_style_change),
            None => false,
        }
    }

    fn replay_top(&mut self, direction: Direction) -> bool {
        let Some(host) = self.upgrade(direction.as_str()) else {
            return false;
        };
        if let PreviewState::Open(_) = self.preview {
            tracing::debug!(target: LOG_TARGET, "discarding open preview before replay");
            self.preview = PreviewState::Idle;
        }
        let Some(top) = self.stack(direction).back() else {
            tracing::debug!(target: LOG_TARGET, direction = direction.as_str(), "nothing to replay");
            return false;
        };
        let batch = top.batch_id.filter(|_| self.config.group_batches);
        let _span = tracing::debug_span!(
            "undo.replay",
            direction = direction.as_str(),
            batch = ?batch,
        )
        .entered();

        let depth = self.batch_depth(direction, batch);
        if !self.check_batch(&host, direction, depth) {
            tracing::debug!(
                target: LOG_TARGET,
                direction = direction.as_str(),
                depth,
                "replay vetoed"
            );
            return false;
        }

        let mut replayed = 0usize;
        while replayed < depth {
            let Some(record) = self.stack_mut(direction).pop_back() else {
                break;
            };
            if !self.replay(&host, &record, direction) {
                self.stack_mut(direction).push_back(record);
                break;
            }
            replayed += 1;
            match direction {
                Direction::Undo => {
                    self.redo_records.push_back(record);
                    enforce_limit(&mut self.redo_records, self.config.max_records, "redo");
                }
                Direction::Redo => {
                    self.record_operation(record, true);
                }
            }
        }
        tracing::debug!(
            target: LOG_TARGET,
            direction = direction.as_str(),
            replayed,
            undo_depth = self.undo_records.len(),
            redo_depth = self.redo_records.len(),
            "replay finished"
        );
        replayed > 0
    }

    /// Number of records on top of the stack replayed by one action.
    fn batch_depth(&self, direction: Direction, batch: Option<u64>) -> usize {
        let stack = self.stack(direction);
        if batch.is_none() {
            return usize::from(!stack.is_empty());
        }
        stack
            .iter()
            .rev()
            .take_while(|record| record.batch_id == batch)
            .count()
    }

    /// Run the veto hooks for the top `depth` records, in replay order.
    ///
    /// Each record is checked against a staged copy of the document with the
    /// records above it already applied. The host document is not modified.
    fn check_batch(
        &self,
        host: &Rc<RefCell<dyn EditorHost>>,
        direction: Direction,
        depth: usize,
    ) -> bool {
        let Ok(mut host) = host.try_borrow_mut() else {
            host_busy(direction.as_str());
            return false;
        };
        let mut staged = Staged::new(&mut *host);
        for (i, record) in self.stack(direction).iter().rev().take(depth).enumerate() {
            let Some(replay) = self.prepare(&staged, record, direction) else {
                return false;
            };
            if !check_change(&mut staged, &replay.change, !record.is_only_style_change) {
                return false;
            }
            if i + 1 < depth {
                replay.write(&mut staged, record);
            }
        }
        true
    }

    /// Write one already checked record into the host.
    fn replay(
        &self,
        host: &Rc<RefCell<dyn EditorHost>>,
        record: &UndoRedoRecord,
        direction: Direction,
    ) -> bool {
        let Ok(mut host) = host.try_borrow_mut() else {
            host_busy(direction.as_str());
            return false;
        };
        let Some(replay) = self.prepare(&*host, record, direction) else {
            return false;
        };
        replay.write(&mut *host, record);
        let selection = match direction {
            Direction::Undo => record
                .selection_before
                .unwrap_or(TextRange::collapsed(replay.change.range_after.end)),
            Direction::Redo => TextRange::collapsed(replay.change.range_after.end),
        };
        host.set_selection(selection);
        tracing::debug!(
            target: LOG_TARGET,
            direction = direction.as_str(),
            from = %replay.change.range_before,
            to = %replay.change.range_after,
            style_only = record.is_only_style_change,
            "record replayed"
        );
        host.on_did_change(&replay.change);
        true
    }

    fn prepare(
        &self,
        host: &dyn EditorHost,
        record: &UndoRedoRecord,
        direction: Direction,
    ) -> Option<Replay> {
        let target = match direction {
            Direction::Undo => record.range_after,
            Direction::Redo => record.range_before,
        };
        let Some(target) = target else {
            tracing::warn!(target: LOG_TARGET, "record has no range to replace");
            return None;
        };
        let half = direction.half();
        let incoming = if record.is_only_style_change {
            let snapshot = match half {
                RecordHalf::Before => record.styled_string_before.as_deref(),
                RecordHalf::After => record.styled_string_after.as_deref(),
            };
            snapshot.cloned().unwrap_or_default()
        } else {
            self.recorder.replay_content(record, half)
        };
        let change = ChangeValue::describe(direction.reason(), host, target, &incoming);
        Some(Replay {
            target,
            incoming,
            change,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_records.is_empty()
    }

    /// Whether there is anything to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_records.is_empty()
    }

    /// Records on the undo stack.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_records.len()
    }

    /// Records on the redo stack.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_records.len()
    }

    /// The undo stack, oldest first.
    #[must_use]
    pub fn undo_records(&self) -> &VecDeque<UndoRedoRecord> {
        &self.undo_records
    }

    /// The redo stack, oldest first.
    #[must_use]
    pub fn redo_records(&self) -> &VecDeque<UndoRedoRecord> {
        &self.redo_records
    }

    /// Current phase of the preview state machine.
    #[must_use]
    pub fn preview_phase(&self) -> PreviewPhase {
        match self.preview {
            PreviewState::Idle => PreviewPhase::Idle,
            PreviewState::Open(_) => PreviewPhase::Open,
            PreviewState::Committing => PreviewPhase::Committing,
        }
    }

    /// The open preview record, if any.
    #[must_use]
    pub fn preview_record(&self) -> Option<&UndoRedoRecord> {
        match &self.preview {
            PreviewState::Open(record) => Some(record.as_ref()),
            _ => None,
        }
    }

    /// Whether a preview is open.
    #[must_use]
    pub fn is_previewing(&self) -> bool {
        matches!(self.preview, PreviewState::Open(_))
    }

    /// Whether a batch is open.
    #[must_use]
    pub fn is_counting(&self) -> bool {
        self.counting.is_some()
    }

    /// The capture mode.
    #[must_use]
    pub fn mode(&self) -> UndoMode {
        self.recorder.mode()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &UndoConfig {
        &self.config
    }

    /// Whether the host is still alive.
    #[must_use]
    pub fn has_host(&self) -> bool {
        self.host.strong_count() > 0
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn upgrade(&self, op: &'static str) -> Option<Rc<RefCell<dyn EditorHost>>> {
        let host = self.host.upgrade();
        if host.is_none() {
            tracing::warn!(target: LOG_TARGET, op, "host dropped, ignoring call");
        }
        host
    }

    fn stack(&self, direction: Direction) -> &VecDeque<UndoRedoRecord> {
        match direction {
            Direction::Undo => &self.undo_records,
            Direction::Redo => &self.redo_records,
        }
    }

    fn stack_mut(&mut self, direction: Direction) -> &mut VecDeque<UndoRedoRecord> {
        match direction {
            Direction::Undo => &mut self.undo_records,
            Direction::Redo => &mut self.redo_records,
        }
    }
}

fn host_busy(op: &'static str) {
    tracing::warn!(target: LOG_TARGET, op, "host already borrowed, ignoring call");
}

fn enforce_limit(stack: &mut VecDeque<UndoRedoRecord>, max_records: usize, name: &'static str) {
    let max_records = max_records.max(1);
    while stack.len() > max_records {
        stack.pop_front();
        tracing::debug!(target: LOG_TARGET, stack = name, max_records, "evicted oldest record");
    }
}
