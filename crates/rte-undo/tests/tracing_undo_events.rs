#![forbid(unsafe_code)]

//! Log output of the undo manager.
//!
//! Verify the events and spans emitted under the `rte.undo` target: pushes,
//! replays inside an `undo.replay` span, refused records and dead hosts.
//!
//! Run:
//!   cargo test -p rte-undo --test tracing_undo_events

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

use rte_text::{SpanString, SpanTypes, TextRange};
use rte_undo::{EditorHost, LOG_TARGET, UndoRedoManager, UndoRedoRecord};

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    fields: HashMap<String, String>,
    parent_span_name: Option<String>,
}

struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn messages_at(&self, level: tracing::Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level && e.target == LOG_TARGET)
            .map(|e| e.message)
            .collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let message = visitor
            .0
            .iter()
            .find(|(k, _)| k == "message")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message,
            fields: visitor.0.into_iter().collect(),
            parent_span_name,
        });
    }
}

fn with_captured_tracing<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCapture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

// ============================================================================
// Host
// ============================================================================

#[derive(Default)]
struct Host {
    content: Arc<SpanString>,
    selection: TextRange,
}

impl EditorHost for Host {
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
}

fn insert(host: &Rc<RefCell<Host>>, manager: &mut UndoRedoManager, pos: usize, text: &str) {
    let value = SpanString::new(text);
    host.borrow_mut().replace_range(TextRange::collapsed(pos), &value);
    manager.record_insert_operation(UndoRedoRecord::insertion(pos, value));
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn push_and_replay_are_logged() {
    let handle = with_captured_tracing(|| {
        let host = Rc::new(RefCell::new(Host::default()));
        let mut manager = UndoRedoManager::styled(&host);
        insert(&host, &mut manager, 0, "hello");
        manager.handle_on_undo_action();
        manager.handle_on_redo_action();
    });

    let debug = handle.messages_at(tracing::Level::DEBUG);
    assert!(debug.iter().any(|m| m == "record pushed"), "events: {debug:?}");
    assert!(debug.iter().any(|m| m == "record replayed"));

    let replay_spans: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name == "undo.replay")
        .collect();
    assert_eq!(replay_spans.len(), 2);
    assert_eq!(replay_spans[0].fields.get("direction").map(String::as_str), Some("undo"));
    assert_eq!(replay_spans[1].fields.get("direction").map(String::as_str), Some("redo"));

    let replayed: Vec<_> = handle
        .events()
        .into_iter()
        .filter(|e| e.message == "record replayed")
        .collect();
    assert!(
        replayed
            .iter()
            .all(|e| e.parent_span_name.as_deref() == Some("undo.replay"))
    );
}

#[test]
fn refused_record_warns() {
    let handle = with_captured_tracing(|| {
        let host = Rc::new(RefCell::new(Host::default()));
        let mut manager = UndoRedoManager::styled(&host);
        assert!(!manager.record_operation(UndoRedoRecord::new(), false));
    });
    let warnings = handle.messages_at(tracing::Level::WARN);
    assert_eq!(warnings, vec!["refusing invalid record".to_string()]);
}

#[test]
fn dead_host_warns_with_operation() {
    let handle = with_captured_tracing(|| {
        let host = Rc::new(RefCell::new(Host::default()));
        let mut manager = UndoRedoManager::styled(&host);
        drop(host);
        assert!(!manager.handle_on_undo_action());
    });
    let events = handle.events();
    let dead: Vec<_> = events
        .iter()
        .filter(|e| e.message == "host dropped, ignoring call")
        .collect();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].level, tracing::Level::WARN);
    assert_eq!(dead[0].fields.get("op").map(String::as_str), Some("undo"));
}

#[test]
fn eviction_is_logged() {
    let handle = with_captured_tracing(|| {
        let host = Rc::new(RefCell::new(Host::default()));
        let mut manager = UndoRedoManager::attach(
            &host,
            rte_undo::UndoMode::StyledString,
            rte_undo::UndoConfig::default().with_max_records(2),
        );
        for i in 0..3 {
            insert(&host, &mut manager, i, "x");
        }
    });
    let evictions = handle
        .events()
        .into_iter()
        .filter(|e| e.message == "evicted oldest record")
        .count();
    assert_eq!(evictions, 1);
}

#[test]
fn silent_without_subscriber() {
    // No subscriber installed: logging must not affect behavior.
    let host = Rc::new(RefCell::new(Host::default()));
    let mut manager = UndoRedoManager::styled(&host);
    insert(&host, &mut manager, 0, "ok");
    assert!(manager.handle_on_undo_action());
    assert_eq!(host.borrow().content.string(), "");
}
