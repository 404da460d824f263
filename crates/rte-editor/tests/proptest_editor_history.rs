#![forbid(unsafe_code)]

//! Property tests for editor history.
//!
//! Verifies, over random inputs:
//! 1. A drop moves exactly the dragged text to the shifted destination
//! 2. Undoing both drag records restores the original content
//! 3. Undoing a random edit session walks back to the initial content
//! 4. Redoing everything reproduces the final content
//! 5. Both hold when the session adds images, symbols and builders and then
//!    edits ranges that cut through them
//!
//! Run:
//!   cargo test -p rte-editor --test proptest_editor_history

use proptest::prelude::*;

use rte_editor::RichEditor;
use rte_text::{BuilderAttr, FontStyle, ImageAttr, SpanString, SymbolAttr, TextRange, TextStyle};
use rte_undo::{
    BuilderSpanOptions, ImageSpanOptions, SymbolSpanOptions, UndoConfig, UndoMode,
};

fn mode_strategy() -> impl Strategy<Value = UndoMode> {
    prop_oneof![Just(UndoMode::StyledString), Just(UndoMode::Spans)]
}

/// A document with a bold run, so drags carry spans.
fn document(text: &str) -> SpanString {
    let mut value = SpanString::new(text);
    let len = value.len();
    value.add_span(rte_text::Span::new(
        TextRange::new(len / 3, len / 2),
        rte_text::SpanKind::Font(FontStyle::bold()),
    ));
    value
}

/// `document(text)` with a symbol placeholder at `at`.
fn document_with_symbol(text: &str, at: usize) -> SpanString {
    let mut value = document(text);
    let at = at % (value.len() + 1);
    value.insert_at(at, &SpanString::symbol(SymbolAttr::new(1)));
    value
}

#[derive(Debug, Clone)]
enum Intent {
    Insert(usize, String),
    DeleteBackward(usize, usize),
    DeleteForward(usize, usize),
    Bold(usize, usize),
    Image(usize),
    Symbol(usize),
    Builder(usize, usize),
    /// Delete an arbitrary range, cutting placeholders where it lands.
    DeleteRange(usize, usize),
}

fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop_oneof![
        (0usize..40, "[a-z你好]{1,4}").prop_map(|(pos, s)| Intent::Insert(pos, s)),
        (0usize..40, 1usize..4).prop_map(|(pos, n)| Intent::DeleteBackward(pos, n)),
        (0usize..40, 1usize..4).prop_map(|(pos, n)| Intent::DeleteForward(pos, n)),
        (0usize..40, 1usize..6).prop_map(|(pos, n)| Intent::Bold(pos, n)),
        (0usize..40).prop_map(Intent::Image),
        (0usize..40).prop_map(Intent::Symbol),
        (0usize..40, 1usize..4).prop_map(|(pos, width)| Intent::Builder(pos, width)),
        (0usize..40, 1usize..6).prop_map(|(pos, n)| Intent::DeleteRange(pos, n)),
    ]
}

/// Apply `intent`; `id` keeps every placeholder added by a session distinct.
fn run(editor: &mut RichEditor, id: usize, intent: &Intent) -> bool {
    let len = editor.len();
    match intent {
        Intent::Insert(pos, text) => {
            editor.set_caret_position(pos % (len + 1));
            editor.insert_value(text)
        }
        Intent::DeleteBackward(pos, n) => {
            editor.set_caret_position(pos % (len + 1));
            editor.delete_backward(*n)
        }
        Intent::DeleteForward(pos, n) => {
            editor.set_caret_position(pos % (len + 1));
            editor.delete_forward(*n)
        }
        Intent::Bold(pos, n) => {
            let start = pos % (len + 1);
            let style = TextStyle {
                font: Some(FontStyle::bold()),
                ..TextStyle::default()
            };
            editor.update_span_style(TextRange::from_len(start, *n), &style)
        }
        Intent::Image(pos) => editor
            .add_image_span(ImageSpanOptions {
                offset: Some(pos % (len + 1)),
                image: ImageAttr::new(format!("img-{id}.png")),
                style: TextStyle::default(),
                paragraph_style: None,
            })
            .is_some(),
        Intent::Symbol(pos) => editor
            .add_symbol_span(SymbolSpanOptions {
                offset: Some(pos % (len + 1)),
                symbol: SymbolAttr::new(id as u32),
                style: TextStyle::default(),
                paragraph_style: None,
            })
            .is_some(),
        Intent::Builder(pos, width) => editor
            .add_builder_span(BuilderSpanOptions {
                offset: Some(pos % (len + 1)),
                builder: BuilderAttr::new(id as u64).with_placeholder_len(*width),
                style: TextStyle::default(),
                paragraph_style: None,
            })
            .is_some(),
        Intent::DeleteRange(pos, n) => {
            let start = pos % (len + 1);
            editor.delete_spans(TextRange::from_len(start, *n))
        }
    }
}

proptest! {
    #[test]
    fn drop_moves_text_and_undo_restores(
        text in "[a-z]{2,16}",
        symbol_at in 0usize..17,
        a in 0usize..19,
        b in 0usize..19,
        dest in 0usize..19,
        mode in mode_strategy(),
    ) {
        let original = document_with_symbol(&text, symbol_at);
        let text = original.string().to_string();
        let len = original.len();
        let (start, end) = (a.min(b) % (len + 1), a.max(b) % (len + 1));
        prop_assume!(start < end);
        let dest = dest % (len + 1);
        prop_assume!(dest < start || dest > end);

        let mut editor = RichEditor::new(mode);
        editor.set_styled_string(original.clone());
        editor.set_drag_range(TextRange::new(start, end));
        prop_assert!(editor.handle_on_drag_drop_styled_string(dest));

        let moved: String = text.chars().skip(start).take(end - start).collect();
        let mut rest: Vec<char> = text.chars().collect();
        rest.drain(start..end);
        let insert_at = if dest > end { dest - (end - start) } else { dest };
        let mut expected: String = rest[..insert_at].iter().collect();
        expected.push_str(&moved);
        expected.extend(&rest[insert_at..]);
        prop_assert_eq!(editor.text(), expected);
        prop_assert_eq!(editor.selection(), TextRange::from_len(insert_at, end - start));
        prop_assert_eq!(editor.undo_manager().undo_depth(), 2);

        prop_assert!(editor.handle_on_undo_action());
        prop_assert!(editor.handle_on_undo_action());
        prop_assert_eq!(editor.text(), text);
        if mode == UndoMode::StyledString {
            prop_assert_eq!(&*editor.content(), &original);
        }
    }

    #[test]
    fn session_undoes_to_start_and_redoes_to_end(
        text in "[a-z]{0,12}",
        intents in proptest::collection::vec(intent_strategy(), 1..12),
        mode in mode_strategy(),
    ) {
        let mut editor = RichEditor::with_config(mode, UndoConfig::unlimited());
        editor.set_styled_string(document(&text));
        let initial = editor.content();

        let mut applied = 0usize;
        for (id, intent) in intents.iter().enumerate() {
            if run(&mut editor, id, intent) {
                applied += 1;
            }
        }
        let last = editor.content();
        prop_assert_eq!(editor.undo_manager().undo_depth(), applied);

        for _ in 0..applied {
            prop_assert!(editor.handle_on_undo_action());
        }
        prop_assert!(!editor.can_undo());
        prop_assert_eq!(editor.text(), initial.string());

        for _ in 0..applied {
            prop_assert!(editor.handle_on_redo_action());
        }
        prop_assert_eq!(editor.text(), last.string());
        if mode == UndoMode::StyledString {
            prop_assert_eq!(&*editor.content(), &*last);
        }
    }
}
