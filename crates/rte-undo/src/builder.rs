#![forbid(unsafe_code)]

//! Translation between span descriptions and span creation options.
//!
//! A host describes the spans of a range as [`ResultObject`]s. The
//! [`StyledStringBuilder`] turns those into [`SpanOptions`] for storage in a
//! record, and turns an options list back into a [`SpanString`] on replay.
//!
//! Unrecognized descriptions never fail: they become an empty text option so
//! one malformed span cannot abort reconstruction of a whole record.

use rte_text::{
    BuilderAttr, ImageAttr, ParagraphStyle, SpanKind, SpanString, SymbolAttr, TextRange, TextStyle,
};

use crate::options::{
    BuilderSpanOptions, ImageSpanOptions, OptionsList, SpanOptions, SymbolSpanOptions,
    TextSpanOptions,
};
use crate::record::UndoRedoRecord;

/// Type tag of a described span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectSpanType {
    Text,
    Image,
    Symbol,
    Builder,
    /// Unrecognized or missing tag.
    #[default]
    Invalid,
}

/// Description of one span inside an enumerated range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultObject {
    pub span_type: SelectSpanType,
    /// Range of the span in the enumerated content.
    pub span_range: TextRange,
    /// Text of the span (placeholders for content spans).
    pub value: String,
    pub style: TextStyle,
    pub paragraph_style: Option<ParagraphStyle>,
    pub image: Option<ImageAttr>,
    pub symbol: Option<SymbolAttr>,
    pub builder: Option<BuilderAttr>,
}

/// Builds span options from span descriptions and back.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledStringBuilder;

impl StyledStringBuilder {
    /// Describe every span of `content` inside `range`.
    ///
    /// A content span narrower than its placeholder, because `range` cuts it
    /// or an earlier edit clipped it, is described as text of the covered
    /// placeholder characters. Replaying the description then restores
    /// exactly the covered width.
    #[must_use]
    pub fn result_objects(content: &SpanString, range: TextRange) -> Vec<ResultObject> {
        content
            .segments(range)
            .into_iter()
            .map(|segment| {
                let width = segment.range.len();
                let kind = segment
                    .content
                    .filter(|kind| kind.placeholder_len() == Some(width));
                let mut result = ResultObject {
                    span_type: SelectSpanType::Text,
                    span_range: segment.range,
                    value: segment.text,
                    style: segment.style,
                    paragraph_style: segment.paragraph,
                    ..ResultObject::default()
                };
                match kind {
                    Some(SpanKind::Image(attr)) => {
                        result.span_type = SelectSpanType::Image;
                        result.image = Some(attr);
                    }
                    Some(SpanKind::Symbol(attr)) => {
                        result.span_type = SelectSpanType::Symbol;
                        result.symbol = Some(attr);
                    }
                    Some(SpanKind::Builder(attr)) => {
                        result.span_type = SelectSpanType::Builder;
                        result.builder = Some(attr);
                    }
                    _ => {}
                }
                result
            })
            .collect()
    }

    /// Create the options recreating one described span.
    #[must_use]
    pub fn create_options(result: &ResultObject) -> SpanOptions {
        let offset = Some(result.span_range.start);
        let style = result.style.clone();
        let paragraph_style = result.paragraph_style.clone();
        match result.span_type {
            SelectSpanType::Text => SpanOptions::Text(TextSpanOptions {
                offset,
                value: result.value.clone(),
                style,
                paragraph_style,
            }),
            SelectSpanType::Image => SpanOptions::Image(ImageSpanOptions {
                offset,
                image: result.image.clone().unwrap_or_default(),
                style,
                paragraph_style,
            }),
            SelectSpanType::Symbol => SpanOptions::Symbol(SymbolSpanOptions {
                offset,
                symbol: result.symbol.clone().unwrap_or_default(),
                style,
                paragraph_style,
            }),
            SelectSpanType::Builder => SpanOptions::Builder(BuilderSpanOptions {
                offset,
                builder: result.builder.unwrap_or_else(|| {
                    BuilderAttr::new(0).with_placeholder_len(result.value.chars().count())
                }),
                style,
                paragraph_style,
            }),
            SelectSpanType::Invalid => {
                tracing::debug!(
                    target: crate::LOG_TARGET,
                    range = %result.span_range,
                    "unrecognized span type, using empty text options"
                );
                SpanOptions::Text(TextSpanOptions::default())
            }
        }
    }

    /// Create options for every described span, in order.
    #[must_use]
    pub fn create_options_list(results: &[ResultObject]) -> OptionsList {
        results.iter().map(Self::create_options).collect()
    }

    /// Options list for a whole span string.
    #[must_use]
    pub fn options_list_from(content: &SpanString) -> OptionsList {
        let results = Self::result_objects(content, TextRange::new(0, content.len()));
        Self::create_options_list(&results)
    }

    /// Materialize an options list as one span string.
    #[must_use]
    pub fn build_styled_string(list: &[SpanOptions], restore_builder_span: bool) -> SpanString {
        let mut value = SpanString::empty();
        for option in list {
            value.append(&option.to_styled_string(restore_builder_span));
        }
        value
    }

    /// Collapse immediately repeated builder entries in a drag-delete record.
    ///
    /// A per-span scan can report the same builder node twice in a row, at the
    /// same offset; those collapse into one entry. Equal builders sitting at
    /// different offsets are distinct nodes and are kept, as are repeats
    /// separated by other spans.
    pub fn process_drag_delete_record(record: &mut UndoRedoRecord) {
        let Some(list) = record.options_list_before.as_mut() else {
            return;
        };
        let before = list.len();
        list.dedup_by(|next, prev| match (next, prev) {
            (SpanOptions::Builder(a), SpanOptions::Builder(b)) => {
                a.offset == b.offset && a.builder == b.builder
            }
            _ => false,
        });
        if list.len() != before {
            tracing::trace!(
                target: crate::LOG_TARGET,
                collapsed = before - list.len(),
                "collapsed repeated builder options"
            );
        }
    }
}
