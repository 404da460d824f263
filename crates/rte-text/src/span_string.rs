#![forbid(unsafe_code)]

//! The span-string value type.
//!
//! [`SpanString`] is a text buffer plus a canonical list of [`Span`]s. Stored
//! copies are shared as `Arc<SpanString>` and treated as immutable; editing
//! hosts mutate their own copy (`Arc::make_mut`) and archive snapshots taken
//! with [`SpanString::substring`].
//!
//! # Invariants
//!
//! 1. Every span range is non-empty and lies within `0..len()`
//! 2. Spans are sorted by `(start, end, type)`
//! 3. No two style spans of the same type overlap
//! 4. Touching style spans with equal payloads are merged
//!
//! Insertion never extends an existing span over the inserted characters: a
//! span that strictly contains the insertion point is split around it. Paired
//! with invariant 4, removing a range and re-inserting the removed substring
//! yields a value equal to the original.

use std::fmt;

use crate::range::TextRange;
use crate::span::{PLACEHOLDER_CHAR, Span, SpanKind, SpanType, SpanTypes};
use crate::style::{BuilderAttr, ImageAttr, ParagraphStyle, SymbolAttr, TextStyle};

/// A run of a span string with uniform content and style.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Range of the run in the enumerated string.
    pub range: TextRange,
    /// Characters of the run.
    pub text: String,
    /// Content span owning the run, `None` for plain text.
    pub content: Option<SpanKind>,
    /// Character-level style covering the whole run.
    pub style: TextStyle,
    /// Paragraph style covering the run.
    pub paragraph: Option<ParagraphStyle>,
}

/// Text plus typed spans.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpanString {
    text: String,
    len: usize,
    spans: Vec<Span>,
}

impl SpanString {
    /// Create a span string holding plain text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            len,
            spans: Vec::new(),
        }
    }

    /// An empty span string.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a span string from text and spans.
    ///
    /// Spans are clamped to the text and brought into canonical form.
    #[must_use]
    pub fn with_spans(text: impl Into<String>, spans: impl IntoIterator<Item = Span>) -> Self {
        let mut value = Self::new(text);
        for span in spans {
            value.add_span(span);
        }
        value
    }

    /// A single image placeholder.
    #[must_use]
    pub fn image(attr: ImageAttr) -> Self {
        Self::content(SpanKind::Image(attr))
    }

    /// A single symbol placeholder.
    #[must_use]
    pub fn symbol(attr: SymbolAttr) -> Self {
        Self::content(SpanKind::Symbol(attr))
    }

    /// A single builder placeholder.
    #[must_use]
    pub fn builder(attr: BuilderAttr) -> Self {
        Self::content(SpanKind::Builder(attr))
    }

    fn content(kind: SpanKind) -> Self {
        let width = kind.placeholder_len().unwrap_or_default();
        let text: String = std::iter::repeat_n(PLACEHOLDER_CHAR, width).collect();
        Self {
            text,
            len: width,
            spans: vec![Span::new(TextRange::new(0, width), kind)],
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The flat text, placeholders included.
    #[must_use]
    pub fn string(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the string holds no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All spans in canonical order.
    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Spans of type `ty` intersecting `range`, clipped to it.
    #[must_use]
    pub fn spans_by_type_and_range(&self, ty: SpanType, range: TextRange) -> Vec<Span> {
        self.spans
            .iter()
            .filter(|span| span.span_type() == ty)
            .filter_map(|span| {
                span.range
                    .intersection(&range)
                    .map(|clipped| Span::new(clipped, span.kind.clone()))
            })
            .collect()
    }

    /// Style spans of the given types intersecting `range`, clipped to it.
    #[must_use]
    pub fn style_spans_in(&self, range: TextRange, types: SpanTypes) -> Vec<Span> {
        let types = types & SpanTypes::STYLE;
        types
            .types()
            .flat_map(|ty| self.spans_by_type_and_range(ty, range))
            .collect()
    }

    /// Whether any span of type `ty` intersects `range`.
    #[must_use]
    pub fn has_span_in(&self, ty: SpanType, range: TextRange) -> bool {
        self.spans
            .iter()
            .any(|span| span.span_type() == ty && span.range.intersects(&range))
    }

    /// Copy `len` characters starting at `start`, with their spans.
    #[must_use]
    pub fn substring(&self, start: usize, len: usize) -> SpanString {
        self.substring_range(TextRange::from_len(start, len))
    }

    /// Copy the characters of `range`, with their spans rebased to zero.
    #[must_use]
    pub fn substring_range(&self, range: TextRange) -> SpanString {
        let range = range.clamped(self.len);
        if range.is_empty() {
            return SpanString::empty();
        }
        let text = self.slice(range).to_string();
        let spans = self
            .spans
            .iter()
            .filter_map(|span| {
                span.range
                    .intersection(&range)
                    .map(|clipped| Span::new(clipped.shifted_left(range.start), span.kind.clone()))
            })
            .collect();
        SpanString {
            text,
            len: range.len(),
            spans,
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert `other` before character `pos`.
    pub fn insert_at(&mut self, pos: usize, other: &SpanString) {
        if pos > self.len {
            tracing::trace!(pos, len = self.len, "insert position clamped");
        }
        let pos = pos.min(self.len);
        let n = other.len;
        if n == 0 {
            return;
        }
        let byte = self.byte_offset(pos);
        self.text.insert_str(byte, &other.text);

        let mut spans = Vec::with_capacity(self.spans.len() + other.spans.len() + 1);
        for span in self.spans.drain(..) {
            let r = span.range;
            if r.start >= pos {
                spans.push(Span::new(r.shifted_right(n), span.kind));
            } else if r.end > pos {
                spans.push(Span::new(TextRange::new(r.start, pos), span.kind.clone()));
                spans.push(Span::new(TextRange::new(pos + n, r.end + n), span.kind));
            } else {
                spans.push(span);
            }
        }
        spans.extend(
            other
                .spans
                .iter()
                .map(|span| Span::new(span.range.shifted_right(pos), span.kind.clone())),
        );
        self.spans = spans;
        self.len += n;
        self.normalize();
    }

    /// Append `other` at the end.
    pub fn append(&mut self, other: &SpanString) {
        self.insert_at(self.len, other);
    }

    /// Remove `len` characters starting at `start`.
    pub fn remove(&mut self, start: usize, len: usize) {
        let range = TextRange::from_len(start, len).clamped(self.len);
        if range.is_empty() {
            return;
        }
        let (b_start, b_end) = (self.byte_offset(range.start), self.byte_offset(range.end));
        self.text.replace_range(b_start..b_end, "");

        let n = range.len();
        let map = |p: usize| {
            if p <= range.start {
                p
            } else if p >= range.end {
                p - n
            } else {
                range.start
            }
        };
        for span in &mut self.spans {
            span.range = TextRange::new(map(span.range.start), map(span.range.end));
        }
        self.len -= n;
        self.normalize();
    }

    /// Replace `len` characters at `start` with `other`.
    pub fn replace(&mut self, start: usize, len: usize, other: &SpanString) {
        let start = start.min(self.len);
        self.remove(start, len);
        self.insert_at(start, other);
    }

    /// Add a span.
    ///
    /// A style span replaces spans of its own type over its range. Spans with
    /// an empty range after clamping are ignored.
    pub fn add_span(&mut self, span: Span) {
        let range = span.range.clamped(self.len);
        if range.is_empty() {
            tracing::trace!(range = %span.range, len = self.len, "empty span ignored");
            return;
        }
        let ty = span.span_type();
        if ty.is_style() {
            self.carve(range, SpanTypes::from(ty));
        }
        self.spans.push(Span::new(range, span.kind));
        self.normalize();
    }

    /// Remove spans of the given types from `range`, splitting as needed.
    ///
    /// Text (including content placeholders) is left in place.
    pub fn remove_spans(&mut self, range: TextRange, types: SpanTypes) {
        self.carve(range.clamped(self.len), types);
        self.normalize();
    }

    /// Overwrite the styles of `types` over `range` with those of `source`.
    ///
    /// `source` is a snapshot of the same range (offset zero maps to
    /// `range.start`). Only style types are touched; text and content spans
    /// stay as they are.
    pub fn apply_styles_from(&mut self, range: TextRange, source: &SpanString, types: SpanTypes) {
        let types = types & SpanTypes::STYLE;
        let range = range.clamped(self.len);
        if types.is_empty() || range.is_empty() {
            return;
        }
        self.carve(range, types);
        for span in &source.spans {
            if !types.has(span.span_type()) {
                continue;
            }
            if let Some(target) = span.range.shifted_right(range.start).intersection(&range) {
                self.spans.push(Span::new(target, span.kind.clone()));
            }
        }
        self.normalize();
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// Split `range` into runs of uniform content and style.
    ///
    /// Each content span yields exactly one segment; text between content
    /// spans is split wherever a style span starts or ends.
    #[must_use]
    pub fn segments(&self, range: TextRange) -> Vec<Segment> {
        let range = range.clamped(self.len);
        if range.is_empty() {
            return Vec::new();
        }
        let inside_content = |pos: usize| {
            self.spans.iter().any(|span| {
                span.span_type().is_content() && span.range.start < pos && pos < span.range.end
            })
        };
        let mut bounds = vec![range.start, range.end];
        for span in &self.spans {
            for pos in [span.range.start, span.range.end] {
                if pos > range.start && pos < range.end && !inside_content(pos) {
                    bounds.push(pos);
                }
            }
        }
        bounds.sort_unstable();
        bounds.dedup();

        bounds
            .windows(2)
            .map(|pair| {
                let seg = TextRange::new(pair[0], pair[1]);
                let covering: Vec<&Span> = self
                    .spans
                    .iter()
                    .filter(|span| span.range.contains_range(&seg))
                    .collect();
                let content = self
                    .spans
                    .iter()
                    .find(|span| span.span_type().is_content() && span.range.intersects(&seg))
                    .map(|span| span.kind.clone());
                let paragraph = covering.iter().find_map(|span| match &span.kind {
                    SpanKind::Paragraph(p) => Some(p.clone()),
                    _ => None,
                });
                Segment {
                    range: seg,
                    text: self.slice(seg).to_string(),
                    content,
                    style: TextStyle::from_kinds(covering.iter().map(|span| &span.kind)),
                    paragraph,
                }
            })
            .collect()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn byte_offset(&self, idx: usize) -> usize {
        if idx >= self.len {
            return self.text.len();
        }
        self.text
            .char_indices()
            .nth(idx)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    fn slice(&self, range: TextRange) -> &str {
        &self.text[self.byte_offset(range.start)..self.byte_offset(range.end)]
    }

    /// Cut `range` out of every span whose type is in `types`.
    fn carve(&mut self, range: TextRange, types: SpanTypes) {
        if range.is_empty() {
            return;
        }
        let mut kept = Vec::with_capacity(self.spans.len() + 1);
        for span in self.spans.drain(..) {
            if !types.has(span.span_type()) || !span.range.intersects(&range) {
                kept.push(span);
                continue;
            }
            if span.range.start < range.start {
                kept.push(Span::new(
                    TextRange::new(span.range.start, range.start),
                    span.kind.clone(),
                ));
            }
            if span.range.end > range.end {
                kept.push(Span::new(TextRange::new(range.end, span.range.end), span.kind));
            }
        }
        self.spans = kept;
    }

    fn normalize(&mut self) {
        self.spans.retain(|span| !span.range.is_empty());
        self.spans.sort_by_key(Span::sort_key);

        let mut merged: Vec<Span> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            let ty = span.span_type();
            if let Some(prev) = merged.iter_mut().rev().find(|p| p.span_type() == ty)
                && prev.kind == span.kind
            {
                let joins = if ty.is_style() {
                    prev.range.end >= span.range.start
                } else {
                    // Pieces of one split placeholder rejoin once they touch.
                    prev.range.end == span.range.start
                        && span.kind.placeholder_len().is_some_and(|width| {
                            prev.range.len() + span.range.len() <= width
                        })
                };
                if joins {
                    prev.range.end = prev.range.end.max(span.range.end);
                    continue;
                }
            }
            merged.push(span);
        }
        merged.sort_by_key(Span::sort_key);
        self.spans = merged;
    }
}

impl fmt::Display for SpanString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for SpanString {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SpanString {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
