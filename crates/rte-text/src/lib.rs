#![forbid(unsafe_code)]

//! Rich-text value types.
//!
//! This crate provides the content model the undo/redo subsystem operates on:
//!
//! - [`TextRange`] - half-open character range
//! - [`SpanType`] / [`SpanTypes`] - span type tags and tag sets
//! - [`SpanKind`] / [`Span`] - typed, range-addressed spans
//! - [`SpanString`] - text buffer plus spans, shared as `Arc<SpanString>`
//!
//! All indices are character (Unicode scalar value) offsets, never bytes.
//!
//! # Canonical form
//!
//! A [`SpanString`] keeps its spans in a canonical order and never holds two
//! style spans of the same type over the same character. Touching style spans
//! with identical attributes are merged. This makes
//! `remove` followed by `insert_at` of the removed substring restore a value
//! that compares equal to the original, which is what undo relies on.

pub mod range;
pub mod span;
pub mod span_string;
pub mod style;

pub use range::TextRange;
pub use span::{
    BUILDER_DEFAULT_PLACEHOLDER_LEN, IMAGE_PLACEHOLDER_LEN, PLACEHOLDER_CHAR, Span, SpanKind,
    SpanType, SpanTypes, SYMBOL_PLACEHOLDER_LEN,
};
pub use span_string::{Segment, SpanString};
pub use style::{
    BuilderAttr, Color, Decoration, DecorationKind, FontStyle, FontWeight, ImageAttr,
    ParagraphStyle, SymbolAttr, TextAlign, TextStyle, WordBreak,
};
