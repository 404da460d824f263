#![forbid(unsafe_code)]

//! Span type tags and typed spans.
//!
//! Style spans ([`SpanType::is_style`]) attach attributes to a range of
//! existing characters. Content spans (image, symbol, builder) own the
//! placeholder characters they cover.

use bitflags::bitflags;

use crate::range::TextRange;
use crate::style::{BuilderAttr, Color, Decoration, FontStyle, ImageAttr, ParagraphStyle, SymbolAttr};

/// Character used for content-span placeholders.
pub const PLACEHOLDER_CHAR: char = '\u{FFFC}';
/// Placeholder width of an image span.
pub const IMAGE_PLACEHOLDER_LEN: usize = 1;
/// Placeholder width of a symbol span.
pub const SYMBOL_PLACEHOLDER_LEN: usize = 2;
/// Placeholder width of a builder span unless it declares otherwise.
pub const BUILDER_DEFAULT_PLACEHOLDER_LEN: usize = 1;

/// Tag identifying the kind of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpanType {
    Font,
    Decoration,
    BaselineOffset,
    LetterSpacing,
    LineHeight,
    BackgroundColor,
    ParagraphStyle,
    Image,
    Symbol,
    Builder,
}

impl SpanType {
    /// Every span type, in canonical order.
    pub const ALL: [SpanType; 10] = [
        SpanType::Font,
        SpanType::Decoration,
        SpanType::BaselineOffset,
        SpanType::LetterSpacing,
        SpanType::LineHeight,
        SpanType::BackgroundColor,
        SpanType::ParagraphStyle,
        SpanType::Image,
        SpanType::Symbol,
        SpanType::Builder,
    ];

    /// Whether this type only carries attributes over existing text.
    #[must_use]
    pub const fn is_style(self) -> bool {
        !self.is_content()
    }

    /// Whether this type owns placeholder characters.
    #[must_use]
    pub const fn is_content(self) -> bool {
        matches!(self, Self::Image | Self::Symbol | Self::Builder)
    }
}

bitflags! {
    /// A set of span types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpanTypes: u16 {
        const FONT             = 1 << 0;
        const DECORATION       = 1 << 1;
        const BASELINE_OFFSET  = 1 << 2;
        const LETTER_SPACING   = 1 << 3;
        const LINE_HEIGHT      = 1 << 4;
        const BACKGROUND_COLOR = 1 << 5;
        const PARAGRAPH_STYLE  = 1 << 6;
        const IMAGE            = 1 << 7;
        const SYMBOL           = 1 << 8;
        const BUILDER          = 1 << 9;

        /// Every style dimension.
        const STYLE = Self::FONT.bits()
            | Self::DECORATION.bits()
            | Self::BASELINE_OFFSET.bits()
            | Self::LETTER_SPACING.bits()
            | Self::LINE_HEIGHT.bits()
            | Self::BACKGROUND_COLOR.bits()
            | Self::PARAGRAPH_STYLE.bits();
        /// Every content span type.
        const CONTENT = Self::IMAGE.bits() | Self::SYMBOL.bits() | Self::BUILDER.bits();
    }
}

impl Default for SpanTypes {
    fn default() -> Self {
        Self::empty()
    }
}

impl SpanTypes {
    /// Whether the set contains `ty`.
    #[must_use]
    pub fn has(self, ty: SpanType) -> bool {
        self.contains(Self::from(ty))
    }

    /// Iterate the contained span types in canonical order.
    pub fn types(self) -> impl Iterator<Item = SpanType> {
        SpanType::ALL.into_iter().filter(move |ty| self.has(*ty))
    }
}

impl From<SpanType> for SpanTypes {
    fn from(ty: SpanType) -> Self {
        match ty {
            SpanType::Font => Self::FONT,
            SpanType::Decoration => Self::DECORATION,
            SpanType::BaselineOffset => Self::BASELINE_OFFSET,
            SpanType::LetterSpacing => Self::LETTER_SPACING,
            SpanType::LineHeight => Self::LINE_HEIGHT,
            SpanType::BackgroundColor => Self::BACKGROUND_COLOR,
            SpanType::ParagraphStyle => Self::PARAGRAPH_STYLE,
            SpanType::Image => Self::IMAGE,
            SpanType::Symbol => Self::SYMBOL,
            SpanType::Builder => Self::BUILDER,
        }
    }
}

/// Payload of a span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpanKind {
    Font(FontStyle),
    Decoration(Decoration),
    BaselineOffset(f32),
    LetterSpacing(f32),
    LineHeight(f32),
    BackgroundColor(Color),
    Paragraph(ParagraphStyle),
    Image(ImageAttr),
    Symbol(SymbolAttr),
    Builder(BuilderAttr),
}

impl SpanKind {
    /// The tag of this payload.
    #[must_use]
    pub const fn span_type(&self) -> SpanType {
        match self {
            Self::Font(_) => SpanType::Font,
            Self::Decoration(_) => SpanType::Decoration,
            Self::BaselineOffset(_) => SpanType::BaselineOffset,
            Self::LetterSpacing(_) => SpanType::LetterSpacing,
            Self::LineHeight(_) => SpanType::LineHeight,
            Self::BackgroundColor(_) => SpanType::BackgroundColor,
            Self::Paragraph(_) => SpanType::ParagraphStyle,
            Self::Image(_) => SpanType::Image,
            Self::Symbol(_) => SpanType::Symbol,
            Self::Builder(_) => SpanType::Builder,
        }
    }

    /// Placeholder width for content kinds, `None` for style kinds.
    #[must_use]
    pub const fn placeholder_len(&self) -> Option<usize> {
        match self {
            Self::Image(_) => Some(IMAGE_PLACEHOLDER_LEN),
            Self::Symbol(_) => Some(SYMBOL_PLACEHOLDER_LEN),
            Self::Builder(attr) => Some(attr.placeholder_len),
            _ => None,
        }
    }
}

/// A typed span over a character range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub range: TextRange,
    pub kind: SpanKind,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(range: TextRange, kind: SpanKind) -> Self {
        Self { range, kind }
    }

    /// The tag of this span.
    #[must_use]
    pub const fn span_type(&self) -> SpanType {
        self.kind.span_type()
    }

    /// Canonical ordering key.
    pub(crate) fn sort_key(&self) -> (usize, usize, SpanType) {
        (self.range.start, self.range.end, self.span_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_and_content_partition() {
        for ty in SpanType::ALL {
            assert_ne!(ty.is_style(), ty.is_content());
            let flag = SpanTypes::from(ty);
            assert_eq!(SpanTypes::STYLE.contains(flag), ty.is_style());
            assert_eq!(SpanTypes::CONTENT.contains(flag), ty.is_content());
        }
    }

    #[test]
    fn types_iterates_in_order() {
        let set = SpanTypes::PARAGRAPH_STYLE | SpanTypes::FONT;
        let types: Vec<_> = set.types().collect();
        assert_eq!(types, vec![SpanType::Font, SpanType::ParagraphStyle]);
    }

    #[test]
    fn placeholder_widths() {
        assert_eq!(SpanKind::Image(ImageAttr::new("a.png")).placeholder_len(), Some(1));
        assert_eq!(SpanKind::Symbol(SymbolAttr::new(7)).placeholder_len(), Some(2));
        assert_eq!(
            SpanKind::Builder(BuilderAttr::new(3).with_placeholder_len(4)).placeholder_len(),
            Some(4)
        );
        assert_eq!(SpanKind::LineHeight(1.5).placeholder_len(), None);
    }
}
