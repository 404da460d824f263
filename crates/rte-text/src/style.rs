#![forbid(unsafe_code)]

//! Style and content attributes carried by spans.

use crate::span::{BUILDER_DEFAULT_PLACEHOLDER_LEN, SpanKind};

/// Packed ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque red.
    pub const RED: Self = Self(0xFFFF_0000);
    /// Opaque blue.
    pub const BLUE: Self = Self(0xFF00_00FF);

    /// Build an opaque color from RGB components.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontWeight {
    Lighter,
    #[default]
    Normal,
    Medium,
    Bold,
    Bolder,
}

/// Font attributes of a text run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontStyle {
    /// Font size in virtual pixels.
    pub size: Option<f32>,
    pub weight: FontWeight,
    pub color: Option<Color>,
    pub italic: bool,
    pub family: Option<String>,
}

impl FontStyle {
    /// A bold font with otherwise default attributes.
    #[must_use]
    pub fn bold() -> Self {
        Self {
            weight: FontWeight::Bold,
            ..Self::default()
        }
    }

    /// Set the font size.
    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the font color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Text decoration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecorationKind {
    #[default]
    None,
    Underline,
    Overline,
    LineThrough,
}

/// Text decoration attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decoration {
    pub kind: DecorationKind,
    pub color: Option<Color>,
}

impl Decoration {
    /// An underline in the text color.
    #[must_use]
    pub const fn underline() -> Self {
        Self {
            kind: DecorationKind::Underline,
            color: None,
        }
    }
}

/// Horizontal alignment of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
    Justify,
}

/// Line breaking rule inside words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WordBreak {
    #[default]
    Normal,
    BreakAll,
    BreakWord,
}

/// Paragraph-level attributes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParagraphStyle {
    pub align: TextAlign,
    pub leading_margin: Option<f32>,
    pub max_lines: Option<u32>,
    pub word_break: WordBreak,
}

/// Attributes of an image span.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageAttr {
    /// Image source (URI or resource path).
    pub src: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl ImageAttr {
    /// An image with the given source and intrinsic size.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            width: None,
            height: None,
        }
    }
}

/// Attributes of a symbol (icon glyph) span.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolAttr {
    /// Symbol resource identifier.
    pub resource_id: u32,
    pub font_size: Option<f32>,
    pub color: Option<Color>,
}

impl SymbolAttr {
    /// A symbol with the given resource id.
    #[must_use]
    pub fn new(resource_id: u32) -> Self {
        Self {
            resource_id,
            font_size: None,
            color: None,
        }
    }
}

/// Attributes of a custom builder span.
///
/// The builder's rendered content lives outside the text model; the span only
/// records which builder owns the placeholder and how wide the placeholder is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuilderAttr {
    /// Identity of the custom builder node.
    pub id: u64,
    /// Placeholder characters occupied in the text.
    pub placeholder_len: usize,
}

impl BuilderAttr {
    /// A builder with the default one-character placeholder.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            placeholder_len: BUILDER_DEFAULT_PLACEHOLDER_LEN,
        }
    }

    /// Set the placeholder width (at least one character).
    #[must_use]
    pub const fn with_placeholder_len(mut self, len: usize) -> Self {
        self.placeholder_len = if len == 0 { 1 } else { len };
        self
    }
}

/// Flattened style of a text run: every character-level style dimension.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextStyle {
    pub font: Option<FontStyle>,
    pub decoration: Option<Decoration>,
    pub baseline_offset: Option<f32>,
    pub letter_spacing: Option<f32>,
    pub line_height: Option<f32>,
    pub background_color: Option<Color>,
}

impl TextStyle {
    /// Whether no style dimension is set.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Fold character-level style spans into a flattened style.
    ///
    /// Paragraph and content kinds are ignored.
    #[must_use]
    pub fn from_kinds<'a>(kinds: impl IntoIterator<Item = &'a SpanKind>) -> Self {
        let mut style = Self::default();
        for kind in kinds {
            match kind {
                SpanKind::Font(font) => style.font = Some(font.clone()),
                SpanKind::Decoration(decoration) => style.decoration = Some(*decoration),
                SpanKind::BaselineOffset(v) => style.baseline_offset = Some(*v),
                SpanKind::LetterSpacing(v) => style.letter_spacing = Some(*v),
                SpanKind::LineHeight(v) => style.line_height = Some(*v),
                SpanKind::BackgroundColor(c) => style.background_color = Some(*c),
                SpanKind::Paragraph(_)
                | SpanKind::Image(_)
                | SpanKind::Symbol(_)
                | SpanKind::Builder(_) => {}
            }
        }
        style
    }

    /// Expand the style back into one span kind per set dimension.
    #[must_use]
    pub fn to_kinds(&self) -> Vec<SpanKind> {
        let mut kinds = Vec::new();
        if let Some(font) = &self.font {
            kinds.push(SpanKind::Font(font.clone()));
        }
        if let Some(decoration) = self.decoration {
            kinds.push(SpanKind::Decoration(decoration));
        }
        if let Some(v) = self.baseline_offset {
            kinds.push(SpanKind::BaselineOffset(v));
        }
        if let Some(v) = self.letter_spacing {
            kinds.push(SpanKind::LetterSpacing(v));
        }
        if let Some(v) = self.line_height {
            kinds.push(SpanKind::LineHeight(v));
        }
        if let Some(c) = self.background_color {
            kinds.push(SpanKind::BackgroundColor(c));
        }
        kinds
    }
}
