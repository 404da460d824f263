#![forbid(unsafe_code)]

//! Span creation options.
//!
//! In spans mode a record stores the content it removed or inserted as an
//! ordered [`OptionsList`]: one [`SpanOptions`] per span, each able to recreate
//! its span on replay. Text-level comparison goes through
//! [`options_list_text`] so the list never has to be materialized.

use rte_text::{
    BuilderAttr, IMAGE_PLACEHOLDER_LEN, ImageAttr, PLACEHOLDER_CHAR, ParagraphStyle,
    SYMBOL_PLACEHOLDER_LEN, Span, SpanKind, SpanString, SymbolAttr, TextRange, TextStyle,
};

/// Options recreating a text run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextSpanOptions {
    /// Offset of the run in the document when it was captured.
    pub offset: Option<usize>,
    pub value: String,
    pub style: TextStyle,
    pub paragraph_style: Option<ParagraphStyle>,
}

impl TextSpanOptions {
    /// Plain text options.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the run style.
    #[must_use]
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

/// Options recreating an image span.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageSpanOptions {
    pub offset: Option<usize>,
    pub image: ImageAttr,
    /// Character-level style covering the placeholder.
    pub style: TextStyle,
    pub paragraph_style: Option<ParagraphStyle>,
}

/// Options recreating a symbol span.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolSpanOptions {
    pub offset: Option<usize>,
    pub symbol: SymbolAttr,
    /// Character-level style covering the placeholder.
    pub style: TextStyle,
    pub paragraph_style: Option<ParagraphStyle>,
}

/// Options recreating a builder span.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderSpanOptions {
    pub offset: Option<usize>,
    pub builder: BuilderAttr,
    /// Character-level style covering the placeholder.
    pub style: TextStyle,
    pub paragraph_style: Option<ParagraphStyle>,
}

/// One span creation option.
#[derive(Debug, Clone, PartialEq)]
pub enum SpanOptions {
    Text(TextSpanOptions),
    Image(ImageSpanOptions),
    Symbol(SymbolSpanOptions),
    Builder(BuilderSpanOptions),
}

/// Ordered span creation options for one side of a record.
pub type OptionsList = Vec<SpanOptions>;

impl Default for SpanOptions {
    fn default() -> Self {
        Self::Text(TextSpanOptions::default())
    }
}

impl SpanOptions {
    /// Offset recorded at capture time.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Text(o) => o.offset,
            Self::Image(o) => o.offset,
            Self::Symbol(o) => o.offset,
            Self::Builder(o) => o.offset,
        }
    }

    /// Flat text contributed by this option.
    ///
    /// Text runs contribute their value; content spans contribute their
    /// placeholder characters.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Text(o) => o.value.clone(),
            _ => placeholder(self.text_len()),
        }
    }

    /// Length in characters of [`SpanOptions::text`].
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(o) => o.value.chars().count(),
            Self::Image(_) => IMAGE_PLACEHOLDER_LEN,
            Self::Symbol(_) => SYMBOL_PLACEHOLDER_LEN,
            Self::Builder(o) => o.builder.placeholder_len,
        }
    }

    /// Materialize this option as a span string.
    ///
    /// A builder option becomes a real builder span only when
    /// `restore_builder_span` is set; otherwise its placeholder is inserted as
    /// plain text so document coordinates stay consistent.
    #[must_use]
    pub fn to_styled_string(&self, restore_builder_span: bool) -> SpanString {
        let (mut value, style, paragraph) = match self {
            Self::Text(o) => (SpanString::new(o.value.clone()), &o.style, &o.paragraph_style),
            Self::Image(o) => (SpanString::image(o.image.clone()), &o.style, &o.paragraph_style),
            Self::Symbol(o) => (
                SpanString::symbol(o.symbol.clone()),
                &o.style,
                &o.paragraph_style,
            ),
            Self::Builder(o) if restore_builder_span => {
                (SpanString::builder(o.builder), &o.style, &o.paragraph_style)
            }
            Self::Builder(o) => (
                SpanString::new(placeholder(o.builder.placeholder_len)),
                &o.style,
                &o.paragraph_style,
            ),
        };
        let whole = TextRange::new(0, value.len());
        for kind in style.to_kinds() {
            value.add_span(Span::new(whole, kind));
        }
        if let Some(paragraph) = paragraph {
            value.add_span(Span::new(whole, SpanKind::Paragraph(paragraph.clone())));
        }
        value
    }

    /// Whether this option recreates a builder span.
    #[must_use]
    pub fn is_builder(&self) -> bool {
        matches!(self, Self::Builder(_))
    }
}

fn placeholder(width: usize) -> String {
    std::iter::repeat_n(PLACEHOLDER_CHAR, width).collect()
}

/// Concatenated flat text of an options list.
#[must_use]
pub fn options_list_text(list: &[SpanOptions]) -> String {
    list.iter().map(SpanOptions::text).collect()
}

/// Total character length of an options list.
#[must_use]
pub fn options_list_len(list: &[SpanOptions]) -> usize {
    list.iter().map(SpanOptions::text_len).sum()
}
