#![forbid(unsafe_code)]

//! Half-open character ranges.

use std::fmt;

/// A half-open range `[start, end)` of character offsets.
///
/// A range with `start > end` can be constructed (records may carry one when
/// a caller passes bad coordinates); [`TextRange::is_well_formed`] reports it
/// and the length saturates to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRange {
    /// First character in the range.
    pub start: usize,
    /// One past the last character in the range.
    pub end: usize,
}

impl TextRange {
    /// Create a range from its bounds.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a range from a start offset and a length.
    #[must_use]
    pub const fn from_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(len),
        }
    }

    /// Create a zero-length range (a caret).
    #[must_use]
    pub const fn collapsed(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    /// Number of characters covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no characters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `start <= end`.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    /// Whether `pos` lies inside the range.
    #[must_use]
    pub const fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Whether `other` lies entirely inside this range.
    #[must_use]
    pub const fn contains_range(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share at least one character.
    #[must_use]
    pub const fn intersects(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The shared part of two ranges, if non-empty.
    #[must_use]
    pub fn intersection(&self, other: &TextRange) -> Option<TextRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(TextRange { start, end })
    }

    /// Move the range right by `delta`.
    #[must_use]
    pub const fn shifted_right(&self, delta: usize) -> Self {
        Self {
            start: self.start.saturating_add(delta),
            end: self.end.saturating_add(delta),
        }
    }

    /// Move the range left by `delta`, saturating at zero.
    #[must_use]
    pub const fn shifted_left(&self, delta: usize) -> Self {
        Self {
            start: self.start.saturating_sub(delta),
            end: self.end.saturating_sub(delta),
        }
    }

    /// Clamp both bounds to `max`.
    #[must_use]
    pub fn clamped(&self, max: usize) -> Self {
        Self {
            start: self.start.min(max),
            end: self.end.min(max),
        }
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
