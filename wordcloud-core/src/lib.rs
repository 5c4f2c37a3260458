//! # wordcloud-core
//!
//! Data model shared by the word-cloud crates: the words going in, the
//! placements coming out, and the geometry in between.
//!
//! ```text
//! WordEntry ──▸ (measure + place) ──▸ PlacedWord | SkippedWord
//! ```
//!
//! - **`geometry`**: `Point`, `Rect`, `Outline`.
//! - **`color`**: `Rgba`, HSV helpers, the named `ColorLibrary`.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod color;
pub mod geometry;

pub use color::{ColorLibrary, ColorParseError, Rgba};
pub use geometry::{Outline, Point, Rect};

// ── Orientation ─────────────────────────────────────────────────────

/// Rotation applied to a word's glyphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Horizontal,
    /// Quarter turn clockwise; reads top to bottom.
    Vertical,
    /// Quarter turn counter-clockwise; reads bottom to top.
    FlippedVertical,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::FlippedVertical,
    ];

    pub fn degrees(self) -> f32 {
        match self {
            Orientation::Horizontal => 0.0,
            Orientation::Vertical => 90.0,
            Orientation::FlippedVertical => -90.0,
        }
    }

    pub fn radians(self) -> f32 {
        self.degrees().to_radians()
    }

    pub fn is_vertical(self) -> bool {
        !matches!(self, Orientation::Horizontal)
    }
}

// ── Input ───────────────────────────────────────────────────────────

/// One word to lay out.  Immutable once handed to a layout run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub text: String,
    /// Relative importance; must be positive.  Drives font size.
    pub weight: f32,
    /// Explicit color; otherwise one is taken from the palette.
    #[serde(default)]
    pub color: Option<Rgba>,
    /// Forced orientation; otherwise one is drawn at random.
    #[serde(default)]
    pub orientation: Option<Orientation>,
}

impl WordEntry {
    pub fn new(text: impl Into<String>, weight: f32) -> Self {
        Self {
            text: text.into(),
            weight,
            color: None,
            orientation: None,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }
}

// ── Output ──────────────────────────────────────────────────────────

/// A word bound to its final position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub text: String,
    /// Center of the outline's bounding box, in canvas pixels.
    pub center: Point,
    pub font_size: f32,
    pub orientation: Orientation,
    pub color: Rgba,
    /// Outline in canvas coordinates.
    pub outline: Outline,
}

impl PlacedWord {
    pub fn bounds(&self) -> Rect {
        self.outline.bounds()
    }
}

/// Why a word did not make it onto the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Every size tier and candidate was tried without finding room.
    WordUnplaceable,
    /// The font could not be resolved and no fallback was configured.
    FontUnresolved(String),
    /// The glyph provider could not produce an outline for the word.
    GlyphRenderError(String),
    /// The run's attempt or time budget ran out before this word was done.
    RunBudgetExceeded,
    /// The run was cancelled from outside.
    Cancelled,
    /// The word fell beyond the configured word limit.
    WordLimit,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::WordUnplaceable => write!(f, "no room at any size"),
            SkipReason::FontUnresolved(font) => write!(f, "font unresolved: {font}"),
            SkipReason::GlyphRenderError(reason) => write!(f, "glyph error: {reason}"),
            SkipReason::RunBudgetExceeded => write!(f, "run budget exceeded"),
            SkipReason::Cancelled => write!(f, "cancelled"),
            SkipReason::WordLimit => write!(f, "word limit reached"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedWord {
    pub text: String,
    pub reason: SkipReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_angles() {
        assert_eq!(Orientation::Horizontal.radians(), 0.0);
        assert!((Orientation::Vertical.radians() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((Orientation::FlippedVertical.radians() + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!(!Orientation::Horizontal.is_vertical());
        assert!(Orientation::FlippedVertical.is_vertical());
    }

    #[test]
    fn test_word_entry_builders() {
        let word = WordEntry::new("cloud", 3.0)
            .with_color(Rgba::WHITE)
            .with_orientation(Orientation::Vertical);
        assert_eq!(word.text, "cloud");
        assert_eq!(word.color, Some(Rgba::WHITE));
        assert_eq!(word.orientation, Some(Orientation::Vertical));
    }

    #[test]
    fn test_word_entry_json_defaults() {
        let word: WordEntry = serde_json::from_str(r#"{"text":"rust","weight":2.5}"#).unwrap();
        assert_eq!(word, WordEntry::new("rust", 2.5));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::RunBudgetExceeded.to_string(), "run budget exceeded");
        assert_eq!(
            SkipReason::FontUnresolved("comic".into()).to_string(),
            "font unresolved: comic"
        );
    }
}
