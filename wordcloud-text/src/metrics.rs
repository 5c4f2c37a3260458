//! Font-free outline provider with fixed per-character metrics.
//!
//! Every visible character becomes one ink box sized from a small table of
//! em-relative advances and extents (x-height letters are shorter than
//! capitals, descenders dip below the baseline).  The result is coarse but
//! fully deterministic and needs no installed fonts, which makes it the
//! provider of choice for tests, benchmarks and headless layout.

use wordcloud_core::{Orientation, Outline, Rect};

use crate::fonts::{FontDescriptor, GenericFamily};
use crate::provider::{check_size, GlyphBoundsProvider, MeasureError};

/// Side bearing on each side of an ink box, in em.
const SIDE_BEARING: f32 = 0.04;

/// Advance, ascent above the baseline, and descent below it, in em.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CharMetrics {
    advance: f32,
    ascent: f32,
    descent: f32,
}

impl CharMetrics {
    const fn new(advance: f32, ascent: f32, descent: f32) -> Self {
        Self { advance, ascent, descent }
    }
}

fn char_metrics(c: char) -> CharMetrics {
    // Wide scripts (CJK and friends) get a full em square.
    if c.len_utf8() >= 3 && !c.is_whitespace() {
        return CharMetrics::new(1.0, 0.8, 0.1);
    }
    let advance = match c {
        'i' | 'l' | 'j' | 't' | 'f' | 'r' | '1' | 'I' | '.' | ',' | ';' | ':' | '!' | '\'' | '|' => 0.3,
        'm' | 'w' | 'M' | 'W' | '@' => 0.88,
        c if c.is_uppercase() => 0.68,
        _ => 0.55,
    };
    let (ascent, descent) = match c {
        'g' | 'p' | 'q' | 'y' => (0.52, 0.22),
        'j' => (0.72, 0.22),
        'b' | 'd' | 'f' | 'h' | 'k' | 'l' | 't' => (0.75, 0.0),
        'i' => (0.72, 0.0),
        '.' => (0.12, 0.0),
        ',' => (0.12, 0.12),
        '-' | '_' => (0.3, 0.0),
        c if c.is_lowercase() => (0.52, 0.0),
        _ => (0.72, 0.0),
    };
    CharMetrics::new(advance, ascent, descent)
}

/// Deterministic, table-driven [`GlyphBoundsProvider`].
#[derive(Clone, Debug, Default)]
pub struct FixedMetrics {
    /// When set, only these (lowercased) families plus generic keywords
    /// resolve; everything else reports `FontUnresolved`.
    known_families: Option<Vec<String>>,
    measured: u64,
}

impl FixedMetrics {
    /// Provider that accepts any font family.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that only knows the given families (and generic keywords).
    pub fn with_families<S: AsRef<str>>(families: impl IntoIterator<Item = S>) -> Self {
        Self {
            known_families: Some(
                families
                    .into_iter()
                    .map(|f| f.as_ref().to_lowercase())
                    .collect(),
            ),
            measured: 0,
        }
    }

    /// Number of successful measurements so far.
    pub fn measured_count(&self) -> u64 {
        self.measured
    }

    fn resolves(&self, font: &FontDescriptor) -> bool {
        match &self.known_families {
            None => true,
            Some(known) => font
                .families
                .iter()
                .any(|f| GenericFamily::parse(f).is_some() || known.contains(f)),
        }
    }

    /// Ink boxes for a horizontal run starting at the origin.
    fn ink_boxes(text: &str, font: &FontDescriptor, size_px: f32) -> Vec<Rect> {
        // Heavier weights set a little wider.
        let widen = 1.0 + (font.weight.saturating_sub(400) as f32 / 500.0) * 0.12;
        let mut pen_x = 0.0_f32;
        let mut boxes = Vec::with_capacity(text.len());
        for c in text.chars() {
            if c.is_control() {
                continue;
            }
            let m = char_metrics(c);
            let advance = m.advance * widen * size_px;
            if !c.is_whitespace() {
                let bearing = SIDE_BEARING * size_px;
                boxes.push(Rect {
                    min_x: pen_x + bearing,
                    min_y: -m.ascent * size_px,
                    max_x: pen_x + advance - bearing,
                    max_y: m.descent * size_px,
                });
            }
            pen_x += advance;
        }
        boxes
    }
}

impl GlyphBoundsProvider for FixedMetrics {
    fn measure(
        &mut self,
        text: &str,
        font: &FontDescriptor,
        size_px: f32,
        orientation: Orientation,
    ) -> Result<Outline, MeasureError> {
        check_size(text, size_px)?;
        if !self.resolves(font) {
            return Err(MeasureError::FontUnresolved(font.to_string()));
        }

        let outline = Outline::from_rects(Self::ink_boxes(text, font, size_px));
        if outline.is_empty() {
            return Err(MeasureError::glyph(text, "no visible glyphs"));
        }
        self.measured += 1;
        Ok(outline.rotated(orientation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontStyle;

    fn sans() -> FontDescriptor {
        FontDescriptor::default()
    }

    #[test]
    fn test_measure_single_char() {
        let mut m = FixedMetrics::new();
        let outline = m.measure("x", &sans(), 100.0, Orientation::Horizontal).unwrap();
        let b = outline.bounds();
        assert!((b.min_x - 4.0).abs() < 1e-4);
        assert!((b.max_x - 51.0).abs() < 1e-4);
        assert!((b.min_y + 52.0).abs() < 1e-4);
        assert_eq!(b.max_y, 0.0);
        assert_eq!(m.measured_count(), 1);
    }

    #[test]
    fn test_measure_scales_with_size() {
        let mut m = FixedMetrics::new();
        let small = m.measure("Word", &sans(), 10.0, Orientation::Horizontal).unwrap();
        let large = m.measure("Word", &sans(), 20.0, Orientation::Horizontal).unwrap();
        let ratio = large.bounds().width() / small.bounds().width();
        assert!((ratio - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_descenders_extend_below_baseline() {
        let mut m = FixedMetrics::new();
        let flat = m.measure("ace", &sans(), 50.0, Orientation::Horizontal).unwrap();
        let deep = m.measure("gap", &sans(), 50.0, Orientation::Horizontal).unwrap();
        assert_eq!(flat.bounds().max_y, 0.0);
        assert!(deep.bounds().max_y > 10.0);
    }

    #[test]
    fn test_spaces_advance_without_ink() {
        let mut m = FixedMetrics::new();
        let outline = m.measure("a b", &sans(), 40.0, Orientation::Horizontal).unwrap();
        assert_eq!(outline.contours().len(), 2);
    }

    #[test]
    fn test_vertical_swaps_extent() {
        let mut m = FixedMetrics::new();
        let h = m.measure("cloud", &sans(), 30.0, Orientation::Horizontal).unwrap();
        let v = m.measure("cloud", &sans(), 30.0, Orientation::Vertical).unwrap();
        assert!((h.bounds().width() - v.bounds().height()).abs() < 1e-4);
        assert!((h.bounds().height() - v.bounds().width()).abs() < 1e-4);
    }

    #[test]
    fn test_deterministic() {
        let mut a = FixedMetrics::new();
        let mut b = FixedMetrics::new();
        let font = FontDescriptor::from_css("Impact", 700, FontStyle::Normal);
        assert_eq!(
            a.measure("Deterministic", &font, 33.0, Orientation::FlippedVertical),
            b.measure("Deterministic", &font, 33.0, Orientation::FlippedVertical),
        );
    }

    #[test]
    fn test_bold_is_wider() {
        let mut m = FixedMetrics::new();
        let regular = FontDescriptor::from_css("sans-serif", 400, FontStyle::Normal);
        let bold = FontDescriptor::from_css("sans-serif", 900, FontStyle::Normal);
        let r = m.measure("weight", &regular, 20.0, Orientation::Horizontal).unwrap();
        let b = m.measure("weight", &bold, 20.0, Orientation::Horizontal).unwrap();
        assert!(b.bounds().width() > r.bounds().width());
    }

    #[test]
    fn test_whitespace_only_is_glyph_error() {
        let mut m = FixedMetrics::new();
        let err = m.measure("   ", &sans(), 20.0, Orientation::Horizontal).unwrap_err();
        assert!(matches!(err, MeasureError::GlyphRender { .. }));
        assert_eq!(m.measured_count(), 0);
    }

    #[test]
    fn test_unknown_family_is_unresolved() {
        let mut m = FixedMetrics::with_families(["Impact"]);
        let missing = FontDescriptor::from_css("Papyrus", 400, FontStyle::Normal);
        assert!(matches!(
            m.measure("x", &missing, 20.0, Orientation::Horizontal),
            Err(MeasureError::FontUnresolved(_))
        ));
        let known = FontDescriptor::from_css("IMPACT", 400, FontStyle::Normal);
        assert!(m.measure("x", &known, 20.0, Orientation::Horizontal).is_ok());
        let generic = FontDescriptor::from_css("Papyrus, serif", 400, FontStyle::Normal);
        assert!(m.measure("x", &generic, 20.0, Orientation::Horizontal).is_ok());
    }

    #[test]
    fn test_wide_script_gets_em_square() {
        let mut m = FixedMetrics::new();
        let outline = m.measure("雲", &sans(), 10.0, Orientation::Horizontal).unwrap();
        assert!((outline.bounds().width() - 9.2).abs() < 1e-4);
    }
}
