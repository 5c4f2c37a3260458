//! Shaping provider: real glyph ink bounds via `cosmic-text`.
//!
//! The text is shaped as a single line with a `FontSystem`, each glyph is
//! rasterized through the `SwashCache`, and the placement of every glyph
//! image becomes one ink box of the outline.  Whitespace and glyphs without
//! ink are skipped, so the outline hugs what is actually painted.
//!
//! ## Font resolution
//!
//! Without a registry the descriptor's chain is checked against the faces
//! cosmic-text's database knows about.  With a [`FontRegistry`] the chain is
//! resolved through it first and the matched family is handed to
//! cosmic-text.  Either way an unknown chain is reported, never substituted.

use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style as CStyle, SwashCache, Weight,
};
use wordcloud_core::{Orientation, Outline, Rect};

use crate::fonts::{FontDescriptor, FontRegistry, FontStyle, GenericFamily};
use crate::provider::{check_size, GlyphBoundsProvider, MeasureError};

/// Family as cosmic-text should see it.
#[derive(Clone, Debug, PartialEq)]
enum ResolvedFamily {
    Generic(GenericFamily),
    /// Exact name as stored in the font database.
    Named(String),
}

/// [`GlyphBoundsProvider`] backed by cosmic-text shaping and swash
/// rasterization.
pub struct ShapingProvider {
    pub font_system: FontSystem,
    pub swash_cache: SwashCache,
    registry: Option<FontRegistry>,
}

impl Default for ShapingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapingProvider {
    /// Provider over the system's fonts.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    /// Provider over a caller-prepared font system (e.g. bundled fonts).
    pub fn with_font_system(font_system: FontSystem) -> Self {
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            registry: None,
        }
    }

    /// Resolve descriptors through `registry` before shaping.
    pub fn with_registry(mut self, registry: FontRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn registry(&self) -> Option<&FontRegistry> {
        self.registry.as_ref()
    }

    /// Number of faces the font database holds.
    pub fn face_count(&self) -> usize {
        self.font_system.db().faces().count()
    }

    fn resolve_family(&self, font: &FontDescriptor) -> Result<ResolvedFamily, MeasureError> {
        if self.face_count() == 0 {
            return Err(MeasureError::FontUnresolved(font.to_string()));
        }
        if let Some(registry) = &self.registry {
            let matched = registry.resolve(font)?;
            return self
                .database_name(&matched.family)
                .map(ResolvedFamily::Named)
                .ok_or_else(|| MeasureError::FontUnresolved(font.to_string()));
        }
        for name in &font.families {
            if let Some(generic) = GenericFamily::parse(name) {
                return Ok(ResolvedFamily::Generic(generic));
            }
            if let Some(exact) = self.database_name(name) {
                return Ok(ResolvedFamily::Named(exact));
            }
        }
        Err(MeasureError::FontUnresolved(font.to_string()))
    }

    /// Case-insensitive lookup of a family name in the font database.
    fn database_name(&self, family: &str) -> Option<String> {
        self.font_system.db().faces().find_map(|face| {
            face.families
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(family))
                .map(|(name, _)| name.clone())
        })
    }

    /// Shape one line and collect the ink box of every painted glyph,
    /// relative to the pen origin on the baseline.
    fn ink_boxes(&mut self, text: &str, family: &ResolvedFamily, font: &FontDescriptor, size_px: f32) -> Vec<Rect> {
        let family = match family {
            ResolvedFamily::Generic(GenericFamily::Serif) => Family::Serif,
            ResolvedFamily::Generic(GenericFamily::SansSerif) => Family::SansSerif,
            ResolvedFamily::Generic(GenericFamily::Monospace) => Family::Monospace,
            ResolvedFamily::Named(name) => Family::Name(name),
        };
        let style = match font.style {
            FontStyle::Normal => CStyle::Normal,
            FontStyle::Italic => CStyle::Italic,
            FontStyle::Oblique => CStyle::Oblique,
        };
        let attrs = Attrs::new().family(family).weight(Weight(font.weight)).style(style);

        let metrics = Metrics::new(size_px, size_px * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut boxes = Vec::new();
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((0.0, 0.0), 1.0);
                let image = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical.cache_key);
                let Some(image) = image else {
                    continue;
                };
                if image.placement.width == 0 || image.placement.height == 0 {
                    continue;
                }
                boxes.push(Rect::from_rect(
                    physical.x as f32 + image.placement.left as f32,
                    physical.y as f32 - image.placement.top as f32,
                    image.placement.width as f32,
                    image.placement.height as f32,
                ));
            }
        }
        boxes
    }
}

impl GlyphBoundsProvider for ShapingProvider {
    fn measure(
        &mut self,
        text: &str,
        font: &FontDescriptor,
        size_px: f32,
        orientation: Orientation,
    ) -> Result<Outline, MeasureError> {
        check_size(text, size_px)?;
        let family = self.resolve_family(font)?;
        let boxes = self.ink_boxes(text, &family, font, size_px);
        let outline = Outline::from_rects(boxes);
        if outline.is_empty() {
            log::debug!("ShapingProvider: no ink for {text:?} in {font}");
            return Err(MeasureError::glyph(text, "no painted glyphs"));
        }
        Ok(outline.rotated(orientation))
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontFace;

    /// Shaping needs installed fonts; machines without any skip the checks.
    fn provider() -> Option<ShapingProvider> {
        let p = ShapingProvider::new();
        (p.face_count() > 0).then_some(p)
    }

    #[test]
    fn test_measure_word_has_ink() {
        let Some(mut p) = provider() else { return };
        let outline = p
            .measure("Hello", &FontDescriptor::default(), 32.0, Orientation::Horizontal)
            .unwrap();
        let b = outline.bounds();
        assert!(b.width() > 32.0);
        assert!(b.height() > 10.0);
        // Ink sits mostly above the baseline.
        assert!(b.min_y < 0.0);
    }

    #[test]
    fn test_measure_deterministic() {
        let Some(mut p) = provider() else { return };
        let font = FontDescriptor::default();
        let a = p.measure("cloud", &font, 24.0, Orientation::Vertical).unwrap();
        let b = p.measure("cloud", &font, 24.0, Orientation::Vertical).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_vertical_is_taller_than_wide() {
        let Some(mut p) = provider() else { return };
        let font = FontDescriptor::default();
        let v = p.measure("wordcloud", &font, 24.0, Orientation::Vertical).unwrap();
        assert!(v.bounds().height() > v.bounds().width());
    }

    #[test]
    fn test_whitespace_has_no_ink() {
        let Some(mut p) = provider() else { return };
        let err = p
            .measure("   ", &FontDescriptor::default(), 24.0, Orientation::Horizontal)
            .unwrap_err();
        assert!(matches!(err, MeasureError::GlyphRender { .. }));
    }

    #[test]
    fn test_unknown_family_unresolved() {
        let Some(mut p) = provider() else { return };
        let font = FontDescriptor::from_css("ZZZ Never Exists", 400, FontStyle::Normal);
        let err = p.measure("x", &font, 24.0, Orientation::Horizontal).unwrap_err();
        assert!(matches!(err, MeasureError::FontUnresolved(_)));
    }

    #[test]
    fn test_registry_miss_unresolved() {
        let Some(p) = provider() else { return };
        let registry = FontRegistry::from_faces(
            [(
                "Only Font",
                FontFace {
                    postscript_name: "OnlyFont".into(),
                    weight: 400,
                    style: FontStyle::Normal,
                },
            )],
            Vec::<(GenericFamily, &str)>::new(),
        );
        let mut p = p.with_registry(registry);
        let err = p
            .measure("x", &FontDescriptor::default(), 24.0, Orientation::Horizontal)
            .unwrap_err();
        assert!(matches!(err, MeasureError::FontUnresolved(_)));
    }

    #[test]
    fn test_empty_font_system_unresolved() {
        let db = cosmic_text::fontdb::Database::new();
        let mut p = ShapingProvider::with_font_system(FontSystem::new_with_locale_and_db(
            "en-US".into(),
            db,
        ));
        assert_eq!(p.face_count(), 0);
        let err = p
            .measure("x", &FontDescriptor::default(), 24.0, Orientation::Horizontal)
            .unwrap_err();
        assert!(matches!(err, MeasureError::FontUnresolved(_)));
    }
}
