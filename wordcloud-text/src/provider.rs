//! The glyph-bounds boundary consumed by the placement engine.
//!
//! A provider turns `(text, font, size, orientation)` into the closed
//! [`Outline`] that tightly covers the rendered glyphs.  Outlines are in
//! text-local pixels: the pen starts at the origin on the baseline, x grows
//! along the text, and the orientation's quarter turn is applied about the
//! origin.  The placement engine recenters them, so only shape and extent
//! matter.
//!
//! Providers must be deterministic: identical inputs yield identical outlines.

use thiserror::Error;
use wordcloud_core::{Orientation, Outline};

use crate::fonts::FontDescriptor;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// No family in the descriptor's chain is available.
    #[error("Font unresolved: {0}")]
    FontUnresolved(String),

    /// The font resolved but the text produced no usable glyph outline.
    #[error("Cannot render glyphs for {text:?}: {reason}")]
    GlyphRender { text: String, reason: String },

    /// The backend itself failed; measuring anything else is pointless.
    #[error("Glyph backend failure: {0}")]
    Backend(String),
}

impl MeasureError {
    /// Whether the caller can carry on with other words (or another font).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MeasureError::Backend(_))
    }

    pub(crate) fn glyph(text: &str, reason: impl Into<String>) -> Self {
        MeasureError::GlyphRender {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Source of word outlines.
pub trait GlyphBoundsProvider {
    fn measure(
        &mut self,
        text: &str,
        font: &FontDescriptor,
        size_px: f32,
        orientation: Orientation,
    ) -> Result<Outline, MeasureError>;
}

impl<P: GlyphBoundsProvider + ?Sized> GlyphBoundsProvider for &mut P {
    fn measure(
        &mut self,
        text: &str,
        font: &FontDescriptor,
        size_px: f32,
        orientation: Orientation,
    ) -> Result<Outline, MeasureError> {
        (**self).measure(text, font, size_px, orientation)
    }
}

impl<P: GlyphBoundsProvider + ?Sized> GlyphBoundsProvider for Box<P> {
    fn measure(
        &mut self,
        text: &str,
        font: &FontDescriptor,
        size_px: f32,
        orientation: Orientation,
    ) -> Result<Outline, MeasureError> {
        (**self).measure(text, font, size_px, orientation)
    }
}

/// Reject sizes no backend can honour.
pub(crate) fn check_size(text: &str, size_px: f32) -> Result<(), MeasureError> {
    if size_px.is_finite() && size_px > 0.0 {
        Ok(())
    } else {
        Err(MeasureError::glyph(text, format!("invalid font size {size_px}")))
    }
}
