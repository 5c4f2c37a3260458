//! # wordcloud-text
//!
//! Glyph bounds for the word-cloud placement engine: given a word, a font,
//! a pixel size and an orientation, produce the closed outline that covers
//! the painted glyphs.
//!
//! ## Architecture
//!
//! ```text
//! GlyphBoundsProvider (trait)
//!     ├── FixedMetrics      table-driven, font-free, deterministic
//!     ├── ShapingProvider   cosmic-text shaping + swash ink boxes
//!     └── CachedProvider<P> LRU memoisation over any provider
//!
//! FontRegistry (font-kit) ── resolve(FontDescriptor) ──▸ FontMatch | FontUnresolved
//! ```
//!
//! - **`provider`**: the trait and `MeasureError`.
//! - **`fonts`**: descriptors and the system font registry.
//! - **`metrics`**: the fixed-metric provider.
//! - **`engine`**: the cosmic-text provider.
//! - **`cache`**: the LRU wrapper.

pub mod cache;
pub mod engine;
pub mod fonts;
pub mod metrics;
pub mod provider;

// Re-exports for ergonomic use.
pub use cache::CachedProvider;
pub use engine::ShapingProvider;
pub use fonts::{FontDescriptor, FontFace, FontMatch, FontRegistry, FontStyle, GenericFamily};
pub use metrics::FixedMetrics;
pub use provider::{GlyphBoundsProvider, MeasureError};
