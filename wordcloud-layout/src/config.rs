use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wordcloud_core::{ColorLibrary, ColorParseError, Orientation, Rgba};
use wordcloud_text::{FontDescriptor, FontStyle};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Palette color {name:?}: {source}")]
    Color {
        name: String,
        #[source]
        source: ColorParseError,
    },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

// ── Enumerations ────────────────────────────────────────────────────

/// Curve mapping normalised weight onto the font size range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeScale {
    Linear,
    #[default]
    Sqrt,
    Log,
}

/// Placement order of the words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortPolicy {
    /// Heaviest first; equal weights keep input order.
    #[default]
    WeightDescending,
    /// By color sort value, brightest first, weight breaking ties.
    ColorBrightness,
}

// ── Sub-sections ────────────────────────────────────────────────────

/// Spiral walk parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    /// Largest angle between consecutive candidates, radians.
    pub angular_step: f32,
    /// Radius gained per full turn, pixels.
    pub radial_growth: f32,
    /// Upper bound on the arc length between candidates, pixels.
    pub max_arc_step: f32,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            angular_step: 0.35,
            radial_growth: 6.0,
            max_arc_step: 3.0,
        }
    }
}

/// Relative odds of each orientation.  Zero disables one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationWeights {
    pub horizontal: f32,
    pub vertical: f32,
    pub flipped_vertical: f32,
}

impl Default for OrientationWeights {
    fn default() -> Self {
        Self {
            horizontal: 3.0,
            vertical: 1.0,
            flipped_vertical: 0.0,
        }
    }
}

impl OrientationWeights {
    /// Weights in [`Orientation::ALL`] order.
    pub fn as_array(&self) -> [f32; 3] {
        [self.horizontal, self.vertical, self.flipped_vertical]
    }

    pub fn only(orientation: Orientation) -> Self {
        let mut weights = Self {
            horizontal: 0.0,
            vertical: 0.0,
            flipped_vertical: 0.0,
        };
        match orientation {
            Orientation::Horizontal => weights.horizontal = 1.0,
            Orientation::Vertical => weights.vertical = 1.0,
            Orientation::FlippedVertical => weights.flipped_vertical = 1.0,
        }
        weights
    }
}

/// Global stopping conditions.  `None` disables a limit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Candidates evaluated across all words.
    pub max_total_attempts: Option<u64>,
    /// Wall-clock limit for the whole run.
    pub timeout_ms: Option<u64>,
}

// ── LayoutConfig ────────────────────────────────────────────────────

/// Everything a layout run can be tuned with.
///
/// Every field has a default, so a JSON document only needs the values it
/// changes:
///
/// ```json
/// { "max_font_size": 96, "sort_policy": "ColorBrightness", "seed": 7 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Smallest size a word may shrink to, pixels.
    pub min_font_size: f32,
    /// Size given to the heaviest word, pixels.
    pub max_font_size: f32,
    pub size_scale: SizeScale,
    /// Multiplier applied per size tier, in `(0, 1)`.
    pub size_decrement_factor: f32,
    pub max_attempts_per_word: usize,
    /// Size tiers tried per word, including the first.
    pub max_size_tiers: usize,
    pub spiral: SpiralConfig,
    pub orientation_weights: OrientationWeights,
    pub sort_policy: SortPolicy,
    /// Brightness bias for [`SortPolicy::ColorBrightness`], in `[0, 1]`.
    pub sort_adjustment: f32,
    pub budget: BudgetConfig,
    /// Words beyond this count are skipped without being measured.
    pub max_words: Option<usize>,
    /// Minimum gap kept around every word, pixels.
    pub word_padding: u32,
    /// How far the spiral seed is pulled from the canvas center toward
    /// recently placed words, in `[0, 1]`.
    pub cluster_bias: f32,
    /// Number of recent placements averaged for the seed point.
    pub seed_window: usize,
    pub seed: u64,
    /// CSS-style family list.
    pub font_family: String,
    /// Tried once when the primary font cannot be resolved or rendered.
    pub fallback_font_family: Option<String>,
    pub font_weight: u16,
    /// Color names or `#rrggbb[aa]`; cycled over words without a color.
    pub palette: Vec<String>,
    pub shuffle_palette: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_font_size: 8.0,
            max_font_size: 72.0,
            size_scale: SizeScale::default(),
            size_decrement_factor: 0.85,
            max_attempts_per_word: 8_000,
            max_size_tiers: 6,
            spiral: SpiralConfig::default(),
            orientation_weights: OrientationWeights::default(),
            sort_policy: SortPolicy::default(),
            sort_adjustment: 0.5,
            budget: BudgetConfig::default(),
            max_words: None,
            word_padding: 1,
            cluster_bias: 0.25,
            seed_window: 8,
            seed: 0,
            font_family: "sans-serif".to_string(),
            fallback_font_family: None,
            font_weight: 400,
            palette: vec![
                "#1f77b4".into(),
                "#ff7f0e".into(),
                "#2ca02c".into(),
                "#d62728".into(),
                "#9467bd".into(),
                "#8c564b".into(),
            ],
            shuffle_palette: false,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: LayoutConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the placer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_font_size.is_finite() && self.min_font_size > 0.0) {
            return Err(invalid("min_font_size", "must be a positive number"));
        }
        if !(self.max_font_size.is_finite() && self.max_font_size >= self.min_font_size) {
            return Err(invalid("max_font_size", "must be at least min_font_size"));
        }
        if !(self.size_decrement_factor > 0.0 && self.size_decrement_factor < 1.0) {
            return Err(invalid("size_decrement_factor", "must lie strictly between 0 and 1"));
        }
        if self.max_attempts_per_word == 0 {
            return Err(invalid("max_attempts_per_word", "must be at least 1"));
        }
        if self.max_size_tiers == 0 {
            return Err(invalid("max_size_tiers", "must be at least 1"));
        }
        let spiral = &self.spiral;
        if !(spiral.angular_step > 0.0 && spiral.angular_step <= std::f32::consts::PI) {
            return Err(invalid("spiral.angular_step", "must lie in (0, π]"));
        }
        if !(spiral.radial_growth.is_finite() && spiral.radial_growth >= 0.1) {
            return Err(invalid("spiral.radial_growth", "must be at least 0.1"));
        }
        if !(spiral.max_arc_step.is_finite() && spiral.max_arc_step > 0.0) {
            return Err(invalid("spiral.max_arc_step", "must be positive"));
        }
        let weights = self.orientation_weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid("orientation_weights", "weights must be non-negative"));
        }
        if weights.iter().all(|w| *w == 0.0) {
            return Err(invalid("orientation_weights", "at least one orientation must be enabled"));
        }
        if !(0.0..=1.0).contains(&self.sort_adjustment) {
            return Err(invalid("sort_adjustment", "must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.cluster_bias) {
            return Err(invalid("cluster_bias", "must lie in [0, 1]"));
        }
        if !(1..=1000).contains(&self.font_weight) {
            return Err(invalid("font_weight", "must lie in 1..=1000"));
        }
        if self.font_family.trim().is_empty() {
            return Err(invalid("font_family", "must not be empty"));
        }
        Ok(())
    }

    pub fn font(&self) -> FontDescriptor {
        FontDescriptor::from_css(&self.font_family, self.font_weight, FontStyle::Normal)
    }

    pub fn fallback_font(&self) -> Option<FontDescriptor> {
        self.fallback_font_family
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map(|f| FontDescriptor::from_css(f, self.font_weight, FontStyle::Normal))
    }

    /// Resolve every palette entry against `library`.  Fails on the first
    /// unknown name; an empty palette resolves to black.
    pub fn resolve_palette(&self, library: &ColorLibrary) -> Result<Vec<Rgba>, ConfigError> {
        if self.palette.is_empty() {
            return Ok(vec![Rgba::BLACK]);
        }
        self.palette
            .iter()
            .map(|name| {
                library.resolve(name).map_err(|source| ConfigError::Color {
                    name: name.clone(),
                    source,
                })
            })
            .collect()
    }
}
