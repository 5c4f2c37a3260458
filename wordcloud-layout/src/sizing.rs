//! Weight → font size, and the descending size tiers tried per word.

use crate::config::{LayoutConfig, SizeScale};

fn curve(scale: SizeScale, w: f32) -> f32 {
    match scale {
        SizeScale::Linear => w,
        SizeScale::Sqrt => w.max(0.0).sqrt(),
        SizeScale::Log => w.max(0.0).ln_1p(),
    }
}

/// Map `weight` into `[min_font_size, max_font_size]`.
///
/// The weight is first pushed through the configured curve, then placed
/// linearly between the curved `min_weight` and `max_weight`.  When every
/// word weighs the same there is nothing to spread, and all of them get
/// the maximum size.
pub fn font_size_for_weight(
    weight: f32,
    min_weight: f32,
    max_weight: f32,
    config: &LayoutConfig,
) -> f32 {
    let lo = curve(config.size_scale, min_weight);
    let hi = curve(config.size_scale, max_weight);
    let span = hi - lo;
    if !(span > f32::EPSILON) {
        return config.max_font_size;
    }
    let t = ((curve(config.size_scale, weight) - lo) / span).clamp(0.0, 1.0);
    config.min_font_size + t * (config.max_font_size - config.min_font_size)
}

/// Sizes tried for a word, largest first.
///
/// Each tier is the previous one times `size_decrement_factor`, up to
/// `max_size_tiers` entries.  A tier that would drop below `min_font_size`
/// is clamped to it and ends the list.
pub fn size_tiers(base: f32, config: &LayoutConfig) -> Vec<f32> {
    let floor = config.min_font_size;
    let mut tiers = Vec::with_capacity(config.max_size_tiers);
    let mut size = base.max(floor);
    for _ in 0..config.max_size_tiers {
        tiers.push(size);
        if size <= floor {
            break;
        }
        size = (size * config.size_decrement_factor).max(floor);
    }
    tiers
}
