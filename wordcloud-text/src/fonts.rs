//! Font descriptors and the system font registry.
//!
//! A [`FontDescriptor`] is a CSS-style request (`"Impact, Arial, sans-serif"`
//! plus weight and style).  The [`FontRegistry`] answers it against the fonts
//! `font-kit` finds on the machine.  Resolution is strict: when no family in
//! the chain exists the registry reports [`MeasureError::FontUnresolved`]
//! instead of quietly picking something else, so the caller decides whether
//! a fallback font is acceptable.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use font_kit::family_name::FamilyName;
use font_kit::properties::{Properties as FkProperties, Style as FkStyle};
use font_kit::source::SystemSource;

use crate::provider::MeasureError;

// ── Descriptor ──────────────────────────────────────────────────────

/// Font style (normal, italic, or oblique).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// CSS generic font families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenericFamily {
    Serif,
    SansSerif,
    Monospace,
}

impl GenericFamily {
    /// Parse a generic family keyword (already lowercased).
    pub fn parse(name: &str) -> Option<GenericFamily> {
        match name {
            "serif" => Some(GenericFamily::Serif),
            "sans-serif" => Some(GenericFamily::SansSerif),
            "monospace" => Some(GenericFamily::Monospace),
            _ => None,
        }
    }
}

/// Requested font: an ordered family fallback chain plus weight and style.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontDescriptor {
    /// Lowercased family names, most preferred first.
    pub families: Vec<String>,
    /// Weight (100–900). 400 = normal, 700 = bold.
    pub weight: u16,
    pub style: FontStyle,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            families: vec!["sans-serif".into()],
            weight: 400,
            style: FontStyle::Normal,
        }
    }
}

impl FontDescriptor {
    /// Parse a CSS-like family list (`"\"Times New Roman\", serif"`).
    pub fn from_css(family_str: &str, weight: u16, style: FontStyle) -> Self {
        let families: Vec<String> = family_str
            .split(',')
            .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            families: if families.is_empty() {
                vec!["sans-serif".into()]
            } else {
                families
            },
            weight,
            style,
        }
    }

    /// First family of the chain.
    pub fn primary(&self) -> &str {
        self.families.first().map(String::as_str).unwrap_or("sans-serif")
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.families.join(", "), self.weight)?;
        match self.style {
            FontStyle::Normal => Ok(()),
            FontStyle::Italic => write!(f, " italic"),
            FontStyle::Oblique => write!(f, " oblique"),
        }
    }
}

// ── Registry ────────────────────────────────────────────────────────

/// One face inside a family.
#[derive(Clone, Debug, PartialEq)]
pub struct FontFace {
    pub postscript_name: String,
    pub weight: u16,
    pub style: FontStyle,
}

/// Result of resolving a descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct FontMatch {
    /// Family name as known to the registry (lowercase).
    pub family: String,
    pub face: FontFace,
    /// True when the chain was satisfied by a generic keyword.
    pub via_generic: bool,
}

/// Installed fonts, indexed by lowercased family name.
pub struct FontRegistry {
    families: HashMap<String, Vec<FontFace>>,
    generic_map: HashMap<GenericFamily, String>,
    discovery_time_ms: f64,
}

impl FontRegistry {
    /// Enumerate the system's fonts.  I/O bound; call once and keep the
    /// registry around.
    pub fn discover() -> Self {
        let start = Instant::now();
        let source = SystemSource::new();

        let mut families: HashMap<String, Vec<FontFace>> = HashMap::new();
        if let Ok(family_names) = source.all_families() {
            for family_name in &family_names {
                let Ok(handle) = source.select_family_by_name(family_name) else {
                    continue;
                };
                let faces: Vec<FontFace> = handle
                    .fonts()
                    .iter()
                    .filter_map(|h| h.load().ok())
                    .map(|font| {
                        let props = font.properties();
                        FontFace {
                            postscript_name: font.postscript_name().unwrap_or_default(),
                            weight: props.weight.0 as u16,
                            style: convert_style(props.style),
                        }
                    })
                    .collect();
                if !faces.is_empty() {
                    families.insert(family_name.to_lowercase(), faces);
                }
            }
        }

        let generic_map = resolve_generics(&source);
        let discovery_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        log::info!(
            "FontRegistry: {} families discovered ({:.1}ms)",
            families.len(),
            discovery_time_ms,
        );

        Self {
            families,
            generic_map,
            discovery_time_ms,
        }
    }

    /// Registry over an explicit set of faces, without touching the system.
    pub fn from_faces<'a>(
        faces: impl IntoIterator<Item = (&'a str, FontFace)>,
        generics: impl IntoIterator<Item = (GenericFamily, &'a str)>,
    ) -> Self {
        let mut families: HashMap<String, Vec<FontFace>> = HashMap::new();
        for (family, face) in faces {
            families.entry(family.to_lowercase()).or_default().push(face);
        }
        let generic_map = generics
            .into_iter()
            .map(|(g, name)| (g, name.to_lowercase()))
            .collect();
        Self {
            families,
            generic_map,
            discovery_time_ms: 0.0,
        }
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn discovery_time_ms(&self) -> f64 {
        self.discovery_time_ms
    }

    pub fn has_family(&self, name: &str) -> bool {
        self.families.contains_key(&name.to_lowercase())
    }

    /// Family names starting with `prefix`, sorted.
    pub fn families_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_lowercase();
        let mut names: Vec<&str> = self
            .families
            .keys()
            .map(String::as_str)
            .filter(|n| n.starts_with(&prefix))
            .collect();
        names.sort_unstable();
        names
    }

    /// Walk the descriptor's chain and return the first family that exists,
    /// with its closest face.
    pub fn resolve(&self, descriptor: &FontDescriptor) -> Result<FontMatch, MeasureError> {
        for name in &descriptor.families {
            let (family, via_generic) = match GenericFamily::parse(name) {
                Some(generic) => match self.generic_map.get(&generic) {
                    Some(concrete) => (concrete, true),
                    None => continue,
                },
                None => (name, false),
            };
            if let Some(face) = self.families.get(family).and_then(|f| best_match(f, descriptor)) {
                return Ok(FontMatch {
                    family: family.clone(),
                    face,
                    via_generic,
                });
            }
        }
        Err(MeasureError::FontUnresolved(descriptor.to_string()))
    }
}

impl fmt::Display for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FontRegistry({} families, {:.1}ms)",
            self.families.len(),
            self.discovery_time_ms,
        )
    }
}

/// Closest face: style first, then weight.
fn best_match(faces: &[FontFace], desc: &FontDescriptor) -> Option<FontFace> {
    faces
        .iter()
        .min_by_key(|face| match_score(face, desc))
        .cloned()
}

/// Lower is better.
fn match_score(face: &FontFace, desc: &FontDescriptor) -> u32 {
    let style_diff = style_distance(face.style, desc.style) as u32;
    let weight_diff = (face.weight as i32 - desc.weight as i32).unsigned_abs();
    style_diff * 1000 + weight_diff
}

fn style_distance(a: FontStyle, b: FontStyle) -> u8 {
    match (a, b) {
        _ if a == b => 0,
        (FontStyle::Italic, FontStyle::Oblique) | (FontStyle::Oblique, FontStyle::Italic) => 1,
        _ => 2,
    }
}

fn convert_style(style: FkStyle) -> FontStyle {
    match style {
        FkStyle::Normal => FontStyle::Normal,
        FkStyle::Italic => FontStyle::Italic,
        FkStyle::Oblique => FontStyle::Oblique,
    }
}

fn resolve_generics(source: &SystemSource) -> HashMap<GenericFamily, String> {
    let props = FkProperties::new();
    [
        (GenericFamily::Serif, FamilyName::Serif),
        (GenericFamily::SansSerif, FamilyName::SansSerif),
        (GenericFamily::Monospace, FamilyName::Monospace),
    ]
    .into_iter()
    .filter_map(|(generic, fk_name)| {
        let font = source.select_best_match(&[fk_name], &props).ok()?.load().ok()?;
        let name = font.family_name();
        (!name.is_empty()).then(|| (generic, name.to_lowercase()))
    })
    .collect()
}

// ===================================================================
// Tests
// ===================================================================
