//! Occupancy region: scan-line run-length set of covered pixels.
//!
//! The region stores covered area as horizontal **bands**: maximal runs of
//! pixel rows that share the same set of covered x-**spans**.  A word a few
//! dozen pixels tall collapses to a handful of bands, and a full canvas of
//! placed words stays in the low thousands.
//!
//! # Design decisions
//!
//! * **Pixel grid, conservative coverage.**  A pixel `(x, y)` is covered
//!   when its open unit square shares any area with the shape.  Two shapes
//!   whose regions are disjoint therefore never overlap geometrically, even
//!   with no padding between them.  The rule is the same for rectangles and
//!   outlines, and it is invariant under integer translation, so an outline
//!   rasterized once at the origin can be probed at any integer offset
//!   without rasterizing again.
//! * **No allocation on the probe path.**  [`OccupancyRegion::intersects_translated`]
//!   binary-searches the bands and walks spans with two cursors.
//! * **Canonical form.**  Bands are sorted and non-overlapping, spans are
//!   sorted, disjoint and non-adjacent, and vertically adjacent bands with
//!   equal spans are merged.  Union is therefore idempotent: merging an
//!   already-covered shape leaves the region bit-for-bit unchanged.
//! * **Union-only growth.**  A layout run never removes area.  The only
//!   subtraction, [`OccupancyRegion::complement_within`], builds a new
//!   region for an exclusion mask before the run starts.

use thiserror::Error;
use wordcloud_core::{Outline, Point, Rect};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    #[error("Mask buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

// ───────────────────────────────────────────────────────────────────
// PixelRect
// ───────────────────────────────────────────────────────────────────

/// Half-open integer rectangle `[left, right) × [top, bottom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Smallest pixel rectangle covering `rect`.
    pub fn from_rect(rect: &Rect) -> Self {
        Self {
            left: rect.min_x.floor() as i32,
            top: rect.min_y.floor() as i32,
            right: rect.max_x.ceil() as i32,
            bottom: rect.max_y.ceil() as i32,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    #[inline]
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    pub fn to_rect(&self) -> Rect {
        Rect {
            min_x: self.left as f32,
            min_y: self.top as f32,
            max_x: self.right as f32,
            max_y: self.bottom as f32,
        }
    }
}

/// Pixels `[floor(x0), ceil(x1))` touched by the interval `x0..x1`.
#[inline(always)]
fn covering_span(x0: f32, x1: f32) -> Span {
    Span {
        left: x0.floor() as i32,
        right: x1.ceil() as i32,
    }
}

/// X-extent of the part of segment `p0 p1` inside the open strip
/// `top < y < bottom`.
fn edge_extent_in_row(p0: Point, p1: Point, top: f32, bottom: f32) -> Option<(f32, f32)> {
    let (a, b) = if p0.y <= p1.y { (p0, p1) } else { (p1, p0) };
    if a.y >= bottom || b.y <= top {
        return None;
    }
    if b.y == a.y {
        return Some((a.x.min(b.x), a.x.max(b.x)));
    }
    let x_at = |y: f32| a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x);
    let (x0, x1) = (x_at(a.y.max(top)), x_at(b.y.min(bottom)));
    Some((x0.min(x1), x0.max(x1)))
}

// ───────────────────────────────────────────────────────────────────
// Bands and spans
// ───────────────────────────────────────────────────────────────────

/// Covered pixels `[left, right)` within a band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    left: i32,
    right: i32,
}

/// Rows `[top, bottom)` sharing one span list.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Band {
    top: i32,
    bottom: i32,
    spans: Vec<Span>,
}

/// Append a band, merging it into the previous one when they touch and
/// carry the same spans.  Empty span lists are dropped.
fn push_band(bands: &mut Vec<Band>, top: i32, bottom: i32, spans: Vec<Span>) {
    if spans.is_empty() || top >= bottom {
        return;
    }
    if let Some(last) = bands.last_mut() {
        if last.bottom == top && last.spans == spans {
            last.bottom = bottom;
            return;
        }
    }
    bands.push(Band { top, bottom, spans });
}

/// Sort and merge overlapping or touching spans in place.
fn normalize_spans(spans: &mut Vec<Span>) {
    spans.retain(|s| s.left < s.right);
    spans.sort_unstable_by_key(|s| s.left);
    let mut out: Vec<Span> = Vec::with_capacity(spans.len());
    for s in spans.drain(..) {
        match out.last_mut() {
            Some(last) if last.right >= s.left => last.right = last.right.max(s.right),
            _ => out.push(s),
        }
    }
    *spans = out;
}

fn union_spans(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut out: Vec<Span> = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        let next = if j >= b.len() || (i < a.len() && a[i].left <= b[j].left) {
            i += 1;
            a[i - 1]
        } else {
            j += 1;
            b[j - 1]
        };
        match out.last_mut() {
            Some(last) if last.right >= next.left => last.right = last.right.max(next.right),
            _ => out.push(next),
        }
    }
    out
}

/// `a` minus `b`.
fn difference_spans(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut out = Vec::with_capacity(a.len());
    let mut j = 0;
    for s in a {
        while j < b.len() && b[j].right <= s.left {
            j += 1;
        }
        let mut left = s.left;
        let mut k = j;
        while k < b.len() && b[k].left < s.right {
            if b[k].left > left {
                out.push(Span { left, right: b[k].left });
            }
            left = left.max(b[k].right);
            if left >= s.right {
                break;
            }
            k += 1;
        }
        if left < s.right {
            out.push(Span { left, right: s.right });
        }
    }
    out
}

/// Any overlap between `a` and `b` shifted right by `dx`.
#[inline]
fn spans_overlap(a: &[Span], b: &[Span], dx: i32) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let (bl, br) = (b[j].left + dx, b[j].right + dx);
        if a[i].right <= bl {
            i += 1;
        } else if br <= a[i].left {
            j += 1;
        } else {
            return true;
        }
    }
    false
}

#[derive(Clone, Copy)]
enum SpanOp {
    Union,
    Difference,
}

/// Band-wise boolean combination of two canonical band lists.
fn combine(a: &[Band], b: &[Band], op: SpanOp) -> Vec<Band> {
    let mut edges: Vec<i32> = a
        .iter()
        .chain(b.iter())
        .flat_map(|band| [band.top, band.bottom])
        .collect();
    edges.sort_unstable();
    edges.dedup();

    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut ia, mut ib) = (0, 0);
    for window in edges.windows(2) {
        let (y0, y1) = (window[0], window[1]);
        while ia < a.len() && a[ia].bottom <= y0 {
            ia += 1;
        }
        while ib < b.len() && b[ib].bottom <= y0 {
            ib += 1;
        }
        let sa: &[Span] = match a.get(ia) {
            Some(band) if band.top <= y0 => &band.spans,
            _ => &[],
        };
        let sb: &[Span] = match b.get(ib) {
            Some(band) if band.top <= y0 => &band.spans,
            _ => &[],
        };
        let spans = match op {
            SpanOp::Union => union_spans(sa, sb),
            SpanOp::Difference => difference_spans(sa, sb),
        };
        push_band(&mut out, y0, y1, spans);
    }
    out
}

// ───────────────────────────────────────────────────────────────────
// OccupancyRegion
// ───────────────────────────────────────────────────────────────────

/// Union of everything already claimed on the canvas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyRegion {
    bands: Vec<Band>,
    /// Cached bounding box; `None` when empty.
    bounds: Option<PixelRect>,
}

impl OccupancyRegion {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_bands(bands: Vec<Band>) -> Self {
        let mut region = Self { bands, bounds: None };
        region.refresh_bounds();
        region
    }

    pub fn from_pixel_rect(rect: PixelRect) -> Self {
        if rect.is_empty() {
            return Self::new();
        }
        Self::from_bands(vec![Band {
            top: rect.top,
            bottom: rect.bottom,
            spans: vec![Span {
                left: rect.left,
                right: rect.right,
            }],
        }])
    }

    pub fn from_rect(rect: &Rect) -> Self {
        Self::from_pixel_rect(PixelRect::from_rect(rect))
    }

    /// Rasterize an outline conservatively.  Each contour is filled
    /// even-odd on its own; the region is the union of the contours.
    ///
    /// Within one pixel row the shape's horizontal extent is the even-odd
    /// span at the row's middle plus the extent of every edge crossing the
    /// row, so slivers thinner than a pixel are still covered.
    pub fn from_outline(outline: &Outline) -> Self {
        if outline.is_empty() {
            return Self::new();
        }
        let rows = PixelRect::from_rect(&outline.bounds());
        let mut bands = Vec::new();
        let mut crossings: Vec<f32> = Vec::new();
        for y in rows.top..rows.bottom {
            let (top, bottom) = (y as f32, y as f32 + 1.0);
            let middle = top + 0.5;
            let mut spans = Vec::new();
            for contour in outline.contours() {
                crossings.clear();
                let n = contour.len();
                for i in 0..n {
                    let p0 = contour[i];
                    let p1 = contour[(i + 1) % n];
                    if (p0.y <= middle) != (p1.y <= middle) {
                        let t = (middle - p0.y) / (p1.y - p0.y);
                        crossings.push(p0.x + t * (p1.x - p0.x));
                    }
                    if let Some((x0, x1)) = edge_extent_in_row(p0, p1, top, bottom) {
                        spans.push(covering_span(x0, x1));
                    }
                }
                crossings.sort_unstable_by(f32::total_cmp);
                for pair in crossings.chunks_exact(2) {
                    spans.push(covering_span(pair[0], pair[1]));
                }
            }
            normalize_spans(&mut spans);
            push_band(&mut bands, y, y + 1, spans);
        }
        Self::from_bands(bands)
    }

    /// Build an exclusion region from an 8-bit alpha mask (row-major,
    /// `width * height` bytes).  Pixels with alpha at or above `threshold`
    /// are occupied.
    pub fn from_alpha_mask(
        width: u32,
        height: u32,
        alpha: &[u8],
        threshold: u8,
    ) -> Result<Self, MaskError> {
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(MaskError::SizeMismatch {
                width,
                height,
                expected,
                actual: alpha.len(),
            });
        }
        if width == 0 {
            return Ok(Self::new());
        }
        let mut bands = Vec::new();
        for (y, row) in alpha.chunks_exact(width as usize).enumerate() {
            let mut spans = Vec::new();
            let mut run_start: Option<i32> = None;
            for (x, &a) in row.iter().enumerate() {
                match (a >= threshold, run_start) {
                    (true, None) => run_start = Some(x as i32),
                    (false, Some(start)) => {
                        spans.push(Span { left: start, right: x as i32 });
                        run_start = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = run_start {
                spans.push(Span { left: start, right: width as i32 });
            }
            push_band(&mut bands, y as i32, y as i32 + 1, spans);
        }
        Ok(Self::from_bands(bands))
    }

    /// Everything inside `bounds` that this region does not cover.  Turns
    /// an "allowed area" into an exclusion mask.
    pub fn complement_within(&self, bounds: PixelRect) -> OccupancyRegion {
        let frame = Self::from_pixel_rect(bounds);
        Self::from_bands(combine(&frame.bands, &self.bands, SpanOp::Difference))
    }

    // ───────────────────── queries ─────────────────────

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    #[inline]
    pub fn bounds(&self) -> Option<PixelRect> {
        self.bounds
    }

    /// Covered area in pixels.
    pub fn area(&self) -> u64 {
        self.bands
            .iter()
            .map(|b| {
                let width: i64 = b.spans.iter().map(|s| (s.right - s.left) as i64).sum();
                (b.bottom - b.top) as i64 * width
            })
            .sum::<i64>() as u64
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn span_count(&self) -> usize {
        self.bands.iter().map(|b| b.spans.len()).sum()
    }

    /// Whether pixel `(x, y)` is covered.
    pub fn contains_pixel(&self, x: i32, y: i32) -> bool {
        let i = self.bands.partition_point(|b| b.bottom <= y);
        match self.bands.get(i) {
            Some(band) if band.top <= y => band.spans.iter().any(|s| s.left <= x && x < s.right),
            _ => false,
        }
    }

    /// Whether `other`, shifted by `(dx, dy)` pixels, shares any pixel with
    /// this region.  Always false when either side is empty.
    pub fn intersects_translated(&self, other: &OccupancyRegion, dx: i32, dy: i32) -> bool {
        let (Some(mine), Some(theirs)) = (self.bounds, other.bounds) else {
            return false;
        };
        let shifted = PixelRect::new(
            theirs.left + dx,
            theirs.top + dy,
            theirs.right + dx,
            theirs.bottom + dy,
        );
        if !mine.overlaps(&shifted) {
            return false;
        }

        for band in &other.bands {
            let (top, bottom) = (band.top + dy, band.bottom + dy);
            if bottom <= mine.top {
                continue;
            }
            if top >= mine.bottom {
                break;
            }
            let start = self.bands.partition_point(|b| b.bottom <= top);
            for own in &self.bands[start..] {
                if own.top >= bottom {
                    break;
                }
                if spans_overlap(&own.spans, &band.spans, dx) {
                    return true;
                }
            }
        }
        false
    }

    pub fn intersects(&self, other: &OccupancyRegion) -> bool {
        self.intersects_translated(other, 0, 0)
    }

    /// Whether `outline` shares area with the region.
    pub fn intersects_outline(&self, outline: &Outline) -> bool {
        if self.is_empty() {
            return false;
        }
        self.intersects(&Self::from_outline(outline))
    }

    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        if self.is_empty() {
            return false;
        }
        self.intersects(&Self::from_rect(rect))
    }

    // ───────────────────── derived regions ─────────────────────

    /// Copy shifted by whole pixels.
    pub fn translated(&self, dx: i32, dy: i32) -> OccupancyRegion {
        let bands = self
            .bands
            .iter()
            .map(|b| Band {
                top: b.top + dy,
                bottom: b.bottom + dy,
                spans: b
                    .spans
                    .iter()
                    .map(|s| Span {
                        left: s.left + dx,
                        right: s.right + dx,
                    })
                    .collect(),
            })
            .collect();
        Self::from_bands(bands)
    }

    /// Grow every covered pixel into a `(2 * pad + 1)` square.  Used to keep
    /// a gap between neighbouring words.
    pub fn dilated(&self, pad: u32) -> OccupancyRegion {
        if pad == 0 || self.is_empty() {
            return self.clone();
        }
        let pad = pad as i32;
        let mut grown = OccupancyRegion::new();
        for band in &self.bands {
            let mut spans: Vec<Span> = band
                .spans
                .iter()
                .map(|s| Span {
                    left: s.left - pad,
                    right: s.right + pad,
                })
                .collect();
            normalize_spans(&mut spans);
            let slab = OccupancyRegion::from_bands(vec![Band {
                top: band.top - pad,
                bottom: band.bottom + pad,
                spans,
            }]);
            grown.union(&slab);
        }
        grown
    }

    // ───────────────────── mutation ─────────────────────

    /// Merge `other` into this region.
    pub fn union(&mut self, other: &OccupancyRegion) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other.clone();
            return;
        }
        self.bands = combine(&self.bands, &other.bands, SpanOp::Union);
        self.refresh_bounds();
    }

    pub fn union_outline(&mut self, outline: &Outline) {
        self.union(&Self::from_outline(outline));
    }

    pub fn union_rect(&mut self, rect: &Rect) {
        self.union(&Self::from_rect(rect));
    }

    fn refresh_bounds(&mut self) {
        self.bounds = match (self.bands.first(), self.bands.last()) {
            (Some(first), Some(last)) => {
                let left = self
                    .bands
                    .iter()
                    .filter_map(|b| b.spans.first())
                    .map(|s| s.left)
                    .min()
                    .unwrap_or(0);
                let right = self
                    .bands
                    .iter()
                    .filter_map(|b| b.spans.last())
                    .map(|s| s.right)
                    .max()
                    .unwrap_or(0);
                Some(PixelRect::new(left, first.top, right, last.bottom))
            }
            _ => None,
        };
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wordcloud_core::{Orientation, Point};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> OccupancyRegion {
        OccupancyRegion::from_rect(&Rect::from_rect(x, y, w, h))
    }

    // ─────────────── construction ───────────────

    #[test]
    fn test_empty_region() {
        let region = OccupancyRegion::new();
        assert!(region.is_empty());
        assert_eq!(region.area(), 0);
        assert_eq!(region.bounds(), None);
    }

    #[test]
    fn test_from_rect_covers_touched_pixels() {
        assert_eq!(rect(0.0, 0.0, 10.0, 4.0).area(), 40);
        assert_eq!(rect(0.3, 0.3, 0.3, 0.3).area(), 1);
        assert_eq!(rect(0.6, 0.6, 0.3, 0.3).area(), 1);
        // Straddles a pixel corner.
        assert_eq!(rect(0.9, 0.9, 0.2, 0.2).area(), 4);
        assert_eq!(
            rect(2.2, 3.7, 5.0, 2.0).bounds(),
            Some(PixelRect::new(2, 3, 8, 6))
        );
        assert!(rect(5.0, 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_from_outline_matches_rect() {
        for r in [
            Rect::from_rect(3.0, 4.0, 20.0, 7.0),
            Rect::from_rect(2.2, 3.7, 5.0, 2.0),
            Rect::from_rect(-4.6, -0.25, 9.1, 0.5),
        ] {
            let outline = Outline::from_rects([r]);
            assert_eq!(
                OccupancyRegion::from_outline(&outline),
                OccupancyRegion::from_rect(&r),
                "{r:?}"
            );
        }
    }

    #[test]
    fn test_from_outline_covers_thin_sliver() {
        // Lies between two rows of pixel centers.
        let sliver = Outline::from_rects([Rect::from_rect(1.6, 2.6, 5.0, 0.3)]);
        let region = OccupancyRegion::from_outline(&sliver);
        assert_eq!(region.bounds(), Some(PixelRect::new(1, 2, 7, 3)));
        assert!(region.intersects_rect(&Rect::from_rect(3.0, 2.8, 1.0, 1.0)));
    }

    #[test]
    fn test_from_outline_sloped_edge_covers_row_extent() {
        // Steep sliver of a triangle: the middle of row 0 misses most of it.
        let outline = Outline::new(vec![vec![
            Point::new(0.0, 0.0),
            Point::new(8.0, 0.0),
            Point::new(0.0, 1.0),
        ]]);
        let region = OccupancyRegion::from_outline(&outline);
        assert_eq!(region.bounds(), Some(PixelRect::new(0, 0, 8, 1)));
        assert_eq!(region.area(), 8);
    }

    #[test]
    fn test_subpixel_overlap_is_detected() {
        let a = Rect::from_rect(10.3, 5.2, 20.4, 8.7);
        let occupied = OccupancyRegion::from_rect(&a);
        // Overlaps of a fraction of a pixel in either axis.
        let right = Rect::from_rect(30.5, 6.0, 6.0, 4.0);
        let below = Rect::from_rect(12.0, 13.8, 6.0, 4.0);
        for other in [right, below] {
            assert!(a.intersects(&other));
            assert!(occupied.intersects_rect(&other), "{other:?}");
        }
        // Whole pixels apart.
        assert!(!occupied.intersects_rect(&Rect::from_rect(31.0, 6.0, 6.0, 4.0)));
        assert!(!occupied.intersects_rect(&Rect::from_rect(12.0, 14.0, 6.0, 4.0)));
    }

    #[test]
    fn test_from_outline_overlapping_contours_union() {
        let outline = Outline::from_rects([
            Rect::from_rect(0.0, 0.0, 10.0, 10.0),
            Rect::from_rect(5.0, 5.0, 10.0, 10.0),
        ]);
        let region = OccupancyRegion::from_outline(&outline);
        assert_eq!(region.area(), 100 + 100 - 25);
        // Overlap stays covered.
        assert!(region.contains_pixel(7, 7));
    }

    #[test]
    fn test_from_outline_triangle() {
        let outline = Outline::new(vec![vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ]]);
        let region = OccupancyRegion::from_outline(&outline);
        assert!(region.contains_pixel(1, 1));
        assert!(!region.contains_pixel(8, 8));
        assert!(region.area() > 40 && region.area() < 60);
    }

    #[test]
    fn test_rotated_outline_rasterizes_transposed() {
        let outline = Outline::from_rects([Rect::from_rect(0.0, -4.0, 30.0, 6.0)]);
        let h = OccupancyRegion::from_outline(&outline);
        let v = OccupancyRegion::from_outline(&outline.rotated(Orientation::Vertical));
        assert_eq!(h.area(), v.area());
        let hb = h.bounds().unwrap();
        let vb = v.bounds().unwrap();
        assert_eq!(hb.width(), vb.height());
        assert_eq!(hb.height(), vb.width());
    }

    #[test]
    fn test_alpha_mask() {
        #[rustfmt::skip]
        let mask = [
            0, 255, 255, 0,
            0, 255, 255, 0,
            0,   0, 128, 255,
        ];
        let region = OccupancyRegion::from_alpha_mask(4, 3, &mask, 200).unwrap();
        assert_eq!(region.area(), 5);
        // First two rows coalesce into a single band.
        assert_eq!(region.band_count(), 2);
        assert!(region.contains_pixel(3, 2));
        assert!(!region.contains_pixel(2, 2));
    }

    #[test]
    fn test_alpha_mask_size_mismatch() {
        let err = OccupancyRegion::from_alpha_mask(4, 4, &[0; 15], 1).unwrap_err();
        assert_eq!(
            err,
            MaskError::SizeMismatch { width: 4, height: 4, expected: 16, actual: 15 }
        );
    }

    #[test]
    fn test_complement_within() {
        let allowed = rect(0.0, 0.0, 10.0, 10.0);
        let mask = allowed.complement_within(PixelRect::new(0, 0, 100, 100));
        assert_eq!(mask.area(), 100 * 100 - 100);
        assert!(!mask.contains_pixel(5, 5));
        assert!(mask.contains_pixel(50, 5));
        assert!(mask.contains_pixel(5, 50));
        assert!(!mask.intersects(&allowed));
    }

    // ─────────────── intersection ───────────────

    #[test]
    fn test_intersects_empty_is_false() {
        let empty = OccupancyRegion::new();
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(!empty.intersects(&r));
        assert!(!r.intersects(&empty));
        assert!(!empty.intersects_outline(&Outline::from_rects([Rect::from_size(5.0, 5.0)])));
    }

    #[test]
    fn test_intersects_overlap_and_touch() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&rect(9.0, 9.0, 10.0, 10.0)));
        // Shares only an edge.
        assert!(!a.intersects(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_intersects_finds_gap_between_spans() {
        let mut occupied = rect(0.0, 0.0, 10.0, 10.0);
        occupied.union(&rect(20.0, 0.0, 10.0, 10.0));
        assert_eq!(occupied.band_count(), 1);
        assert_eq!(occupied.span_count(), 2);
        assert!(!occupied.intersects(&rect(10.0, 2.0, 10.0, 5.0)));
        assert!(occupied.intersects(&rect(10.0, 2.0, 11.0, 5.0)));
    }

    #[test]
    fn test_intersects_translated_matches_translated() {
        let mut occupied = rect(0.0, 0.0, 40.0, 5.0);
        occupied.union(&rect(0.0, 20.0, 5.0, 20.0));
        let probe = OccupancyRegion::from_outline(&Outline::from_rects([
            Rect::from_rect(-3.0, -3.0, 6.0, 6.0),
        ]));
        for dy in -5..45 {
            for dx in -5..45 {
                assert_eq!(
                    occupied.intersects_translated(&probe, dx, dy),
                    occupied.intersects(&probe.translated(dx, dy)),
                    "offset ({dx}, {dy})"
                );
            }
        }
    }

    #[test]
    fn test_intersects_rect() {
        let occupied = rect(10.0, 10.0, 10.0, 10.0);
        assert!(occupied.intersects_rect(&Rect::from_rect(15.0, 15.0, 2.0, 2.0)));
        assert!(!occupied.intersects_rect(&Rect::from_rect(0.0, 0.0, 5.0, 5.0)));
    }

    // ─────────────── union ───────────────

    #[test]
    fn test_union_area_and_bounds() {
        let mut region = OccupancyRegion::new();
        region.union(&rect(0.0, 0.0, 10.0, 10.0));
        region.union(&rect(5.0, 5.0, 10.0, 10.0));
        assert_eq!(region.area(), 175);
        assert_eq!(region.bounds(), Some(PixelRect::new(0, 0, 15, 15)));
    }

    #[test]
    fn test_union_is_idempotent() {
        let mut region = rect(0.0, 0.0, 30.0, 30.0);
        region.union(&rect(40.0, 10.0, 5.0, 50.0));
        let before = region.clone();
        region.union(&rect(2.0, 2.0, 5.0, 5.0));
        assert_eq!(region, before);
        region.union(&before);
        assert_eq!(region, before);
    }

    #[test]
    fn test_union_coalesces_bands() {
        let mut region = rect(0.0, 0.0, 10.0, 5.0);
        region.union(&rect(0.0, 5.0, 10.0, 5.0));
        assert_eq!(region.band_count(), 1);
        assert_eq!(region, rect(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_union_never_shrinks() {
        let mut region = OccupancyRegion::new();
        let mut last = 0;
        for i in 0..50 {
            let x = (i * 37 % 200) as f32;
            let y = (i * 53 % 150) as f32;
            region.union(&rect(x, y, 25.0, 12.0));
            let area = region.area();
            assert!(area >= last);
            last = area;
        }
    }

    // ─────────────── derived ───────────────

    #[test]
    fn test_translated() {
        let region = rect(0.0, 0.0, 4.0, 4.0).translated(10, -2);
        assert_eq!(region.bounds(), Some(PixelRect::new(10, -2, 14, 2)));
        assert_eq!(region.area(), 16);
    }

    #[test]
    fn test_dilated() {
        let region = rect(10.0, 10.0, 4.0, 2.0);
        let grown = region.dilated(3);
        assert_eq!(grown.bounds(), Some(PixelRect::new(7, 7, 17, 15)));
        assert_eq!(grown.area(), 10 * 8);
        assert_eq!(region.dilated(0), region);
    }

    #[test]
    fn test_dilated_merges_nearby_pieces() {
        let mut region = rect(0.0, 0.0, 2.0, 2.0);
        region.union(&rect(4.0, 0.0, 2.0, 2.0));
        assert_eq!(region.span_count(), 2);
        let grown = region.dilated(1);
        assert_eq!(grown.span_count(), 1);
        assert_eq!(grown.bounds(), Some(PixelRect::new(-1, -1, 7, 3)));
    }

    #[test]
    fn test_span_ops() {
        let a = [Span { left: 0, right: 10 }, Span { left: 20, right: 30 }];
        let b = [Span { left: 5, right: 22 }, Span { left: 25, right: 26 }];
        assert_eq!(
            union_spans(&a, &b),
            vec![Span { left: 0, right: 30 }]
        );
        assert_eq!(
            difference_spans(&a, &b),
            vec![
                Span { left: 0, right: 5 },
                Span { left: 22, right: 25 },
                Span { left: 26, right: 30 },
            ]
        );
        assert!(spans_overlap(&a, &b, 0));
        assert!(!spans_overlap(&a, &[Span { left: 0, right: 10 }], 10));
    }
}
