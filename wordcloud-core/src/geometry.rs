//! Plane geometry shared by the measurement and placement crates.
//!
//! Coordinates follow the canvas convention: x grows to the right, y grows
//! downwards, units are pixels.

use serde::{Deserialize, Serialize};

use crate::Orientation;

// ───────────────────────────────────────────────────────────────────
// Point
// ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline(always)]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Linear interpolation towards `other` (`t = 0` is `self`).
    #[inline]
    pub fn lerp(&self, other: &Point, t: f32) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

// ───────────────────────────────────────────────────────────────────
// Rect
// ───────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle stored as min/max corners (16 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect {
    /// Create from origin + size.
    #[inline(always)]
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Rectangle anchored at the origin, e.g. a canvas.
    #[inline]
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::from_rect(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn from_center(center: Point, width: f32, height: f32) -> Self {
        Self::from_rect(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn area(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// A rectangle with no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Point-in-rect test, edges inclusive.
    #[inline(always)]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.min_x && px <= self.max_x && py >= self.min_y && py <= self.max_y
    }

    /// Area overlap test.  Rectangles that only touch along an edge do not
    /// share any area and therefore do not intersect.
    #[inline(always)]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// `other` lies entirely inside `self` (edges inclusive).
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// True when any part of `self` lies past an edge of `bounds`.
    #[inline(always)]
    pub fn falls_outside(&self, bounds: &Rect) -> bool {
        self.min_y < bounds.min_y
            || self.max_y > bounds.max_y
            || self.min_x < bounds.min_x
            || self.max_x > bounds.max_x
    }

    #[inline]
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }
}

// ───────────────────────────────────────────────────────────────────
// Outline
// ───────────────────────────────────────────────────────────────────

/// Closed 2-D path bounding a word's glyphs.
///
/// An outline is a list of closed contours (the last point connects back to
/// the first).  Each contour is filled on its own and the outline covers the
/// union of the contours, so overlapping glyph boxes never cancel out into
/// holes.  The bounding rectangle is
/// computed once on construction and carried along through every transform,
/// so bounds checks never walk the points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    contours: Vec<Vec<Point>>,
    bounds: Rect,
}

impl Outline {
    /// Build from raw contours.  Contours with fewer than three points
    /// enclose no area and are dropped.
    pub fn new(contours: Vec<Vec<Point>>) -> Self {
        let contours: Vec<Vec<Point>> = contours.into_iter().filter(|c| c.len() >= 3).collect();
        let bounds = compute_bounds(&contours);
        Self { contours, bounds }
    }

    /// One rectangular contour per non-empty rectangle.
    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let contours = rects
            .into_iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.corners().to_vec())
            .collect();
        Self::new(contours)
    }

    #[inline]
    pub fn contours(&self) -> &[Vec<Point>] {
        &self.contours
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty() || self.bounds.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.contours.iter().map(Vec::len).sum()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Outline {
        Outline {
            contours: self
                .contours
                .iter()
                .map(|c| c.iter().map(|p| Point::new(p.x + dx, p.y + dy)).collect())
                .collect(),
            bounds: self.bounds.translate(dx, dy),
        }
    }

    /// Rotate about the origin by the orientation's angle.
    ///
    /// Quarter turns map axis-aligned rectangles onto axis-aligned
    /// rectangles, so rotated bounds stay tight.
    pub fn rotated(&self, orientation: Orientation) -> Outline {
        let map = |p: &Point| match orientation {
            Orientation::Horizontal => *p,
            // Clockwise on a y-down canvas.
            Orientation::Vertical => Point::new(-p.y, p.x),
            Orientation::FlippedVertical => Point::new(p.y, -p.x),
        };
        let contours: Vec<Vec<Point>> = self
            .contours
            .iter()
            .map(|c| c.iter().map(map).collect())
            .collect();
        let bounds = compute_bounds(&contours);
        Outline { contours, bounds }
    }

    /// Translate so the bounding-box center sits on the origin.
    pub fn centered(&self) -> Outline {
        let c = self.bounds.center();
        self.translated(-c.x, -c.y)
    }
}

fn compute_bounds(contours: &[Vec<Point>]) -> Rect {
    let mut points = contours.iter().flatten();
    let Some(first) = points.next() else {
        return Rect::default();
    };
    points.fold(
        Rect {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        },
        |acc, p| Rect {
            min_x: acc.min_x.min(p.x),
            min_y: acc.min_y.min(p.y),
            max_x: acc.max_x.max(p.x),
            max_y: acc.max_y.max(p.y),
        },
    )
}

// ===================================================================
// Tests
// ===================================================================
