//! Placement candidate generator.
//!
//! Walks an Archimedean spiral `r = growth · θ / 2π` outward from a seed
//! point.  The walk is stretched vertically to the canvas aspect ratio so a
//! wide canvas fills as a wide ellipse rather than a circle clipped at the
//! top and bottom.  The angular step shrinks as the radius grows, keeping
//! consecutive candidates roughly `max_arc_step` pixels apart.
//!
//! The generator never looks at occupancy; the placer filters.

use std::f32::consts::TAU;

use wordcloud_core::{Point, Rect};

use crate::config::SpiralConfig;
use crate::rng::SeededRng;

/// A trial center, snapped to the pixel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub x: i32,
    pub y: i32,
    /// Position in the walk, starting at 0 for the seed point.
    pub index: usize,
}

impl Candidate {
    pub fn center(&self) -> Point {
        Point::new(self.x as f32, self.y as f32)
    }
}

/// Lazy, finite sequence of [`Candidate`]s.
///
/// Ends after `max_attempts` candidates, or once the spiral has grown past
/// every corner of the canvas, whichever comes first.
#[derive(Clone, Debug)]
pub struct SpiralCandidates {
    origin: Point,
    /// Vertical stretch: canvas height / width.
    aspect: f32,
    phase: f32,
    /// `1.0` counter-clockwise, `-1.0` clockwise.
    direction: f32,
    theta: f32,
    angular_step: f32,
    radial_growth: f32,
    max_arc_step: f32,
    max_radius: f32,
    emitted: usize,
    max_attempts: usize,
    last: Option<(i32, i32)>,
}

impl SpiralCandidates {
    pub fn new(
        seed_point: Point,
        canvas: Rect,
        config: &SpiralConfig,
        rng: &mut SeededRng,
        max_attempts: usize,
    ) -> Self {
        let aspect = if canvas.width() > 0.0 && canvas.height() > 0.0 {
            canvas.height() / canvas.width()
        } else {
            1.0
        };
        let max_radius = canvas
            .corners()
            .iter()
            .map(|c| {
                let dx = c.x - seed_point.x;
                let dy = (c.y - seed_point.y) / aspect;
                (dx * dx + dy * dy).sqrt()
            })
            .fold(0.0f32, f32::max);
        let phase = rng.next_f32() * TAU;
        let direction = if rng.next_bool() { 1.0 } else { -1.0 };

        Self {
            origin: seed_point,
            aspect,
            phase,
            direction,
            theta: 0.0,
            angular_step: config.angular_step.max(1e-3),
            radial_growth: config.radial_growth.max(1e-2),
            max_arc_step: config.max_arc_step.max(1e-2),
            max_radius,
            emitted: 0,
            max_attempts,
            last: None,
        }
    }

    #[inline]
    fn radius(&self) -> f32 {
        self.radial_growth * self.theta / TAU
    }

    fn advance(&mut self) {
        let r = self.radius();
        let step = if r > 0.0 {
            self.angular_step.min(self.max_arc_step / r)
        } else {
            self.angular_step
        };
        self.theta += step;
    }

    /// Candidates produced so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl Iterator for SpiralCandidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        if self.emitted >= self.max_attempts {
            return None;
        }
        loop {
            let r = self.radius();
            if r > self.max_radius + 1.0 {
                return None;
            }
            let angle = self.phase + self.direction * self.theta;
            let x = (self.origin.x + r * angle.cos()).round() as i32;
            let y = (self.origin.y + r * angle.sin() * self.aspect).round() as i32;
            self.advance();

            if self.last == Some((x, y)) {
                continue;
            }
            self.last = Some((x, y));
            let candidate = Candidate {
                x,
                y,
                index: self.emitted,
            };
            self.emitted += 1;
            return Some(candidate);
        }
    }
}
