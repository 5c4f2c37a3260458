//! Word placer: finds room for one word.
//!
//! For each size tier, largest first:
//!
//! 1. roll an orientation (or take the forced one),
//! 2. measure the word through the glyph provider and rasterize it once,
//!    centered on the origin,
//! 3. walk the spiral from the seed point; reject a candidate when the
//!    translated bounds leave the canvas, then when the (padded) footprint
//!    hits occupied pixels,
//! 4. commit the first candidate that survives both tests.
//!
//! Nothing is written to the occupancy region unless a candidate is
//! accepted, so stopping between candidates never leaves it half updated.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use wordcloud_core::{Orientation, Outline, PlacedWord, Point, Rect, Rgba, SkipReason, WordEntry};
use wordcloud_text::{FontDescriptor, GlyphBoundsProvider, MeasureError};

use crate::config::{BudgetConfig, LayoutConfig};
use crate::orchestrator::LayoutError;
use crate::region::OccupancyRegion;
use crate::rng::SeededRng;
use crate::sizing::size_tiers;
use crate::spiral::SpiralCandidates;

// ───────────────────────────────────────────────────────────────────
// Cancellation and budget
// ───────────────────────────────────────────────────────────────────

/// Shared flag for stopping a run from another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a run stopped before every word was tried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    AttemptBudget,
    Timeout,
    Cancelled,
}

impl StopReason {
    pub fn skip_reason(self) -> SkipReason {
        match self {
            StopReason::Cancelled => SkipReason::Cancelled,
            StopReason::AttemptBudget | StopReason::Timeout => SkipReason::RunBudgetExceeded,
        }
    }
}

/// The deadline is only read every this many candidates.
const CLOCK_CHECK_INTERVAL: u64 = 32;

/// Run-wide stopping conditions, shared by every word of a run.
#[derive(Debug)]
pub struct RunBudget {
    max_attempts: Option<u64>,
    deadline: Option<Instant>,
    cancel: CancelToken,
    attempts: u64,
    stopped: Option<StopReason>,
}

impl RunBudget {
    /// Starts the clock.
    pub fn new(config: &BudgetConfig, cancel: CancelToken) -> Self {
        Self {
            max_attempts: config.max_total_attempts,
            deadline: config
                .timeout_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            cancel,
            attempts: 0,
            stopped: None,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(&BudgetConfig::default(), CancelToken::new())
    }

    /// Claim one candidate evaluation.  Once this fails it keeps failing.
    pub fn try_consume(&mut self) -> Result<(), StopReason> {
        if let Some(reason) = self.stopped {
            return Err(reason);
        }
        if self.cancel.is_cancelled() {
            return Err(self.stop(StopReason::Cancelled));
        }
        if self.max_attempts.is_some_and(|max| self.attempts >= max) {
            return Err(self.stop(StopReason::AttemptBudget));
        }
        if self.attempts % CLOCK_CHECK_INTERVAL == 0
            && self.deadline.is_some_and(|d| Instant::now() >= d)
        {
            return Err(self.stop(StopReason::Timeout));
        }
        self.attempts += 1;
        Ok(())
    }

    fn stop(&mut self, reason: StopReason) -> StopReason {
        self.stopped = Some(reason);
        reason
    }

    /// Candidates evaluated so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn stopped(&self) -> Option<StopReason> {
        self.stopped
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

// ───────────────────────────────────────────────────────────────────
// WordPlacer
// ───────────────────────────────────────────────────────────────────

/// Outcome for one word.
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    Placed(PlacedWord),
    Skipped(SkipReason),
}

pub struct WordPlacer<'a, P: ?Sized> {
    provider: &'a mut P,
    config: &'a LayoutConfig,
    canvas: Rect,
    font: &'a FontDescriptor,
    fallback: Option<&'a FontDescriptor>,
}

impl<'a, P: GlyphBoundsProvider + ?Sized> WordPlacer<'a, P> {
    pub fn new(
        provider: &'a mut P,
        config: &'a LayoutConfig,
        canvas: Rect,
        font: &'a FontDescriptor,
        fallback: Option<&'a FontDescriptor>,
    ) -> Self {
        Self {
            provider,
            config,
            canvas,
            font,
            fallback,
        }
    }

    /// Place `word`, committing its footprint to `occupancy` on success.
    ///
    /// Per-word failures come back as [`Placement::Skipped`]; only an
    /// unrecoverable provider failure is an `Err`.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        &mut self,
        word: &WordEntry,
        color: Rgba,
        base_size: f32,
        occupancy: &mut OccupancyRegion,
        rng: &mut SeededRng,
        budget: &mut RunBudget,
        seed_point: Point,
    ) -> Result<Placement, LayoutError> {
        let weights = self.config.orientation_weights.as_array();
        let mut on_fallback = false;

        for (tier, size) in size_tiers(base_size, self.config).into_iter().enumerate() {
            let orientation = word.orientation.unwrap_or_else(|| {
                rng.weighted_index(&weights)
                    .map(|i| Orientation::ALL[i])
                    .unwrap_or_default()
            });

            let outline = match self.measure(&word.text, size, orientation, &mut on_fallback)? {
                Ok(outline) => outline.centered(),
                Err(reason) => {
                    warn!("Placer: skipping {:?}: {reason}", word.text);
                    return Ok(Placement::Skipped(reason));
                }
            };
            let bounds = outline.bounds();
            if bounds.width() > self.canvas.width() || bounds.height() > self.canvas.height() {
                debug!(
                    "Placer: {:?} at {size:.1}px ({:.0}x{:.0}) exceeds the canvas",
                    word.text,
                    bounds.width(),
                    bounds.height()
                );
                continue;
            }

            let footprint = OccupancyRegion::from_outline(&outline);
            let probe = footprint.dilated(self.config.word_padding);
            let candidates = SpiralCandidates::new(
                seed_point,
                self.canvas,
                &self.config.spiral,
                rng,
                self.config.max_attempts_per_word,
            );

            for candidate in candidates {
                if let Err(stop) = budget.try_consume() {
                    return Ok(Placement::Skipped(stop.skip_reason()));
                }
                let center = candidate.center();
                if bounds.translate(center.x, center.y).falls_outside(&self.canvas) {
                    continue;
                }
                if occupancy.intersects_translated(&probe, candidate.x, candidate.y) {
                    continue;
                }

                let placed = outline.translated(center.x, center.y);
                occupancy.union_outline(&placed);
                debug!(
                    "Placer: {:?} placed at ({}, {}) size {size:.1} {orientation:?} after {} candidates",
                    word.text,
                    candidate.x,
                    candidate.y,
                    candidate.index + 1
                );
                return Ok(Placement::Placed(PlacedWord {
                    text: word.text.clone(),
                    center,
                    font_size: size,
                    orientation,
                    color,
                    outline: placed,
                }));
            }
            debug!("Placer: {:?} found no room at tier {tier} ({size:.1}px)", word.text);
        }

        Ok(Placement::Skipped(SkipReason::WordUnplaceable))
    }

    /// Measure with the current font, switching to the fallback font for the
    /// rest of the word on the first recoverable failure.
    fn measure(
        &mut self,
        text: &str,
        size: f32,
        orientation: Orientation,
        on_fallback: &mut bool,
    ) -> Result<Result<Outline, SkipReason>, LayoutError> {
        let font = match (*on_fallback, self.fallback) {
            (true, Some(fallback)) => fallback,
            _ => self.font,
        };
        let error = match self.provider.measure(text, font, size, orientation) {
            Ok(outline) if !outline.is_empty() => return Ok(Ok(outline)),
            Ok(_) => MeasureError::GlyphRender {
                text: text.to_string(),
                reason: "empty outline".to_string(),
            },
            Err(MeasureError::Backend(reason)) => return Err(LayoutError::Provider(reason)),
            Err(e) => e,
        };

        if !*on_fallback {
            if let Some(fallback) = self.fallback {
                warn!("Placer: {error}; retrying {text:?} with {fallback}");
                *on_fallback = true;
                return self.measure(text, size, orientation, on_fallback);
            }
        }
        Ok(Err(match error {
            MeasureError::FontUnresolved(font) => SkipReason::FontUnresolved(font),
            MeasureError::GlyphRender { reason, .. } => SkipReason::GlyphRenderError(reason),
            MeasureError::Backend(reason) => SkipReason::GlyphRenderError(reason),
        }))
    }
}

// ===================================================================
// Tests
// ===================================================================
