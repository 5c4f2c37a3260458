use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, info, warn};
use thiserror::Error;
use wordcloud_core::{ColorLibrary, PlacedWord, Point, Rect, Rgba, SkipReason, SkippedWord, WordEntry};
use wordcloud_text::{FontDescriptor, GlyphBoundsProvider};

use crate::config::{ConfigError, LayoutConfig, SortPolicy};
use crate::placer::{CancelToken, Placement, RunBudget, StopReason, WordPlacer};
use crate::region::{OccupancyRegion, PixelRect};
use crate::rng::SeededRng;
use crate::sizing::font_size_for_weight;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Word list is empty")]
    EmptyWordList,
    #[error("Canvas must have positive dimensions, got {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
    #[error("Word #{index} has empty text")]
    EmptyText { index: usize },
    #[error("Word #{index} ({text:?}) has non-positive weight {weight}")]
    InvalidWeight { index: usize, text: String, weight: f32 },
}

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("Glyph provider failed: {0}")]
    Provider(String),
}

// ───────────────────────────────────────────────────────────────────
// Canvas, state, results
// ───────────────────────────────────────────────────────────────────

/// Pixel dimensions of the output image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width as f32, self.height as f32)
    }

    pub fn pixel_rect(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width as i32, self.height as i32)
    }
}

/// Orchestrator state: `Init -> Sorting -> Placing(i) -> … -> Done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Init,
    Sorting,
    /// About to place the word at this position of the sorted queue.
    Placing(usize),
    Done,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    /// Candidate centers tested across all words.
    pub candidates_evaluated: u64,
    pub words_placed: usize,
    pub words_skipped: usize,
    pub elapsed_ms: f64,
    /// Covered pixels at the end, exclusion mask included.
    pub occupied_area: u64,
}

#[derive(Clone, Debug)]
pub struct LayoutResult {
    /// In placement order.
    pub placed: Vec<PlacedWord>,
    pub skipped: Vec<SkippedWord>,
    /// Set when the run ended before every word was tried.
    pub stopped: Option<StopReason>,
    pub stats: RunStats,
}

/// A word after sorting, with everything the placer needs.
#[derive(Clone, Debug)]
struct QueuedWord {
    entry: WordEntry,
    color: Rgba,
    base_size: f32,
}

// ───────────────────────────────────────────────────────────────────
// LayoutRun
// ───────────────────────────────────────────────────────────────────

/// One layout run, driven a state transition at a time by [`LayoutRun::step`].
///
/// Owns the occupancy region and the random source; nothing is shared with
/// other runs.
pub struct LayoutRun {
    config: LayoutConfig,
    canvas: Canvas,
    font: FontDescriptor,
    fallback: Option<FontDescriptor>,
    palette: Vec<Rgba>,

    words: Vec<WordEntry>,
    queue: Vec<QueuedWord>,
    state: RunState,

    occupancy: OccupancyRegion,
    rng: SeededRng,
    budget: RunBudget,
    /// Centers of the most recent placements, newest last.
    recent: VecDeque<Point>,

    placed: Vec<PlacedWord>,
    skipped: Vec<SkippedWord>,
    started: Instant,
}

impl LayoutRun {
    /// Validate inputs and set up an empty (or mask-seeded) occupancy
    /// region.  Palette names resolve against the standard color library.
    pub fn new(
        config: LayoutConfig,
        words: Vec<WordEntry>,
        canvas: Canvas,
        mask: Option<OccupancyRegion>,
    ) -> Result<Self, LayoutError> {
        Self::new_with(
            config,
            words,
            canvas,
            mask,
            &ColorLibrary::standard(),
            CancelToken::new(),
        )
    }

    pub fn new_with(
        config: LayoutConfig,
        words: Vec<WordEntry>,
        canvas: Canvas,
        mask: Option<OccupancyRegion>,
        library: &ColorLibrary,
        cancel: CancelToken,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        validate_input(&words, canvas)?;
        let palette = config.resolve_palette(library)?;

        debug!(
            "Layout: init with {} words on {}x{} (seed {})",
            words.len(),
            canvas.width,
            canvas.height,
            config.seed
        );

        Ok(Self {
            font: config.font(),
            fallback: config.fallback_font(),
            palette,
            rng: SeededRng::new(config.seed),
            budget: RunBudget::new(&config.budget, cancel),
            recent: VecDeque::with_capacity(config.seed_window),
            occupancy: mask.unwrap_or_default(),
            placed: Vec::with_capacity(words.len()),
            skipped: Vec::new(),
            queue: Vec::new(),
            state: RunState::Init,
            started: Instant::now(),
            config,
            canvas,
            words,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn occupancy(&self) -> &OccupancyRegion {
        &self.occupancy
    }

    pub fn placed(&self) -> &[PlacedWord] {
        &self.placed
    }

    pub fn skipped(&self) -> &[SkippedWord] {
        &self.skipped
    }

    /// Token that stops this run between two candidates.
    pub fn cancel_token(&self) -> CancelToken {
        self.budget.cancel_token()
    }

    /// Advance one transition.  A no-op once `Done`.
    pub fn step<P>(&mut self, provider: &mut P) -> Result<RunState, LayoutError>
    where
        P: GlyphBoundsProvider + ?Sized,
    {
        let next = match self.state {
            RunState::Init => RunState::Sorting,
            RunState::Sorting => {
                self.sort_and_queue();
                if self.queue.is_empty() {
                    RunState::Done
                } else {
                    RunState::Placing(0)
                }
            }
            RunState::Placing(i) => self.place_one(provider, i)?,
            RunState::Done => return Ok(RunState::Done),
        };

        debug!("Layout: {:?} -> {:?}", self.state, next);
        self.state = next;
        if next == RunState::Done {
            self.log_summary();
        }
        Ok(next)
    }

    /// Step until `Done`.
    pub fn run_to_end<P>(&mut self, provider: &mut P) -> Result<(), LayoutError>
    where
        P: GlyphBoundsProvider + ?Sized,
    {
        while self.step(provider)? != RunState::Done {}
        Ok(())
    }

    /// Package the outcome.  Words the run never got to are reported as
    /// cancelled, so nothing goes missing from the result.
    pub fn finish(mut self) -> LayoutResult {
        let mut stopped = self.budget.stopped();
        let untouched: Vec<String> = match self.state {
            RunState::Init | RunState::Sorting => {
                let words = std::mem::take(&mut self.words);
                words.into_iter().map(|w| w.text).collect()
            }
            RunState::Placing(i) => self
                .queue
                .get(i..)
                .unwrap_or_default()
                .iter()
                .map(|q| q.entry.text.clone())
                .collect(),
            RunState::Done => Vec::new(),
        };
        if !untouched.is_empty() {
            warn!("Layout: finished early, {} words never tried", untouched.len());
            stopped.get_or_insert(StopReason::Cancelled);
            self.skipped.extend(untouched.into_iter().map(|text| SkippedWord {
                text,
                reason: SkipReason::Cancelled,
            }));
        }

        LayoutResult {
            stats: self.stats(),
            placed: self.placed,
            skipped: self.skipped,
            stopped,
        }
    }

    fn stats(&self) -> RunStats {
        RunStats {
            candidates_evaluated: self.budget.attempts(),
            words_placed: self.placed.len(),
            words_skipped: self.skipped.len(),
            elapsed_ms: self.started.elapsed().as_secs_f64() * 1000.0,
            occupied_area: self.occupancy.area(),
        }
    }

    // ───────────────────── Sorting ─────────────────────

    fn sort_and_queue(&mut self) {
        let (min_w, max_w) = self
            .words
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), w| {
                (lo.min(w.weight), hi.max(w.weight))
            });

        let mut words = std::mem::take(&mut self.words);
        // Stable: equal weights keep input order.
        words.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        if self.config.shuffle_palette {
            self.rng.shuffle(&mut self.palette);
        }
        let mut palette = self.palette.iter().copied().cycle();
        let mut queue: Vec<QueuedWord> = words
            .into_iter()
            .map(|entry| {
                let color = match entry.color {
                    Some(c) => c,
                    None => palette.next().unwrap_or(Rgba::BLACK),
                };
                let base_size = font_size_for_weight(entry.weight, min_w, max_w, &self.config);
                QueuedWord {
                    entry,
                    color,
                    base_size,
                }
            })
            .collect();

        if self.config.sort_policy == SortPolicy::ColorBrightness {
            let adj = self.config.sort_adjustment;
            queue.sort_by(|a, b| b.color.sort_value(adj).total_cmp(&a.color.sort_value(adj)));
        }

        if let Some(limit) = self.config.max_words {
            if queue.len() > limit {
                let dropped = queue.split_off(limit);
                debug!("Layout: word limit {limit} drops {} words", dropped.len());
                self.skipped.extend(dropped.into_iter().map(|q| SkippedWord {
                    text: q.entry.text,
                    reason: SkipReason::WordLimit,
                }));
            }
        }
        self.queue = queue;
    }

    // ───────────────────── Placing ─────────────────────

    fn place_one<P>(&mut self, provider: &mut P, i: usize) -> Result<RunState, LayoutError>
    where
        P: GlyphBoundsProvider + ?Sized,
    {
        if let Some(stop) = self.budget.stopped() {
            self.skip_rest(i, stop);
            return Ok(RunState::Done);
        }

        let seed_point = self.seed_point();
        let word = &self.queue[i];
        let mut placer = WordPlacer::new(
            provider,
            &self.config,
            self.canvas.bounds(),
            &self.font,
            self.fallback.as_ref(),
        );
        let outcome = placer.place(
            &word.entry,
            word.color,
            word.base_size,
            &mut self.occupancy,
            &mut self.rng,
            &mut self.budget,
            seed_point,
        )?;

        match outcome {
            Placement::Placed(placed) => {
                if self.config.seed_window > 0 {
                    if self.recent.len() == self.config.seed_window {
                        self.recent.pop_front();
                    }
                    self.recent.push_back(placed.center);
                }
                self.placed.push(placed);
            }
            Placement::Skipped(reason) => {
                warn!("Layout: skipped {:?}: {reason}", word.entry.text);
                self.skipped.push(SkippedWord {
                    text: word.entry.text.clone(),
                    reason,
                });
            }
        }

        if let Some(stop) = self.budget.stopped() {
            self.skip_rest(i + 1, stop);
            return Ok(RunState::Done);
        }
        Ok(if i + 1 < self.queue.len() {
            RunState::Placing(i + 1)
        } else {
            RunState::Done
        })
    }

    /// Canvas center, pulled toward recent placements by `cluster_bias`.
    fn seed_point(&self) -> Point {
        let center = self.canvas.bounds().center();
        if self.recent.is_empty() {
            return center;
        }
        let n = self.recent.len() as f32;
        let (sx, sy) = self
            .recent
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        center.lerp(&Point::new(sx / n, sy / n), self.config.cluster_bias)
    }

    fn skip_rest(&mut self, from: usize, stop: StopReason) {
        let reason = stop.skip_reason();
        let rest = self.queue.get(from..).unwrap_or_default();
        if !rest.is_empty() {
            warn!("Layout: {stop:?}; skipping {} remaining words", rest.len());
        }
        self.skipped.extend(rest.iter().map(|q| SkippedWord {
            text: q.entry.text.clone(),
            reason: reason.clone(),
        }));
    }

    fn log_summary(&self) {
        let stats = self.stats();
        info!(
            "Layout: placed {} / skipped {} in {:.1} ms ({} candidates, {} px covered)",
            stats.words_placed,
            stats.words_skipped,
            stats.elapsed_ms,
            stats.candidates_evaluated,
            stats.occupied_area
        );
    }
}

fn validate_input(words: &[WordEntry], canvas: Canvas) -> Result<(), InputError> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(InputError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
        });
    }
    if words.is_empty() {
        return Err(InputError::EmptyWordList);
    }
    for (index, word) in words.iter().enumerate() {
        if word.text.trim().is_empty() {
            return Err(InputError::EmptyText { index });
        }
        if !(word.weight.is_finite() && word.weight > 0.0) {
            return Err(InputError::InvalidWeight {
                index,
                text: word.text.clone(),
                weight: word.weight,
            });
        }
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────────
// CloudLayout
// ───────────────────────────────────────────────────────────────────

/// Reusable entry point: a validated config plus the color library, able
/// to run any number of independent layouts.
pub struct CloudLayout {
    config: LayoutConfig,
    library: ColorLibrary,
}

impl CloudLayout {
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        Self::with_library(config, ColorLibrary::standard())
    }

    pub fn with_library(config: LayoutConfig, library: ColorLibrary) -> Result<Self, LayoutError> {
        config.validate()?;
        config.resolve_palette(&library)?;
        Ok(Self { config, library })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn run<P>(
        &self,
        provider: &mut P,
        words: Vec<WordEntry>,
        canvas: Canvas,
        mask: Option<OccupancyRegion>,
    ) -> Result<LayoutResult, LayoutError>
    where
        P: GlyphBoundsProvider + ?Sized,
    {
        self.run_with_cancel(provider, words, canvas, mask, CancelToken::new())
    }

    pub fn run_with_cancel<P>(
        &self,
        provider: &mut P,
        words: Vec<WordEntry>,
        canvas: Canvas,
        mask: Option<OccupancyRegion>,
        cancel: CancelToken,
    ) -> Result<LayoutResult, LayoutError>
    where
        P: GlyphBoundsProvider + ?Sized,
    {
        let mut run = LayoutRun::new_with(
            self.config.clone(),
            words,
            canvas,
            mask,
            &self.library,
            cancel,
        )?;
        run.run_to_end(provider)?;
        Ok(run.finish())
    }
}

// ===================================================================
// Tests
// ===================================================================
