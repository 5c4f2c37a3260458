//! # wordcloud-layout
//!
//! Greedy placement engine for word clouds.  Words go in heaviest first;
//! each one walks a spiral outward from a seed point until its footprint
//! fits inside the canvas without touching anything already placed.
//!
//! ## Architecture
//!
//! ```text
//! CloudLayout / LayoutRun     Init → Sorting → Placing(i) → Done
//!     │
//!     └── WordPlacer          size tiers × orientation × candidates
//!             ├── GlyphBoundsProvider  (wordcloud-text)
//!             ├── SpiralCandidates     seeded Archimedean walk
//!             └── OccupancyRegion      scan-line band set of covered pixels
//! ```
//!
//! - **`region`**: the occupancy structure every candidate is tested against.
//! - **`spiral`**: candidate centers.
//! - **`placer`**: one word, plus the run budget and cancellation token.
//! - **`orchestrator`**: the run state machine and its result.
//! - **`config`**: `LayoutConfig`, loadable from JSON.
//! - **`sizing`**: weight to font size, size tiers.
//! - **`rng`**: the run's seeded random source.

pub mod config;
pub mod orchestrator;
pub mod placer;
pub mod region;
pub mod rng;
pub mod sizing;
pub mod spiral;

// Re-exports for ergonomic use.
pub use config::{
    BudgetConfig, ConfigError, LayoutConfig, OrientationWeights, SizeScale, SortPolicy, SpiralConfig,
};
pub use orchestrator::{
    Canvas, CloudLayout, InputError, LayoutError, LayoutResult, LayoutRun, RunState, RunStats,
};
pub use placer::{CancelToken, Placement, RunBudget, StopReason, WordPlacer};
pub use region::{MaskError, OccupancyRegion, PixelRect};
pub use rng::SeededRng;
pub use sizing::{font_size_for_weight, size_tiers};
pub use spiral::{Candidate, SpiralCandidates};
