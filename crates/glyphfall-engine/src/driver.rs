//! The per-tick orchestrator.

use std::time::Duration;

use glyphfall_core::ConfigError;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace, warn};

use crate::column::{Column, ColumnPolicy};
use crate::config::RenderConfig;
use crate::fade::FadeStyler;
use crate::glyphs::GlyphSource;
use crate::grid::{ColumnGrid, GridSize};
use crate::surface::Surface;

/// Ticks arriving this many intervals late are logged.
const LAG_FACTOR: u32 = 4;

/// Drives the rain: owns the grid, advances it and emits draw batches.
///
/// Single threaded. The host calls [`tick`](Self::tick) on its frame cadence
/// and [`resize`](Self::resize) between ticks when the surface changes.
#[derive(Debug)]
pub struct AnimationDriver<R = StdRng> {
    config: RenderConfig,
    glyphs: GlyphSource,
    styler: FadeStyler,
    grid: ColumnGrid,
    rng: R,
    /// Ticks handled since construction.
    frame_count: u64,
    /// Sum of the elapsed times passed to `tick`.
    uptime: Duration,
}

impl AnimationDriver<StdRng> {
    /// Driver seeded from OS entropy.
    pub fn from_entropy(config: RenderConfig) -> Result<Self, ConfigError> {
        Self::new(config, StdRng::from_entropy())
    }

    /// Driver with a reproducible random sequence.
    pub fn seeded(config: RenderConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AnimationDriver<R> {
    /// Validate `config` and build a driver with an empty grid.
    ///
    /// Nothing is drawn until the first [`resize`](Self::resize).
    pub fn new(config: RenderConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let glyphs = GlyphSource::new(config.glyph_set.clone());
        let styler = FadeStyler::new(&config);
        let grid = ColumnGrid::empty(ColumnPolicy::new(&config));
        Ok(Self {
            config,
            glyphs,
            styler,
            grid,
            rng,
            frame_count: 0,
            uptime: Duration::ZERO,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn glyphs(&self) -> &GlyphSource {
        &self.glyphs
    }

    pub fn styler(&self) -> &FadeStyler {
        &self.styler
    }

    pub fn grid(&self) -> &ColumnGrid {
        &self.grid
    }

    pub fn columns(&self) -> &[Column] {
        self.grid.columns()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn uptime(&self) -> Duration {
        self.uptime
    }

    /// Rebuild the grid for a new surface size or font.
    ///
    /// In-flight animation state is discarded. Invalid character metrics
    /// leave an empty grid and return the error; an empty or negative
    /// surface yields an empty grid.
    pub fn resize(
        &mut self,
        surface_width: f64,
        surface_height: f64,
        character_width: f64,
        character_height: f64,
    ) -> Result<(), ConfigError> {
        let size = match GridSize::from_metrics(
            surface_width,
            surface_height,
            character_width,
            character_height,
        ) {
            Ok(size) => size,
            Err(err) => {
                warn!(%err, "rejecting surface metrics, rain disabled");
                self.grid = ColumnGrid::empty(ColumnPolicy::new(&self.config));
                return Err(err);
            }
        };

        let policy = ColumnPolicy::new(&self.config);
        self.grid = ColumnGrid::new(size, policy, &self.glyphs, &mut self.rng);
        debug!(
            columns = size.columns,
            rows = size.rows,
            surface_width,
            surface_height,
            "column grid rebuilt"
        );
        Ok(())
    }

    /// Send every column back above the surface with fresh staggering.
    pub fn reset_columns(&mut self) {
        self.grid.reset_all(&self.glyphs, &mut self.rng);
        debug!(columns = self.grid.len(), "columns reset");
    }

    /// Advance the animation one step and present the resulting cells.
    ///
    /// Every call advances exactly one step and calls
    /// [`Surface::present`] exactly once. `elapsed` is the host time since
    /// the previous tick; it is accumulated into [`uptime`](Self::uptime)
    /// and used to spot a host falling behind its cadence.
    pub fn tick<S: Surface + ?Sized>(&mut self, elapsed: Duration, surface: &mut S) {
        self.frame_count += 1;
        self.uptime = self.uptime.saturating_add(elapsed);
        if elapsed > self.config.tick_interval.saturating_mul(LAG_FACTOR) {
            debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                interval_ms = self.config.tick_interval.as_millis() as u64,
                "tick arrived late"
            );
        }

        let recycled = self.grid.step(&self.glyphs, &mut self.rng);
        if recycled > 0 {
            trace!(frame = self.frame_count, recycled, "columns recycled");
        }

        let fade_window = self.config.fade_length as usize + 1;
        let mut cells = Vec::with_capacity(self.grid.len() * fade_window.min(self.grid.rows()));
        self.grid.collect_cells(&self.styler, &self.glyphs, &mut cells);
        surface.present(&cells);
    }
}
