//! Per-column rain state.

use std::ops::{Range, RangeInclusive};

use rand::Rng;

use crate::config::RenderConfig;
use crate::glyphs::{GlyphId, GlyphSource};

/// Where a column is in its fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnState {
    /// Head above the surface (`head_row < 0`).
    Empty,
    /// Head on the surface.
    Active,
    /// Head below the surface, tail still visible.
    Draining,
    /// Tail cleared the surface; reset on the next tick.
    Finished,
}

/// Numeric policy applied to every column of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPolicy {
    pub fade_length: u32,
    pub speed_range: RangeInclusive<u32>,
    /// Resolved stagger bound, always >= 1.
    pub max_stagger: u32,
    pub flicker_probability: f64,
}

impl ColumnPolicy {
    /// Resolve the policy for a grid.
    ///
    /// A `max_stagger` of zero falls back to the fade length, which keeps
    /// every reset head within `[-fade_length, 0)`.
    pub fn new(config: &RenderConfig) -> Self {
        let max_stagger = if config.max_stagger == 0 {
            config.fade_length
        } else {
            config.max_stagger
        };
        Self {
            fade_length: config.fade_length,
            speed_range: config.speed_range.clone(),
            max_stagger: max_stagger.max(1),
            flicker_probability: config.flicker_probability,
        }
    }
}

/// State for a single rain column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Horizontal slot index.
    x: usize,
    /// One glyph per visible row.
    slots: Vec<GlyphId>,
    /// Row of the brightest glyph. Negative while staggered above the surface.
    head_row: i32,
    fade_length: u32,
    /// Ticks needed for one row of movement.
    ticks_per_advance: u32,
    /// Ticks since the last advance.
    tick_counter: u32,
}

impl Column {
    /// Create a freshly reset column.
    pub fn spawn<R: Rng + ?Sized>(
        x: usize,
        rows: usize,
        policy: &ColumnPolicy,
        glyphs: &GlyphSource,
        rng: &mut R,
    ) -> Self {
        let mut column = Self {
            x,
            slots: vec![GlyphId(0); rows],
            head_row: -1,
            fade_length: policy.fade_length.max(1),
            ticks_per_advance: 1,
            tick_counter: 0,
        };
        column.reset(policy, glyphs, rng);
        column
    }

    /// Build a column from explicit state.
    ///
    /// `fade_length` and `ticks_per_advance` are raised to at least 1.
    pub fn from_parts(
        x: usize,
        slots: Vec<GlyphId>,
        head_row: i32,
        fade_length: u32,
        ticks_per_advance: u32,
    ) -> Self {
        Self {
            x,
            slots,
            head_row,
            fade_length: fade_length.max(1),
            ticks_per_advance: ticks_per_advance.max(1),
            tick_counter: 0,
        }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn head_row(&self) -> i32 {
        self.head_row
    }

    pub fn fade_length(&self) -> u32 {
        self.fade_length
    }

    pub fn ticks_per_advance(&self) -> u32 {
        self.ticks_per_advance
    }

    /// Number of rows the column spans.
    pub fn rows(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[GlyphId] {
        &self.slots
    }

    /// Glyph currently occupying `row`.
    pub fn glyph_at(&self, row: usize) -> Option<GlyphId> {
        self.slots.get(row).copied()
    }

    pub fn state(&self) -> ColumnState {
        let rows = self.rows() as i64;
        let head = self.head_row as i64;
        if head < 0 {
            ColumnState::Empty
        } else if head < rows {
            ColumnState::Active
        } else if head - (self.fade_length as i64) < rows {
            ColumnState::Draining
        } else {
            ColumnState::Finished
        }
    }

    /// Rows currently inside the fade window and on the surface:
    /// `[head_row - fade_length, head_row] ∩ [0, rows)`.
    pub fn visible_rows(&self) -> Range<usize> {
        let head = self.head_row as i64;
        let rows = self.rows() as i64;
        let start = (head - self.fade_length as i64).clamp(0, rows);
        let end = (head + 1).clamp(0, rows);
        if end <= start {
            return 0..0;
        }
        start as usize..end as usize
    }

    /// Count one tick; moves the head down a row when the speed gate opens.
    ///
    /// Returns true if the head moved.
    pub fn advance(&mut self) -> bool {
        self.tick_counter += 1;
        if self.tick_counter < self.ticks_per_advance {
            return false;
        }
        self.tick_counter = 0;
        self.head_row = self.head_row.saturating_add(1);
        true
    }

    /// Back to [`ColumnState::Empty`]: fresh glyphs, a new negative stagger
    /// and a new speed.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        policy: &ColumnPolicy,
        glyphs: &GlyphSource,
        rng: &mut R,
    ) {
        for slot in &mut self.slots {
            *slot = glyphs.random_glyph(rng);
        }
        let stagger = rng.gen_range(1..=policy.max_stagger.max(1));
        self.head_row = -(stagger.min(i32::MAX as u32) as i32);
        self.fade_length = policy.fade_length.max(1);
        self.ticks_per_advance = rng.gen_range(policy.speed_range.clone()).max(1);
        self.tick_counter = 0;
    }

    /// Swap each visible glyph for a fresh draw with the given probability.
    pub fn flicker<R: Rng + ?Sized>(&mut self, probability: f64, glyphs: &GlyphSource, rng: &mut R) {
        if probability <= 0.0 {
            return;
        }
        for row in self.visible_rows() {
            if rng.gen_bool(probability.min(1.0)) {
                self.slots[row] = glyphs.random_glyph(rng);
            }
        }
    }

    /// One animation tick.
    ///
    /// A finished column is reset and does not move this tick; any other
    /// column advances (speed gated) and then flickers. Returns true when
    /// the column was reset.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        policy: &ColumnPolicy,
        glyphs: &GlyphSource,
        rng: &mut R,
    ) -> bool {
        if self.state() == ColumnState::Finished {
            self.reset(policy, glyphs, rng);
            return true;
        }
        self.advance();
        self.flicker(policy.flicker_probability, glyphs, rng);
        false
    }
}
