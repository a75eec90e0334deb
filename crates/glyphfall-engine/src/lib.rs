//! Digital rain animation engine.
//!
//! Columns of random glyphs fall down a character grid, each led by a bright
//! head and followed by a fading trail. The engine owns the column state and
//! the per-tick update; it knows nothing about terminals, windows or fonts.
//! Hosts feed it surface metrics, call [`AnimationDriver::tick`] on their
//! frame cadence and receive one batch of [`RenderCell`]s per tick through a
//! [`Surface`].

mod column;
mod config;
mod driver;
mod fade;
mod glyphs;
mod grid;
mod surface;

pub use column::{Column, ColumnPolicy, ColumnState};
pub use config::{
    DEFAULT_FADE_LENGTH, DEFAULT_FLICKER_PROBABILITY, DEFAULT_MIN_INTENSITY,
    DEFAULT_TICK_INTERVAL, RenderConfig,
};
pub use driver::AnimationDriver;
pub use fade::{CellStyle, FadeStyler};
pub use glyphs::{Charset, GlyphId, GlyphSet, GlyphSource};
pub use grid::{ColumnGrid, GridSize, MAX_GRID_CELLS};
pub use surface::{BufferSurface, RenderCell, Surface};
