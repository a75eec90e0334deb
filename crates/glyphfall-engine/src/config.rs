//! Immutable render configuration.

use std::ops::RangeInclusive;
use std::time::Duration;

use glyphfall_core::{ColorTheme, ConfigError, FadeCurve, Rgb};

use crate::glyphs::GlyphSet;

/// Default number of rows behind the head that stay visible.
pub const DEFAULT_FADE_LENGTH: u32 = 8;

/// Default per-tick probability that a visible glyph is replaced.
pub const DEFAULT_FLICKER_PROBABILITY: f64 = 0.02;

/// Default intensity of the dimmest trail cell.
pub const DEFAULT_MIN_INTENSITY: f32 = 0.25;

/// Default interval between host ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Everything the engine needs to know about how the rain looks and moves.
///
/// Built once by the host and handed to the driver, which never mutates it.
/// Changing any field means building a new driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Glyphs columns are filled with.
    pub glyph_set: GlyphSet,
    /// Rows behind the head that are still drawn.
    pub fade_length: u32,
    /// Ticks per one-row advance; each column draws its own value from this range.
    pub speed_range: RangeInclusive<u32>,
    /// Largest negative start offset on reset. Zero means `fade_length`.
    pub max_stagger: u32,
    /// Per-tick chance that a visible glyph is swapped for a fresh one.
    pub flicker_probability: f64,
    /// Trail falloff shape.
    pub fade_curve: FadeCurve,
    /// Intensity of the dimmest trail cell, in (0, 1).
    pub min_intensity: f32,
    pub head_color: Rgb,
    pub trail_color: Rgb,
    /// Cadence the host is expected to tick at.
    pub tick_interval: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::with_theme(GlyphSet::default(), ColorTheme::default())
    }
}

impl RenderConfig {
    /// Default numeric policy with the colors of `theme`.
    pub fn with_theme(glyph_set: GlyphSet, theme: ColorTheme) -> Self {
        Self {
            glyph_set,
            fade_length: DEFAULT_FADE_LENGTH,
            speed_range: 1..=3,
            max_stagger: 0,
            flicker_probability: DEFAULT_FLICKER_PROBABILITY,
            fade_curve: FadeCurve::Linear,
            min_intensity: DEFAULT_MIN_INTENSITY,
            head_color: theme.head_color(),
            trail_color: theme.trail_color(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Check the numeric policy. The glyph set is valid by construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fade_length == 0 {
            return Err(ConfigError::InvalidFadeLength(self.fade_length));
        }
        let (min, max) = (*self.speed_range.start(), *self.speed_range.end());
        if min == 0 || min > max {
            return Err(ConfigError::InvalidSpeedRange { min, max });
        }
        if !(0.0..=1.0).contains(&self.flicker_probability) {
            return Err(ConfigError::InvalidFlickerProbability(
                self.flicker_probability,
            ));
        }
        if !(self.min_intensity > 0.0 && self.min_intensity < 1.0) {
            return Err(ConfigError::InvalidMinIntensity(self.min_intensity));
        }
        match self.fade_curve {
            FadeCurve::Exponential { decay } if !(decay > 0.0 && decay < 1.0) => {
                return Err(ConfigError::InvalidDecay(decay));
            }
            _ => {}
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::InvalidTickInterval);
        }
        Ok(())
    }
}
