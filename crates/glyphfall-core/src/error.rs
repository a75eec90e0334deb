//! Configuration errors raised while building the rain engine.

use thiserror::Error;

/// An invalid render configuration or surface metric.
///
/// Raised once, at construction or resize time. The engine never produces
/// one from `tick`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("glyph set must contain at least one glyph")]
    EmptyGlyphSet,
    #[error("glyph at index {0} is an empty string")]
    EmptyGlyph(usize),
    #[error("glyph at index {0} must be a single grapheme")]
    MultiGraphemeGlyph(usize),
    #[error("fade length must be at least 1, got {0}")]
    InvalidFadeLength(u32),
    #[error("speed range must satisfy 1 <= min <= max, got {min}..={max}")]
    InvalidSpeedRange { min: u32, max: u32 },
    #[error("flicker probability must be within 0.0..=1.0, got {0}")]
    InvalidFlickerProbability(f64),
    #[error("minimum intensity must be within (0.0, 1.0), got {0}")]
    InvalidMinIntensity(f32),
    #[error("exponential decay must be within (0.0, 1.0), got {0}")]
    InvalidDecay(f32),
    #[error("tick interval must be non-zero")]
    InvalidTickInterval,
    #[error("character metrics must be positive, got {width}x{height}")]
    InvalidMetrics { width: f64, height: f64 },
}
