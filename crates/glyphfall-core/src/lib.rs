//! Core types for the glyphfall digital rain.
//!
//! Holds the small value types shared between the animation engine, the
//! settings loader and the terminal host: colors and themes, animation
//! speeds, the fade curve and the configuration error.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod color;
mod error;

pub use color::{Rgb, hsl_to_rgb};
pub use error::ConfigError;

/// Color theme for the rain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Green,
    Cyan,
    Amber,
    Magenta,
    Red,
    Blue,
    White,
}

impl ColorTheme {
    /// All themes in cycle order.
    pub const ALL: [ColorTheme; 7] = [
        ColorTheme::Green,
        ColorTheme::Cyan,
        ColorTheme::Amber,
        ColorTheme::Magenta,
        ColorTheme::Red,
        ColorTheme::Blue,
        ColorTheme::White,
    ];

    /// Cycle to the next color theme.
    pub fn next(self) -> Self {
        match self {
            ColorTheme::Green => ColorTheme::Cyan,
            ColorTheme::Cyan => ColorTheme::Amber,
            ColorTheme::Amber => ColorTheme::Magenta,
            ColorTheme::Magenta => ColorTheme::Red,
            ColorTheme::Red => ColorTheme::Blue,
            ColorTheme::Blue => ColorTheme::White,
            ColorTheme::White => ColorTheme::Green,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::Green => "green",
            ColorTheme::Cyan => "cyan",
            ColorTheme::Amber => "amber",
            ColorTheme::Magenta => "magenta",
            ColorTheme::Red => "red",
            ColorTheme::Blue => "blue",
            ColorTheme::White => "white",
        }
    }

    /// Hue (degrees) and saturation of the theme.
    fn hue_saturation(self) -> (f32, f32) {
        match self {
            ColorTheme::Green => (120.0, 1.0),
            ColorTheme::Cyan => (180.0, 1.0),
            ColorTheme::Amber => (40.0, 1.0),
            ColorTheme::Magenta => (300.0, 1.0),
            ColorTheme::Red => (0.0, 1.0),
            ColorTheme::Blue => (220.0, 1.0),
            ColorTheme::White => (0.0, 0.0),
        }
    }

    /// Color of the leading glyph: a pale tint of the theme hue.
    pub fn head_color(self) -> Rgb {
        let (h, s) = self.hue_saturation();
        if s == 0.0 {
            return Rgb(255, 255, 255);
        }
        hsl_to_rgb(h, s, 0.9)
    }

    /// Full-intensity color of the trail.
    pub fn trail_color(self) -> Rgb {
        let (h, s) = self.hue_saturation();
        if s == 0.0 {
            return Rgb(190, 190, 190);
        }
        hsl_to_rgb(h, s, 0.5)
    }
}

/// Animation speed setting; selects the host's tick interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Cycle to the next speed.
    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    /// Interval between animation ticks.
    pub fn tick_interval(self) -> Duration {
        match self {
            AnimationSpeed::Slow => Duration::from_millis(80),
            AnimationSpeed::Medium => Duration::from_millis(50),
            AnimationSpeed::Fast => Duration::from_millis(30),
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        }
    }
}

/// Shape of the intensity falloff along a trail.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum FadeCurve {
    /// `1 - d / (fade_length + 1)`.
    #[default]
    Linear,
    /// `decay ^ d`, with `decay` in (0, 1).
    Exponential { decay: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_cycle_visits_all() {
        let mut theme = ColorTheme::default();
        for expected in ColorTheme::ALL {
            assert_eq!(theme, expected);
            theme = theme.next();
        }
        assert_eq!(theme, ColorTheme::Green);
    }

    #[test]
    fn test_head_brighter_than_trail() {
        for theme in ColorTheme::ALL {
            assert!(
                theme.head_color().luminance() > theme.trail_color().luminance(),
                "{}",
                theme.name()
            );
        }
    }

    #[test]
    fn test_green_palette() {
        assert_eq!(ColorTheme::Green.trail_color(), Rgb(0, 255, 0));
        let Rgb(r, g, b) = ColorTheme::Green.head_color();
        assert!(r > 190 && g > 250 && b > 190);
    }

    #[test]
    fn test_speed_intervals_ordered() {
        assert!(AnimationSpeed::Slow.tick_interval() > AnimationSpeed::Medium.tick_interval());
        assert!(AnimationSpeed::Medium.tick_interval() > AnimationSpeed::Fast.tick_interval());
        assert_eq!(AnimationSpeed::Fast.next(), AnimationSpeed::Slow);
    }
}
