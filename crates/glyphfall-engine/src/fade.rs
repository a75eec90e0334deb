//! Trail fading: maps distance from the head to a cell style.

use glyphfall_core::{FadeCurve, Rgb};
use ratatui::style::{Color, Modifier, Style};

use crate::config::RenderConfig;

/// Visual attributes of one drawn cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub color: Rgb,
    /// Relative brightness in (0, 1]; the head is always 1.0.
    pub intensity: f32,
    pub bold: bool,
}

impl From<CellStyle> for Style {
    fn from(style: CellStyle) -> Self {
        let base = Style::new().fg(Color::from(style.color));
        if style.bold {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        }
    }
}

/// Pure mapping from trail position to [`CellStyle`].
#[derive(Debug, Clone, PartialEq)]
pub struct FadeStyler {
    fade_length: u32,
    curve: FadeCurve,
    min_intensity: f32,
    head_color: Rgb,
    trail_color: Rgb,
}

impl FadeStyler {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            fade_length: config.fade_length,
            curve: config.fade_curve,
            min_intensity: config.min_intensity,
            head_color: config.head_color,
            trail_color: config.trail_color,
        }
    }

    pub fn fade_length(&self) -> u32 {
        self.fade_length
    }

    /// Style of the leading glyph.
    pub fn head_style(&self) -> CellStyle {
        CellStyle {
            color: self.head_color,
            intensity: 1.0,
            bold: true,
        }
    }

    /// Style for a cell `distance` rows behind the head.
    ///
    /// Returns `None` when the cell is outside the trail (ahead of the head or
    /// further back than the fade length) and must not be drawn.
    pub fn style_for(&self, distance: i32) -> Option<CellStyle> {
        if distance < 0 || distance as i64 > self.fade_length as i64 {
            return None;
        }
        if distance == 0 {
            return Some(self.head_style());
        }

        let intensity = self.intensity_at(distance as u32);
        Some(CellStyle {
            color: self.trail_color.scale(intensity),
            intensity,
            bold: false,
        })
    }

    /// Intensity for `0 < distance <= fade_length`, remapped onto
    /// `[min_intensity, 1)` so the whole trail stays visible.
    fn intensity_at(&self, distance: u32) -> f32 {
        let raw = match self.curve {
            FadeCurve::Linear => 1.0 - distance as f32 / (self.fade_length as f32 + 1.0),
            FadeCurve::Exponential { decay } => decay.powi(distance as i32),
        };
        self.min_intensity + (1.0 - self.min_intensity) * raw.clamp(0.0, 1.0)
    }
}
