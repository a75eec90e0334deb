//! Settings persistence for glyphfall.
//!
//! Settings live in a TOML file in the platform config directory
//! (`~/.config/glyphfall/config.toml` on Linux). Every field is optional;
//! missing fields fall back to their defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use glyphfall_core::{AnimationSpeed, ColorTheme, ConfigError, FadeCurve};
use glyphfall_engine::{
    Charset, DEFAULT_FADE_LENGTH, DEFAULT_FLICKER_PROBABILITY, DEFAULT_MIN_INTENSITY, GlyphSet,
    RenderConfig,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Name of the settings file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors while loading, saving or applying settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine a config directory")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}

/// Trail falloff as written in the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeCurveKind {
    #[default]
    Linear,
    Exponential,
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Built-in glyph preset.
    pub charset: Charset,
    /// Custom glyphs; overrides `charset` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyphs: Option<Vec<String>>,
    pub theme: ColorTheme,
    pub speed: AnimationSpeed,
    /// Rows behind the head that stay visible.
    pub fade_length: u32,
    /// Fastest column: ticks per one-row advance.
    pub speed_min: u32,
    /// Slowest column: ticks per one-row advance.
    pub speed_max: u32,
    /// Largest start offset above the screen; 0 = `fade_length`.
    pub max_stagger: u32,
    pub flicker_probability: f64,
    pub fade_curve: FadeCurveKind,
    /// Per-row decay for the exponential curve.
    pub fade_decay: f32,
    pub min_intensity: f32,
    /// Fixed random seed for reproducible runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            charset: Charset::default(),
            glyphs: None,
            theme: ColorTheme::default(),
            speed: AnimationSpeed::default(),
            fade_length: DEFAULT_FADE_LENGTH,
            speed_min: 1,
            speed_max: 3,
            max_stagger: 0,
            flicker_probability: DEFAULT_FLICKER_PROBABILITY,
            fade_curve: FadeCurveKind::default(),
            fade_decay: 0.75,
            min_intensity: DEFAULT_MIN_INTENSITY,
            seed: None,
        }
    }
}

impl Settings {
    /// Default location of the settings file.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        ProjectDirs::from("", "", "glyphfall")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Write settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_err)
    }

    /// Glyph set selected by these settings.
    pub fn glyph_set(&self) -> Result<GlyphSet, ConfigError> {
        match &self.glyphs {
            Some(glyphs) => GlyphSet::new(glyphs.iter().cloned()),
            None => Ok(self.charset.glyph_set()),
        }
    }

    /// Build and validate the engine configuration.
    pub fn to_render_config(&self) -> Result<RenderConfig, ConfigError> {
        let fade_curve = match self.fade_curve {
            FadeCurveKind::Linear => FadeCurve::Linear,
            FadeCurveKind::Exponential => FadeCurve::Exponential {
                decay: self.fade_decay,
            },
        };
        let config = RenderConfig {
            fade_length: self.fade_length,
            speed_range: self.speed_min..=self.speed_max,
            max_stagger: self.max_stagger,
            flicker_probability: self.flicker_probability,
            fade_curve,
            min_intensity: self.min_intensity,
            tick_interval: self.speed.tick_interval(),
            ..RenderConfig::with_theme(self.glyph_set()?, self.theme)
        };
        config.validate()?;
        Ok(config)
    }
}
