//! Glyph sets and random glyph selection.

use glyphfall_core::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Katakana and digits.
pub const KATAKANA_CHARS: &[char] = &[
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', 'サ', 'シ', 'ス', 'セ', 'ソ', 'タ',
    'チ', 'ツ', 'テ', 'ト', 'ナ', 'ニ', 'ヌ', 'ネ', 'ノ', 'ハ', 'ヒ', 'フ', 'ヘ', 'ホ', 'マ', 'ミ',
    'ム', 'メ', 'モ', 'ヤ', 'ユ', 'ヨ', 'ラ', 'リ', 'ル', 'レ', 'ロ', 'ワ', 'ン', '0', '1', '2',
    '3', '4', '5', '6', '7', '8', '9',
];

/// Binary digits.
pub const BINARY_CHARS: &[char] = &['0', '1'];

/// Decimal digits.
pub const DIGIT_CHARS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Latin letters, digits and a few symbols, all single-width.
pub const ASCII_CHARS: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    ':', '.', '=', '*', '+', '-', '<', '>', '|', '"', '_',
];

/// Built-in glyph presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    #[default]
    Katakana,
    Binary,
    Digits,
    Ascii,
}

impl Charset {
    /// Characters of the preset.
    pub fn chars(self) -> &'static [char] {
        match self {
            Charset::Katakana => KATAKANA_CHARS,
            Charset::Binary => BINARY_CHARS,
            Charset::Digits => DIGIT_CHARS,
            Charset::Ascii => ASCII_CHARS,
        }
    }

    /// Build the glyph set for this preset.
    pub fn glyph_set(self) -> GlyphSet {
        GlyphSet {
            glyphs: self.chars().iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Index of a glyph inside a [`GlyphSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphId(pub(crate) usize);

impl GlyphId {
    /// Raw index into the owning set.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered, non-empty sequence of glyphs. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphSet {
    glyphs: Vec<String>,
}

impl GlyphSet {
    /// Build a glyph set. Every glyph must be exactly one grapheme cluster.
    pub fn new<I, S>(glyphs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let glyphs: Vec<String> = glyphs.into_iter().map(Into::into).collect();
        if glyphs.is_empty() {
            return Err(ConfigError::EmptyGlyphSet);
        }
        for (idx, glyph) in glyphs.iter().enumerate() {
            match glyph.graphemes(true).count() {
                0 => return Err(ConfigError::EmptyGlyph(idx)),
                1 => {}
                _ => return Err(ConfigError::MultiGraphemeGlyph(idx)),
            }
        }
        Ok(Self { glyphs })
    }

    /// Build a glyph set from single characters.
    pub fn from_chars(chars: &[char]) -> Result<Self, ConfigError> {
        Self::new(chars.iter().map(|c| c.to_string()))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph for `id`. Ids only come from this set's source, so they are in range.
    pub fn get(&self, id: GlyphId) -> &str {
        &self.glyphs[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.glyphs.iter().map(String::as_str)
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Charset::default().glyph_set()
    }
}

/// Uniform random glyph provider over a fixed [`GlyphSet`].
///
/// Holds no mutable state; every draw consumes entropy from the caller's
/// random source, so it can be called for every cell of every frame.
#[derive(Debug, Clone)]
pub struct GlyphSource {
    set: GlyphSet,
}

impl GlyphSource {
    pub fn new(set: GlyphSet) -> Self {
        Self { set }
    }

    /// Draw one glyph uniformly at random.
    pub fn random_glyph<R: Rng + ?Sized>(&self, rng: &mut R) -> GlyphId {
        GlyphId(rng.gen_range(0..self.set.len()))
    }

    /// Draw one glyph uniformly at random and return its text.
    pub fn random_glyph_str<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let id = self.random_glyph(rng);
        self.set.get(id)
    }

    /// Text of a previously drawn glyph.
    pub fn glyph(&self, id: GlyphId) -> &str {
        self.set.get(id)
    }

    pub fn set(&self) -> &GlyphSet {
        &self.set
    }
}
