//! The set of columns spanning the surface.

use glyphfall_core::ConfigError;
use rand::Rng;

use crate::column::{Column, ColumnPolicy};
use crate::fade::FadeStyler;
use crate::glyphs::GlyphSource;
use crate::surface::RenderCell;

/// Grid axes are capped to what a terminal buffer can address.
const MAX_CELLS_PER_AXIS: usize = u16::MAX as usize;

/// Cap on `columns * rows`. Rows are dropped first so the rain keeps
/// spanning the full width.
pub const MAX_GRID_CELLS: usize = 1 << 21;

/// Column and row counts derived from surface metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSize {
    pub columns: usize,
    pub rows: usize,
}

impl GridSize {
    /// `columns = floor(width / char_width)`, `rows = floor(height / char_height)`.
    ///
    /// Non-positive surface dimensions give an empty size. Non-positive or
    /// non-finite character metrics are a configuration error. Oversized
    /// surfaces are clamped to [`MAX_GRID_CELLS`].
    pub fn from_metrics(
        surface_width: f64,
        surface_height: f64,
        character_width: f64,
        character_height: f64,
    ) -> Result<Self, ConfigError> {
        let valid_metric = |m: f64| m.is_finite() && m > 0.0;
        if !valid_metric(character_width) || !valid_metric(character_height) {
            return Err(ConfigError::InvalidMetrics {
                width: character_width,
                height: character_height,
            });
        }

        let cells = |extent: f64, metric: f64| -> usize {
            if extent.is_nan() || extent <= 0.0 {
                return 0;
            }
            let count = (extent / metric).floor();
            if count >= MAX_CELLS_PER_AXIS as f64 {
                MAX_CELLS_PER_AXIS
            } else {
                count as usize
            }
        };

        let columns = cells(surface_width, character_width);
        let rows = cells(surface_height, character_height);
        // A surface without rows or without columns draws nothing either way.
        if columns == 0 || rows == 0 {
            return Ok(Self::default());
        }
        Ok(Self {
            columns,
            rows: rows.min(MAX_GRID_CELLS / columns),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }
}

/// All columns of the rain, one per character slot across the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGrid {
    columns: Vec<Column>,
    rows: usize,
    policy: ColumnPolicy,
}

impl ColumnGrid {
    /// A grid with no columns; ticking it draws nothing.
    pub fn empty(policy: ColumnPolicy) -> Self {
        Self {
            columns: Vec::new(),
            rows: 0,
            policy,
        }
    }

    /// Build a grid with every column freshly reset.
    pub fn new<R: Rng + ?Sized>(
        size: GridSize,
        policy: ColumnPolicy,
        glyphs: &GlyphSource,
        rng: &mut R,
    ) -> Self {
        if size.is_empty() {
            return Self::empty(policy);
        }
        let columns = (0..size.columns)
            .map(|x| Column::spawn(x, size.rows, &policy, glyphs, rng))
            .collect();
        Self {
            columns,
            rows: size.rows,
            policy,
        }
    }

    /// Build a grid from explicit columns. All columns must span `rows`.
    pub fn from_columns(columns: Vec<Column>, rows: usize, policy: ColumnPolicy) -> Self {
        debug_assert!(columns.iter().all(|c| c.rows() == rows));
        Self {
            columns,
            rows,
            policy,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn size(&self) -> GridSize {
        GridSize {
            columns: self.columns.len(),
            rows: self.rows,
        }
    }

    pub fn policy(&self) -> &ColumnPolicy {
        &self.policy
    }

    /// Reset every column with fresh staggering.
    pub fn reset_all<R: Rng + ?Sized>(&mut self, glyphs: &GlyphSource, rng: &mut R) {
        for column in &mut self.columns {
            column.reset(&self.policy, glyphs, rng);
        }
    }

    /// Advance every column by one tick. Returns how many were recycled.
    pub fn step<R: Rng + ?Sized>(&mut self, glyphs: &GlyphSource, rng: &mut R) -> usize {
        let mut recycled = 0;
        for column in &mut self.columns {
            if column.step(&self.policy, glyphs, rng) {
                recycled += 1;
            }
        }
        recycled
    }

    /// Append a draw instruction for every visible trail cell.
    pub fn collect_cells<'a>(
        &self,
        styler: &FadeStyler,
        glyphs: &'a GlyphSource,
        out: &mut Vec<RenderCell<'a>>,
    ) {
        for column in &self.columns {
            for row in column.visible_rows() {
                let distance = column.head_row() as i64 - row as i64;
                let Some(style) = i32::try_from(distance)
                    .ok()
                    .and_then(|d| styler.style_for(d))
                else {
                    continue;
                };
                let Some(glyph) = column.glyph_at(row) else {
                    continue;
                };
                out.push(RenderCell {
                    row,
                    column: column.x(),
                    glyph: glyphs.glyph(glyph),
                    style,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::glyphs::GlyphSet;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_size_from_metrics() {
        assert_eq!(
            GridSize::from_metrics(80.0, 24.0, 1.0, 1.0),
            Ok(GridSize {
                columns: 80,
                rows: 24
            })
        );
        assert_eq!(
            GridSize::from_metrics(81.0, 24.9, 2.0, 1.0),
            Ok(GridSize {
                columns: 40,
                rows: 24
            })
        );
        assert_eq!(
            GridSize::from_metrics(1920.0, 1080.0, 12.5, 18.0),
            Ok(GridSize {
                columns: 153,
                rows: 60
            })
        );
    }

    #[test]
    fn test_size_degenerate_surface() {
        assert_eq!(
            GridSize::from_metrics(0.0, 24.0, 1.0, 1.0),
            Ok(GridSize::default())
        );
        assert_eq!(
            GridSize::from_metrics(-5.0, -5.0, 1.0, 1.0),
            Ok(GridSize::default())
        );
        assert_eq!(
            GridSize::from_metrics(80.0, 0.5, 1.0, 1.0),
            Ok(GridSize::default())
        );
        assert_eq!(
            GridSize::from_metrics(f64::NAN, 10.0, 1.0, 1.0),
            Ok(GridSize::default())
        );
    }

    #[test]
    fn test_size_rejects_bad_metrics() {
        assert!(GridSize::from_metrics(80.0, 24.0, 0.0, 1.0).is_err());
        assert!(GridSize::from_metrics(80.0, 24.0, 1.0, -1.0).is_err());
        assert!(GridSize::from_metrics(80.0, 24.0, f64::INFINITY, 1.0).is_err());
        assert!(GridSize::from_metrics(80.0, 24.0, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_size_capped() {
        let size = GridSize::from_metrics(1e12, 1e12, 1.0, 1.0).unwrap();
        assert_eq!(size.columns, MAX_CELLS_PER_AXIS);
        assert_eq!(size.rows, MAX_GRID_CELLS / MAX_CELLS_PER_AXIS);
        assert!(size.columns * size.rows <= MAX_GRID_CELLS);

        let tall = GridSize::from_metrics(10.0, 1e9, 1.0, 1.0).unwrap();
        assert_eq!(tall.columns, 10);
        assert_eq!(tall.rows, MAX_CELLS_PER_AXIS);

        let config = RenderConfig::default();
        let glyphs = GlyphSource::new(GlyphSet::default());
        let mut rng = StdRng::seed_from_u64(4);
        let mut grid = ColumnGrid::new(size, ColumnPolicy::new(&config), &glyphs, &mut rng);
        assert_eq!(grid.size(), size);
        grid.step(&glyphs, &mut rng);
        let mut cells = Vec::new();
        grid.collect_cells(&FadeStyler::new(&config), &glyphs, &mut cells);
        assert!(cells.len() <= MAX_GRID_CELLS);
    }

    #[test]
    fn test_new_grid_columns_start_empty() {
        let config = RenderConfig::default();
        let glyphs = GlyphSource::new(GlyphSet::default());
        let mut rng = StdRng::seed_from_u64(8);
        let size = GridSize {
            columns: 30,
            rows: 12,
        };
        let grid = ColumnGrid::new(size, ColumnPolicy::new(&config), &glyphs, &mut rng);

        assert_eq!(grid.size(), size);
        for (x, column) in grid.columns().iter().enumerate() {
            assert_eq!(column.x(), x);
            assert_eq!(column.rows(), 12);
            assert!((-(config.fade_length as i32)..0).contains(&column.head_row()));
        }
    }

    #[test]
    fn test_staggered_entry() {
        let config = RenderConfig::default();
        let glyphs = GlyphSource::new(GlyphSet::default());
        let mut rng = StdRng::seed_from_u64(8);
        let size = GridSize {
            columns: 50,
            rows: 20,
        };
        let grid = ColumnGrid::new(size, ColumnPolicy::new(&config), &glyphs, &mut rng);
        let first = grid.columns()[0].head_row();
        assert!(grid.columns().iter().any(|c| c.head_row() != first));
    }

    #[test]
    fn test_empty_grid_collects_nothing() {
        let config = RenderConfig::default();
        let glyphs = GlyphSource::new(GlyphSet::default());
        let mut rng = StdRng::seed_from_u64(0);
        let mut grid = ColumnGrid::empty(ColumnPolicy::new(&config));
        assert_eq!(grid.step(&glyphs, &mut rng), 0);
        let mut cells = Vec::new();
        grid.collect_cells(&FadeStyler::new(&config), &glyphs, &mut cells);
        assert!(cells.is_empty());
    }
}
