//! Draw output: the per-tick cell batch and the surfaces that consume it.

use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use crate::fade::CellStyle;

/// One draw instruction. Only lives for the duration of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCell<'a> {
    pub row: usize,
    pub column: usize,
    pub glyph: &'a str,
    pub style: CellStyle,
}

/// Receives the draw instructions produced by a tick.
///
/// `present` is called exactly once per tick, possibly with an empty batch.
pub trait Surface {
    fn present(&mut self, cells: &[RenderCell<'_>]);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn present(&mut self, cells: &[RenderCell<'_>]) {
        (**self).present(cells);
    }
}

/// Surface backed by a ratatui [`Buffer`].
///
/// Grid column `c` lands at `area.x + c * cell_width`, grid row `r` at
/// `area.y + r`. Cells falling outside `area` are dropped.
#[derive(Debug)]
pub struct BufferSurface<'a> {
    buffer: &'a mut Buffer,
    area: Rect,
    cell_width: u16,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buffer: &'a mut Buffer, area: Rect, cell_width: u16) -> Self {
        Self {
            buffer,
            area,
            cell_width: cell_width.max(1),
        }
    }

    fn position(&self, cell: &RenderCell<'_>) -> Option<(u16, u16)> {
        let dx = u16::try_from(cell.column)
            .ok()?
            .checked_mul(self.cell_width)?;
        let dy = u16::try_from(cell.row).ok()?;
        if dx >= self.area.width || dy >= self.area.height {
            return None;
        }
        Some((self.area.x + dx, self.area.y + dy))
    }
}

impl Surface for BufferSurface<'_> {
    fn present(&mut self, cells: &[RenderCell<'_>]) {
        for cell in cells {
            if let Some((x, y)) = self.position(cell) {
                self.buffer
                    .set_string(x, y, cell.glyph, Style::from(cell.style));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfall_core::Rgb;
    use ratatui::style::Color;

    fn cell(row: usize, column: usize, glyph: &str) -> RenderCell<'_> {
        RenderCell {
            row,
            column,
            glyph,
            style: CellStyle {
                color: Rgb(0, 200, 0),
                intensity: 0.8,
                bold: false,
            },
        }
    }

    #[test]
    fn test_buffer_surface_places_cells() {
        let area = Rect::new(0, 0, 6, 3);
        let mut buffer = Buffer::empty(area);
        let mut surface = BufferSurface::new(&mut buffer, area, 2);
        surface.present(&[cell(0, 0, "a"), cell(2, 1, "b")]);

        assert_eq!(buffer.cell((0, 0)).unwrap().symbol(), "a");
        assert_eq!(buffer.cell((2, 2)).unwrap().symbol(), "b");
        assert_eq!(buffer.cell((2, 2)).unwrap().fg, Color::Rgb(0, 200, 0));
        assert_eq!(buffer.cell((1, 0)).unwrap().symbol(), " ");
    }

    #[test]
    fn test_buffer_surface_clips_outside_area() {
        let area = Rect::new(1, 1, 4, 2);
        let mut buffer = Buffer::empty(Rect::new(0, 0, 6, 4));
        let mut surface = BufferSurface::new(&mut buffer, area, 1);
        surface.present(&[cell(5, 0, "x"), cell(0, 9, "y"), cell(1, 3, "z")]);

        assert_eq!(buffer.cell((4, 2)).unwrap().symbol(), "z");
        let drawn = buffer
            .content()
            .iter()
            .filter(|c| c.symbol() != " ")
            .count();
        assert_eq!(drawn, 1);
    }
}
