use crate::mapgen::Grid;

pub trait Render {
    fn render(&self, grid: &Grid) -> String;
}

/// Plain one-glyph-per-cell text, one line per row.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlyphRenderer;

impl Render for GlyphRenderer {
    fn render(&self, grid: &Grid) -> String {
        let mut text = String::with_capacity((grid.width() + 1) * grid.height());
        for row in grid.rows() {
            text.extend(row.iter().map(|cell| cell.glyph()));
            text.push('\n');
        }
        text
    }
}
