//! Rectangular cell storage and the guarded write rule every stage goes through.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{CellState, Pos};

/// Source states a corridor or room write may replace.
pub const WALK_WRITABLE: &[CellState] = &[CellState::Empty, CellState::NoiseActive, CellState::Room];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = String;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let RawGrid { width, height, cells } = raw;
        match width.checked_mul(height) {
            Some(expected) if expected == cells.len() => Ok(Self { width, height, cells }),
            _ => Err(format!("{width}x{height} grid cannot hold {} cells", cells.len())),
        }
    }
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![CellState::Empty; width * height] }
    }

    /// Builds a grid from glyph rows (`.`, `@`, `*`, `#`). Returns `None` for ragged rows or
    /// unknown glyphs.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.chars().count() != width {
                return None;
            }
            for glyph in row.chars() {
                cells.push(CellState::from_glyph(glyph)?);
            }
        }
        Some(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn get(&self, pos: Pos) -> Option<CellState> {
        self.in_bounds(pos).then(|| self.cells[self.index(pos)])
    }

    /// Reads a cell the caller has already bounds-checked.
    pub fn cell(&self, pos: Pos) -> CellState {
        debug_assert!(self.in_bounds(pos), "read outside grid at {pos:?}");
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Pos, state: CellState) {
        debug_assert!(self.in_bounds(pos), "write outside grid at {pos:?}");
        let index = self.index(pos);
        self.cells[index] = state;
    }

    /// Writes `value` only when the current state is one of `allowed_sources`.
    /// Out-of-bounds positions and disallowed sources are ignored. Returns whether the
    /// cell was written.
    pub fn write_if(&mut self, pos: Pos, value: CellState, allowed_sources: &[CellState]) -> bool {
        match self.get(pos) {
            Some(current) if allowed_sources.contains(&current) => {
                self.set(pos, value);
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    /// Trail plus Room cells.
    pub fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_covered()).count()
    }

    pub fn coverage(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.covered_cells() as f64 / self.cells.len() as f64
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Pos { y: y as i32, x: x as i32 }))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.cells.len());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.cells.iter().map(|cell| cell.code()));
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}
