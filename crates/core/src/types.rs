use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn offset(self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        Pos { y: self.y + dy, x: self.x + dx }
    }
}

/// State of a single map cell.
///
/// `Trail` and `Room` are written by the walker, `NoiseActive` by noise seeding and
/// smoothing. Only `Empty` cells are ever re-evaluated by the automaton.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CellState {
    #[default]
    Empty,
    Trail,
    NoiseActive,
    Room,
}

impl CellState {
    pub const ALL: [CellState; 4] =
        [CellState::Empty, CellState::Trail, CellState::NoiseActive, CellState::Room];

    pub fn code(self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::Trail => 1,
            CellState::NoiseActive => 2,
            CellState::Room => 3,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Trail => '@',
            CellState::NoiseActive => '*',
            CellState::Room => '#',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.glyph() == glyph)
    }

    /// Cells the cellular automaton must leave untouched.
    pub fn is_protected(self) -> bool {
        !matches!(self, CellState::Empty)
    }

    pub fn is_covered(self) -> bool {
        matches!(self, CellState::Trail | CellState::Room)
    }
}

/// Cardinal heading of the drunk agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub const CARDINALS: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }
}
