//! Rectangular room validation and stamping.

use super::grid::{Grid, WALK_WRITABLE};
use crate::types::{CellState, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoomRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoomRect {
    /// Room of the given size whose centre cell is `center` (rounded towards the top-left).
    pub fn centered_on(center: Pos, width: i32, height: i32) -> Self {
        Self { x: center.x - width / 2, y: center.y - height / 2, width, height }
    }

    fn right(self) -> i32 {
        self.x + self.width - 1
    }

    fn bottom(self) -> i32 {
        self.y + self.height - 1
    }

    pub fn expanded(self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }

    pub fn cells(self) -> impl Iterator<Item = Pos> {
        let (left, right) = (self.x, self.right());
        (self.y..=self.bottom()).flat_map(move |y| (left..=right).map(move |x| Pos { y, x }))
    }

    /// The one-cell ring just outside the rectangle, corners included.
    pub fn border(self) -> impl Iterator<Item = Pos> {
        let ring = self.expanded(1);
        ring.cells().filter(move |&pos| !self.contains(pos))
    }
}

/// Whether `room` fits inside the grid without touching or overlapping an existing Room.
///
/// Any Room cell on the surrounding ring (which includes the four outer corners and the cells
/// flanking each corner) or inside the footprint rejects the placement.
pub fn is_placeable(grid: &Grid, room: RoomRect) -> bool {
    if room.width <= 0 || room.height <= 0 {
        return false;
    }
    if !room.cells().all(|pos| grid.in_bounds(pos)) {
        return false;
    }
    let is_room = |pos: Pos| grid.get(pos) == Some(CellState::Room);
    !room.border().any(is_room) && !room.cells().any(is_room)
}

/// Returns a copy of `grid` with `room` stamped in.
pub fn stamp(grid: &Grid, room: RoomRect) -> Grid {
    let mut next = grid.clone();
    carve_room(&mut next, room);
    next
}

/// Writes Room over the footprint; Trail cells inside it stay Trail.
pub(crate) fn carve_room(grid: &mut Grid, room: RoomRect) {
    for pos in room.cells() {
        grid.write_if(pos, CellState::Room, WALK_WRITABLE);
    }
}
