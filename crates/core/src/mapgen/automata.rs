//! One synchronous cellular-automata smoothing step.

use super::grid::Grid;
use crate::types::{CellState, Pos};

/// Re-evaluates every Empty cell against the NoiseActive share of its square neighbourhood.
///
/// Neighbour counts always read `current`; results land in a fresh grid, so no cell sees
/// another cell's output from the same pass.
pub fn smooth(current: &Grid, radius: u32, threshold: f64) -> Grid {
    let mut next = current.clone();
    let widest = i32::try_from(current.width().max(current.height())).unwrap_or(i32::MAX);
    let radius = i32::try_from(radius).unwrap_or(i32::MAX).min(widest);

    for pos in current.positions() {
        if current.cell(pos).is_protected() {
            continue;
        }

        let activity = neighbour_activity(current, pos, radius);
        let state = if activity >= threshold { CellState::NoiseActive } else { CellState::Empty };
        next.set(pos, state);
    }

    next
}

/// Share of in-bounds neighbours within `radius` that are NoiseActive; 0 when there are none.
pub fn neighbour_activity(grid: &Grid, pos: Pos, radius: i32) -> f64 {
    let mut active = 0_u32;
    let mut total = 0_u32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx == 0 && dy == 0 {
                continue;
            }
            match grid.get(Pos { y: pos.y + dy, x: pos.x + dx }) {
                Some(CellState::NoiseActive) => {
                    active += 1;
                    total += 1;
                }
                Some(_) => total += 1,
                None => {}
            }
        }
    }

    if total == 0 { 0.0 } else { f64::from(active) / f64::from(total) }
}
