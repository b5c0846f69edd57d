//! Public data models for a finished generation run.

use serde::Serialize;

use super::grid::Grid;
use super::walker::AgentState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IterationStats {
    pub iteration: u32,
    pub walks_taken: u32,
    pub rooms_placed: u32,
    pub covered_cells: usize,
    /// Empty cells the smoothing pass turned NoiseActive.
    pub smoothed_cells: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedMap {
    pub noise_seed: u64,
    /// Grid straight after noise seeding and agent placement.
    pub initial: Grid,
    pub grid: Grid,
    pub agent: AgentState,
    pub iterations: Vec<IterationStats>,
}

impl GeneratedMap {
    pub fn rooms_placed(&self) -> u32 {
        self.iterations.iter().map(|stats| stats.rooms_placed).sum()
    }

    pub fn fingerprint(&self) -> u64 {
        self.grid.fingerprint()
    }
}
