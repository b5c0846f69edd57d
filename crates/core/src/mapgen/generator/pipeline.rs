//! Phase-by-phase driver behind [`super::MapGenerator`].

use tracing::debug;

use super::super::automata::smooth;
use super::super::grid::{Grid, WALK_WRITABLE};
use super::super::model::{GeneratedMap, IterationStats};
use super::super::noise::{NoiseField, seed_grid};
use super::super::seed::{RandomSource, random_heading};
use super::super::walker::{self, AgentState, WalkParams};
use crate::config::GeneratorConfig;
use crate::types::{CellState, Heading, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationPhase {
    Initializing,
    NoiseSeeding,
    WalkPhase { iteration: u32 },
    SmoothPhase { iteration: u32 },
    Done,
}

pub(super) struct Pipeline<'a, R: RandomSource> {
    config: &'a GeneratorConfig,
    walk_params: WalkParams,
    rng: &'a mut R,
    noise_seed: u64,
    phase: GenerationPhase,
    grid: Grid,
    initial: Grid,
    agent: AgentState,
    pending: Option<IterationStats>,
    stats: Vec<IterationStats>,
}

impl<'a, R: RandomSource> Pipeline<'a, R> {
    pub(super) fn new(config: &'a GeneratorConfig, rng: &'a mut R, noise_seed: u64) -> Self {
        let grid = Grid::new(config.grid.width, config.grid.height);
        Self {
            config,
            walk_params: config.walk.params(),
            rng,
            noise_seed,
            phase: GenerationPhase::Initializing,
            initial: grid.clone(),
            grid,
            agent: AgentState { pos: Pos { y: 0, x: 0 }, heading: Heading::Right },
            pending: None,
            stats: Vec::with_capacity(config.iterations as usize),
        }
    }

    pub(super) fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub(super) fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Executes the current phase and moves to the next one. A no-op once `Done`.
    pub(super) fn advance(&mut self) -> GenerationPhase {
        let next = match self.phase {
            GenerationPhase::Initializing => GenerationPhase::NoiseSeeding,
            GenerationPhase::NoiseSeeding => {
                self.seed_terrain();
                self.first_round()
            }
            GenerationPhase::WalkPhase { iteration } => {
                self.walk(iteration);
                GenerationPhase::SmoothPhase { iteration }
            }
            GenerationPhase::SmoothPhase { iteration } => {
                self.smooth(iteration);
                self.round_after(iteration)
            }
            GenerationPhase::Done => GenerationPhase::Done,
        };

        if next != self.phase {
            debug!(from = ?self.phase, to = ?next, covered = self.grid.covered_cells(), "phase");
        }
        self.phase = next;
        next
    }

    pub(super) fn finish(self) -> GeneratedMap {
        debug_assert_eq!(self.phase, GenerationPhase::Done);
        GeneratedMap {
            noise_seed: self.noise_seed,
            initial: self.initial,
            grid: self.grid,
            agent: self.agent,
            iterations: self.stats,
        }
    }

    fn seed_terrain(&mut self) {
        let field = NoiseField::new(self.noise_seed);
        let noise = &self.config.noise;
        self.grid = seed_grid(
            &field,
            self.config.grid.width,
            self.config.grid.height,
            noise.scale,
            noise.threshold,
        );
        self.agent = place_agent(&mut self.grid, &mut *self.rng);
        self.initial = self.grid.clone();
    }

    fn walk(&mut self, iteration: u32) {
        let outcome = walker::run(&self.grid, self.agent, &self.walk_params, &mut *self.rng);
        self.pending = Some(IterationStats {
            iteration,
            walks_taken: outcome.walks_taken,
            rooms_placed: outcome.rooms_placed,
            covered_cells: outcome.covered_cells,
            smoothed_cells: 0,
        });
        self.grid = outcome.grid;
        self.agent = outcome.agent;
    }

    fn smooth(&mut self, iteration: u32) {
        let active_before = self.grid.count(CellState::NoiseActive);
        let automata = &self.config.automata;
        self.grid = smooth(&self.grid, automata.radius, automata.threshold);
        let smoothed_cells = self.grid.count(CellState::NoiseActive) - active_before;

        let walked = self.pending.take().unwrap_or(IterationStats {
            iteration,
            walks_taken: 0,
            rooms_placed: 0,
            covered_cells: self.grid.covered_cells(),
            smoothed_cells: 0,
        });
        self.stats.push(IterationStats { smoothed_cells, ..walked });
    }

    fn first_round(&self) -> GenerationPhase {
        if self.config.iterations == 0 {
            GenerationPhase::Done
        } else {
            GenerationPhase::WalkPhase { iteration: 0 }
        }
    }

    fn round_after(&self, iteration: u32) -> GenerationPhase {
        if iteration + 1 >= self.config.iterations {
            GenerationPhase::Done
        } else {
            GenerationPhase::WalkPhase { iteration: iteration + 1 }
        }
    }
}

/// Drops the agent on a random cell that is not already Trail or Room and marks it Trail.
/// Falls back to the grid centre if every draw collides.
fn place_agent(grid: &mut Grid, rng: &mut impl RandomSource) -> AgentState {
    let max_x = grid.width() as i32 - 1;
    let max_y = grid.height() as i32 - 1;
    let attempts = grid.len();

    let mut pos = Pos { y: max_y / 2, x: max_x / 2 };
    for _ in 0..attempts {
        let candidate = Pos { x: rng.next_int(0, max_x), y: rng.next_int(0, max_y) };
        if !grid.cell(candidate).is_covered() {
            pos = candidate;
            break;
        }
    }

    grid.write_if(pos, CellState::Trail, WALK_WRITABLE);
    AgentState { pos, heading: random_heading(rng) }
}
