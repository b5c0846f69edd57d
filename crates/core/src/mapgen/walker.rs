//! Drunk-agent corridor carving with opportunistic room placement.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::grid::{Grid, WALK_WRITABLE};
use super::rooms::{RoomRect, carve_room, is_placeable};
use super::seed::{RandomSource, random_heading};
use crate::types::{CellState, Heading, Pos};

/// Position and heading of the walker. Survives from one walk phase to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentState {
    pub pos: Pos,
    pub heading: Heading,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WalkParams {
    /// Walks per phase (J).
    pub walks: u32,
    /// Steps per walk (I).
    pub steps: u32,
    pub room_width: u32,
    pub room_height: u32,
    pub room_chance: f64,
    pub room_chance_increment: f64,
    pub turn_chance: f64,
    pub turn_chance_increment: f64,
    /// Stop early once this share of the grid is Trail or Room. `None` always runs every walk.
    pub coverage_target: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkOutcome {
    pub grid: Grid,
    pub agent: AgentState,
    pub walks_taken: u32,
    pub rooms_placed: u32,
    pub covered_cells: usize,
}

/// Escalating chance on a 0..=10 scale: grows by its increment after every miss and
/// drops back to the base after a hit.
#[derive(Clone, Copy, Debug)]
struct Chance {
    base: f64,
    increment: f64,
    current: f64,
}

impl Chance {
    fn new(probability: f64, increment: f64) -> Self {
        let base = probability * 10.0;
        Self { base, increment: increment * 10.0, current: base }
    }

    /// Always consumes one draw so the stream position does not depend on the outcome.
    fn roll(&self, rng: &mut impl RandomSource) -> bool {
        let draw = rng.next_int(0, 10);
        self.current > 0.0 && f64::from(draw) <= self.current
    }

    fn reset(&mut self) {
        self.current = self.base;
    }

    fn escalate(&mut self) {
        self.current += self.increment;
    }
}

/// Runs one walk phase over a copy of `grid`.
pub fn run(
    grid: &Grid,
    agent: AgentState,
    params: &WalkParams,
    rng: &mut impl RandomSource,
) -> WalkOutcome {
    let mut grid = grid.clone();
    let mut agent = agent;
    let mut turn = Chance::new(params.turn_chance, params.turn_chance_increment);
    let mut room = Chance::new(params.room_chance, params.room_chance_increment);
    let mut walks_taken = 0;
    let mut rooms_placed = 0;

    grid.write_if(agent.pos, CellState::Trail, WALK_WRITABLE);

    if !coverage_reached(&grid, params.coverage_target) {
        for _ in 0..params.walks {
            walks_taken += 1;

            if turn.roll(rng) {
                agent.heading = random_heading(rng);
                turn.reset();
            } else {
                turn.escalate();
            }

            if room.roll(rng) && try_place_room(&mut grid, agent.pos, params) {
                rooms_placed += 1;
                room.reset();
            } else {
                room.escalate();
            }

            take_steps(&mut grid, &mut agent, params.steps, rng);

            if coverage_reached(&grid, params.coverage_target) {
                debug!(walks_taken, covered = grid.covered_cells(), "coverage target reached");
                break;
            }
        }
    }

    let covered_cells = grid.covered_cells();
    WalkOutcome { grid, agent, walks_taken, rooms_placed, covered_cells }
}

fn try_place_room(grid: &mut Grid, center: Pos, params: &WalkParams) -> bool {
    let rect = RoomRect::centered_on(center, params.room_width as i32, params.room_height as i32);
    if !is_placeable(grid, rect) {
        trace!(?rect, "room rejected");
        return false;
    }
    carve_room(grid, rect);
    trace!(?rect, "room placed");
    true
}

/// Advances the agent `steps` cells, marking each new cell Trail. A blocked step turns the
/// agent towards a random open direction without consuming the step.
fn take_steps(grid: &mut Grid, agent: &mut AgentState, steps: u32, rng: &mut impl RandomSource) {
    let mut taken = 0;
    while taken < steps {
        let next = agent.pos.offset(agent.heading);
        if grid.in_bounds(next) {
            agent.pos = next;
            grid.write_if(next, CellState::Trail, WALK_WRITABLE);
            taken += 1;
            continue;
        }

        let Some(heading) = redirect(grid, agent.pos, rng) else {
            return;
        };
        agent.heading = heading;
    }
}

/// Uniform pick among headings that stay on the grid; `None` on a single-cell grid.
///
/// Redrawing until an open heading comes up yields the same distribution, but a filtered
/// pick cannot spin on a source that keeps returning a blocked heading.
fn redirect(grid: &Grid, pos: Pos, rng: &mut impl RandomSource) -> Option<Heading> {
    let open: Vec<Heading> = Heading::CARDINALS
        .into_iter()
        .filter(|&heading| grid.in_bounds(pos.offset(heading)))
        .collect();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.next_int(0, open.len() as i32 - 1) as usize])
}

fn coverage_reached(grid: &Grid, target: Option<f64>) -> bool {
    target.is_some_and(|target| grid.coverage() >= target)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::mapgen::seed::ChaChaSource;

    /// Replays a fixed list of raw values, reduced into each requested range.
    struct ScriptedSource {
        values: Vec<u32>,
        cursor: usize,
    }

    impl ScriptedSource {
        fn new(values: Vec<u32>) -> Self {
            Self { values, cursor: 0 }
        }
    }

    impl RandomSource for ScriptedSource {
        fn next_int(&mut self, low: i32, high: i32) -> i32 {
            let raw = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            let span = (high - low + 1) as u32;
            low + (raw % span) as i32
        }
    }

    fn still_params(walks: u32, steps: u32) -> WalkParams {
        WalkParams {
            walks,
            steps,
            room_width: 3,
            room_height: 3,
            room_chance: 0.0,
            room_chance_increment: 0.0,
            turn_chance: 0.0,
            turn_chance_increment: 0.0,
            coverage_target: None,
        }
    }

    #[test]
    fn straight_walk_stops_on_the_boundary() {
        let agent = AgentState { pos: Pos { y: 2, x: 2 }, heading: Heading::Right };
        let outcome =
            run(&Grid::new(5, 5), agent, &still_params(1, 2), &mut ChaChaSource::seeded(1));

        let expected = Grid::from_rows(&[".....", ".....", "..@@@", ".....", "....."])
            .expect("valid rows");
        assert_eq!(outcome.grid, expected);
        assert_eq!(outcome.agent.pos, Pos { y: 2, x: 4 });
        assert_eq!(outcome.walks_taken, 1);
        assert_eq!(outcome.rooms_placed, 0);
    }

    #[test]
    fn blocked_step_redirects_without_consuming_the_step() {
        for seed in 0..20 {
            let agent = AgentState { pos: Pos { y: 2, x: 2 }, heading: Heading::Right };
            let outcome =
                run(&Grid::new(5, 5), agent, &still_params(1, 3), &mut ChaChaSource::seeded(seed));

            for x in 2..=4 {
                assert_eq!(outcome.grid.cell(Pos { y: 2, x }), CellState::Trail);
            }
            assert_ne!(outcome.agent.heading, Heading::Right);
            assert!(
                [Pos { y: 1, x: 4 }, Pos { y: 3, x: 4 }, Pos { y: 2, x: 3 }]
                    .contains(&outcome.agent.pos),
                "seed {seed} ended at {:?}",
                outcome.agent.pos
            );
        }
    }

    #[test]
    fn zero_probabilities_never_turn_or_place_rooms() {
        let agent = AgentState { pos: Pos { y: 0, x: 0 }, heading: Heading::Down };
        let outcome =
            run(&Grid::new(3, 40), agent, &still_params(3, 10), &mut ChaChaSource::seeded(77));
        assert_eq!(outcome.agent, AgentState { pos: Pos { y: 30, x: 0 }, heading: Heading::Down });
        assert_eq!(outcome.grid.count(CellState::Room), 0);
    }

    #[test]
    fn certain_room_chance_stamps_room_around_agent() {
        let params = WalkParams { room_chance: 1.0, ..still_params(1, 0) };
        let agent = AgentState { pos: Pos { y: 3, x: 3 }, heading: Heading::Left };
        // Draw 0 always lands under the current chance.
        let outcome = run(&Grid::new(7, 7), agent, &params, &mut ScriptedSource::new(vec![0]));

        assert_eq!(outcome.rooms_placed, 1);
        assert_eq!(outcome.grid.count(CellState::Room), 8);
        assert_eq!(outcome.grid.cell(Pos { y: 3, x: 3 }), CellState::Trail);
        assert_eq!(outcome.grid.cell(Pos { y: 2, x: 2 }), CellState::Room);
        assert_eq!(outcome.grid.cell(Pos { y: 4, x: 4 }), CellState::Room);
    }

    #[test]
    fn rooms_are_not_stamped_across_the_border() {
        let params = WalkParams { room_chance: 1.0, ..still_params(1, 0) };
        let agent = AgentState { pos: Pos { y: 0, x: 0 }, heading: Heading::Right };
        let outcome = run(&Grid::new(7, 7), agent, &params, &mut ScriptedSource::new(vec![0]));
        assert_eq!(outcome.rooms_placed, 0);
        assert_eq!(outcome.grid.count(CellState::Room), 0);
    }

    #[test]
    fn walk_turns_existing_rooms_and_noise_into_trail() {
        let grid = Grid::from_rows(&[".#*."]).expect("valid rows");
        let agent = AgentState { pos: Pos { y: 0, x: 0 }, heading: Heading::Right };
        let outcome = run(&grid, agent, &still_params(1, 3), &mut ChaChaSource::seeded(3));
        assert_eq!(outcome.grid, Grid::from_rows(&["@@@@"]).expect("valid rows"));
    }

    #[test]
    fn single_cell_grid_marks_start_and_stops() {
        let agent = AgentState { pos: Pos { y: 0, x: 0 }, heading: Heading::Up };
        let outcome =
            run(&Grid::new(1, 1), agent, &still_params(4, 5), &mut ChaChaSource::seeded(9));
        assert_eq!(outcome.grid.cell(Pos { y: 0, x: 0 }), CellState::Trail);
        assert_eq!(outcome.agent.pos, Pos { y: 0, x: 0 });
    }

    #[test]
    fn coverage_target_stops_the_walk_early() {
        let params = WalkParams {
            walks: 200,
            steps: 10,
            room_width: 3,
            room_height: 3,
            room_chance: 0.7,
            room_chance_increment: 0.02,
            turn_chance: 0.3,
            turn_chance_increment: 0.01,
            coverage_target: Some(0.6),
        };

        for seed in 0..10 {
            let agent = AgentState { pos: Pos { y: 5, x: 5 }, heading: Heading::Up };
            let outcome =
                run(&Grid::new(10, 10), agent, &params, &mut ChaChaSource::seeded(seed));

            assert!(outcome.walks_taken <= params.walks);
            assert!(outcome.walks_taken < params.walks, "seed {seed} never reached coverage");
            assert!(outcome.covered_cells >= 60, "seed {seed}: {}", outcome.covered_cells);
        }
    }

    #[test]
    fn already_covered_grid_takes_no_walks() {
        let grid = Grid::from_rows(&["@@", "#."]).expect("valid rows");
        let params = WalkParams { coverage_target: Some(0.5), ..still_params(5, 5) };
        let agent = AgentState { pos: Pos { y: 1, x: 1 }, heading: Heading::Up };
        let outcome = run(&grid, agent, &params, &mut ChaChaSource::seeded(0));
        assert_eq!(outcome.walks_taken, 0);
        assert_eq!(outcome.agent, agent);
    }

    #[test]
    fn without_target_every_walk_runs() {
        let agent = AgentState { pos: Pos { y: 1, x: 1 }, heading: Heading::Up };
        let outcome =
            run(&Grid::new(3, 3), agent, &still_params(12, 4), &mut ChaChaSource::seeded(5));
        assert_eq!(outcome.walks_taken, 12);
        assert_eq!(outcome.covered_cells, outcome.grid.covered_cells());
    }

    proptest! {
        #[test]
        fn agent_never_leaves_the_grid(
            width in 1_usize..12,
            height in 1_usize..12,
            start in (0_i32..12, 0_i32..12),
            heading in 0_usize..4,
            draws in prop::collection::vec(any::<u32>(), 1..64),
            walks in 0_u32..8,
            steps in 0_u32..16,
            room_chance in 0.0_f64..=1.0,
            turn_chance in 0.0_f64..=1.0
        ) {
            let pos = Pos { y: start.1 % height as i32, x: start.0 % width as i32 };
            let agent = AgentState { pos, heading: Heading::CARDINALS[heading] };
            let params = WalkParams {
                walks,
                steps,
                room_width: 3,
                room_height: 2,
                room_chance,
                room_chance_increment: 0.05,
                turn_chance,
                turn_chance_increment: 0.05,
                coverage_target: None,
            };

            let grid = Grid::new(width, height);
            let outcome = run(&grid, agent, &params, &mut ScriptedSource::new(draws));

            prop_assert!(outcome.grid.in_bounds(outcome.agent.pos));
            prop_assert_eq!(outcome.grid.width(), width);
            prop_assert_eq!(outcome.grid.height(), height);
            prop_assert_eq!(outcome.grid.cell(outcome.agent.pos), CellState::Trail);
        }
    }
}
