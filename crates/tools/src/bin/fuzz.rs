use std::collections::{HashSet, VecDeque};

use anyhow::{Result, bail};
use clap::Parser;
use mapgen::{CellState, ChaChaSource, GeneratorConfig, Grid, Pos, RandomSource, generate_map};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn random_config(rng: &mut ChaChaSource) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.grid.width = rng.next_int(1, 120) as usize;
    config.grid.height = rng.next_int(1, 60) as usize;
    config.walk.room_width = rng.next_int(1, config.grid.width.min(9) as i32) as u32;
    config.walk.room_height = rng.next_int(1, config.grid.height.min(7) as i32) as u32;
    let widest = config.grid.width.max(config.grid.height) as i32;
    config.automata.radius = rng.next_int(0, widest.min(3)) as u32;
    config.walk.early_exit = rng.next_int(0, 1) == 1;
    config.iterations = rng.next_int(0, 12) as u32;
    config
}

fn never_erased(initial: &Grid, last: &Grid) -> bool {
    initial
        .positions()
        .all(|pos| initial.cell(pos) == CellState::Empty || last.cell(pos) != CellState::Empty)
}

/// Every 8-connected patch of Room cells must fit inside a single room footprint. Two rooms
/// stamped without a gap would merge into a patch larger than either.
fn rooms_keep_their_gap(grid: &Grid, room_width: u32, room_height: u32) -> Result<()> {
    let mut seen = HashSet::new();
    for start in grid.positions() {
        if grid.cell(start) != CellState::Room || !seen.insert(start) {
            continue;
        }

        let (mut min, mut max) = (start, start);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            min = Pos { y: min.y.min(pos.y), x: min.x.min(pos.x) };
            max = Pos { y: max.y.max(pos.y), x: max.x.max(pos.x) };
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let next = Pos { y: pos.y + dy, x: pos.x + dx };
                    if grid.get(next) == Some(CellState::Room) && seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        let (span_x, span_y) = ((max.x - min.x + 1) as u32, (max.y - min.y + 1) as u32);
        if span_x > room_width || span_y > room_height {
            bail!("rooms touch around {start:?}: patch spans {span_x}x{span_y}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaChaSource::seeded(args.seed);

    for run in 0..args.runs {
        let config = random_config(&mut rng);
        let run_seed = rng.next_int(0, i32::MAX) as u64;
        let generated = generate_map(&config, run_seed)?;

        // Assert invariants
        let grid = &generated.grid;
        assert_eq!(grid.width(), config.grid.width, "Invariant failed: width changed");
        assert_eq!(grid.height(), config.grid.height, "Invariant failed: height changed");
        assert!(grid.in_bounds(generated.agent.pos), "Invariant failed: agent outside grid");
        assert_eq!(
            grid.cell(generated.agent.pos),
            CellState::Trail,
            "Invariant failed: agent off trail (run {run}, seed {run_seed})"
        );
        assert!(
            never_erased(&generated.initial, grid),
            "Invariant failed: terrain erased (run {run}, seed {run_seed})"
        );
        assert_eq!(generated.iterations.len(), config.iterations as usize);
        let (room_width, room_height) = (config.walk.room_width, config.walk.room_height);
        if let Err(error) = rooms_keep_their_gap(grid, room_width, room_height) {
            panic!("Invariant failed: {error} (run {run}, seed {run_seed})");
        }
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
