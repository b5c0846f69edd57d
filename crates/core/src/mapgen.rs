//! Procedural map generation: noise terrain, drunk-agent corridors and rooms, and
//! cellular-automata smoothing.

pub mod automata;
pub mod model;
pub mod noise;
pub mod rooms;
pub mod seed;
pub mod walker;

mod generator;
mod grid;

pub use generator::{GenerationPhase, MapGenerator};
pub use grid::{Grid, WALK_WRITABLE};
pub use model::{GeneratedMap, IterationStats};
pub use noise::NoiseField;
pub use rooms::RoomRect;
pub use seed::{ChaChaSource, RandomSource, runtime_seed};
pub use walker::{AgentState, WalkOutcome, WalkParams};

use crate::config::GeneratorConfig;
use crate::error::ConfigError;

/// Generates a whole map from a single seed. The noise permutation and the walker's draws
/// come from independent streams derived from `run_seed`.
pub fn generate_map(config: &GeneratorConfig, run_seed: u64) -> Result<GeneratedMap, ConfigError> {
    let generator = MapGenerator::new(config.clone())?;
    let mut rng = ChaChaSource::seeded(seed::derive_walk_seed(run_seed));
    Ok(generator.generate(&mut rng, seed::derive_noise_seed(run_seed)))
}
