//! High-level map generation orchestration: noise seeding, then alternating walk and
//! smoothing rounds.

mod pipeline;

use tracing::info;

use super::grid::Grid;
use super::model::GeneratedMap;
use super::seed::RandomSource;
use crate::config::GeneratorConfig;
use crate::error::ConfigError;

pub use pipeline::GenerationPhase;
use pipeline::Pipeline;

#[derive(Clone, Debug)]
pub struct MapGenerator {
    config: GeneratorConfig,
}

impl MapGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs every phase to completion. Gameplay draws come from `rng`; the noise permutation
    /// is shuffled from `noise_seed` alone.
    pub fn generate(&self, rng: &mut impl RandomSource, noise_seed: u64) -> GeneratedMap {
        self.generate_observed(rng, noise_seed, |_, _| {})
    }

    /// Like [`MapGenerator::generate`], calling `observer` with each phase just completed and
    /// the grid it produced.
    pub fn generate_observed(
        &self,
        rng: &mut impl RandomSource,
        noise_seed: u64,
        mut observer: impl FnMut(GenerationPhase, &Grid),
    ) -> GeneratedMap {
        let mut pipeline = Pipeline::new(&self.config, rng, noise_seed);
        while pipeline.phase() != GenerationPhase::Done {
            let completed = pipeline.phase();
            pipeline.advance();
            observer(completed, pipeline.grid());
        }

        let generated = pipeline.finish();
        info!(
            width = generated.grid.width(),
            height = generated.grid.height(),
            iterations = generated.iterations.len(),
            rooms = generated.rooms_placed(),
            coverage = generated.grid.coverage(),
            "map generated"
        );
        generated
    }
}
