pub mod config;
pub mod error;
pub mod mapgen;
pub mod render;
pub mod types;

pub use config::GeneratorConfig;
pub use error::ConfigError;
pub use mapgen::{
    AgentState, ChaChaSource, GeneratedMap, GenerationPhase, Grid, IterationStats, MapGenerator,
    NoiseField, RandomSource, generate_map, runtime_seed,
};
pub use render::{GlyphRenderer, Render};
pub use types::*;
