use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a generator configuration is refused before any generation work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid dimensions {width}x{height} must each be between 1 and {max}")]
    InvalidDimensions { width: usize, height: usize, max: usize },

    #[error("noise scale must be a positive finite number, got {0}")]
    InvalidNoiseScale(f64),

    #[error("{name} must lie in [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("automata radius {radius} exceeds the largest grid side {max}")]
    RadiusTooLarge { radius: u32, max: usize },

    #[error("iteration count {iterations} exceeds {max}")]
    TooManyIterations { iterations: u32, max: u32 },

    #[error("room dimensions {width}x{height} must both be non-zero")]
    EmptyRoom { width: u32, height: u32 },

    #[error("room {room_width}x{room_height} does not fit a {width}x{height} grid")]
    RoomLargerThanGrid { room_width: u32, room_height: u32, width: usize, height: usize },

    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}
