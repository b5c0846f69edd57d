//! Tunable generation parameters, loadable from TOML.
//!
//! Every field has a default, so a config file only needs the values it changes:
//!
//! ```toml
//! iterations = 4
//! seed = 1234
//!
//! [grid]
//! width = 60
//! height = 30
//!
//! [walk]
//! room_width = 7
//! early_exit = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mapgen::WalkParams;

pub const MAX_DIMENSION: usize = 4096;
pub const MAX_ITERATIONS: u32 = 10_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub grid: GridConfig,
    pub noise: NoiseConfig,
    pub automata: AutomataConfig,
    pub walk: WalkConfig,
    /// Walk-then-smooth rounds.
    pub iterations: u32,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            noise: NoiseConfig::default(),
            automata: AutomataConfig::default(),
            walk: WalkConfig::default(),
            iterations: 10,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { width: 100, height: 50 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    pub scale: f64,
    pub threshold: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self { scale: 0.15, threshold: 0.5 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutomataConfig {
    pub radius: u32,
    pub threshold: f64,
}

impl Default for AutomataConfig {
    fn default() -> Self {
        Self { radius: 2, threshold: 0.4 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkConfig {
    pub walks: u32,
    pub steps: u32,
    pub room_width: u32,
    pub room_height: u32,
    pub room_chance: f64,
    pub room_chance_increment: f64,
    pub turn_chance: f64,
    pub turn_chance_increment: f64,
    pub coverage_target: f64,
    /// When false every walk phase runs all of its walks regardless of coverage.
    pub early_exit: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            walks: 10,
            steps: 10,
            room_width: 5,
            room_height: 3,
            room_chance: 0.7,
            room_chance_increment: 0.02,
            turn_chance: 0.3,
            turn_chance_increment: 0.01,
            coverage_target: 0.6,
            early_exit: true,
        }
    }
}

impl WalkConfig {
    pub fn params(&self) -> WalkParams {
        WalkParams {
            walks: self.walks,
            steps: self.steps,
            room_width: self.room_width,
            room_height: self.room_height,
            room_chance: self.room_chance,
            room_chance_increment: self.room_chance_increment,
            turn_chance: self.turn_chance,
            turn_chance_increment: self.turn_chance_increment,
            coverage_target: self.early_exit.then_some(self.coverage_target),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridConfig { width, height } = self.grid;
        if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
            return Err(ConfigError::InvalidDimensions { width, height, max: MAX_DIMENSION });
        }

        if !self.noise.scale.is_finite() || self.noise.scale <= 0.0 {
            return Err(ConfigError::InvalidNoiseScale(self.noise.scale));
        }

        // A window wider than the grid already sees every cell.
        let max_radius = width.max(height);
        if self.automata.radius as usize > max_radius {
            let radius = self.automata.radius;
            return Err(ConfigError::RadiusTooLarge { radius, max: max_radius });
        }

        if self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::TooManyIterations {
                iterations: self.iterations,
                max: MAX_ITERATIONS,
            });
        }

        let unit_values = [
            ("noise.threshold", self.noise.threshold),
            ("automata.threshold", self.automata.threshold),
            ("walk.room_chance", self.walk.room_chance),
            ("walk.room_chance_increment", self.walk.room_chance_increment),
            ("walk.turn_chance", self.walk.turn_chance),
            ("walk.turn_chance_increment", self.walk.turn_chance_increment),
            ("walk.coverage_target", self.walk.coverage_target),
        ];
        for (name, value) in unit_values {
            // NaN fails the range check too.
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }

        let (room_width, room_height) = (self.walk.room_width, self.walk.room_height);
        if room_width == 0 || room_height == 0 {
            return Err(ConfigError::EmptyRoom { width: room_width, height: room_height });
        }
        if room_width as usize > width || room_height as usize > height {
            return Err(ConfigError::RoomLargerThanGrid { room_width, room_height, width, height });
        }

        Ok(())
    }
}
