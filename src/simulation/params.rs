use std::f32::consts::{PI, TAU};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::agent::QuadrantSampling;
use super::brain::Layout;
use crate::error::{ConfigError, Result};

/// Simulation parameters that control ecosystem behavior.
///
/// Every field has a default, so a JSON file only needs to name the values
/// it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Edge length of one map tile in world units.
    pub tile_size: f32,
    /// Ticks before a generation ends even if both species survive.
    pub generation_ticks: u64,
    /// Generations the headless driver runs before stopping.
    pub max_generations: u32,
    /// Seed for the ecosystem RNG; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Heading change in radians per tick when a single turn output fires.
    pub turn_rate: f32,
    /// Predator ("tiger") parameters.
    pub predator: SpeciesParams,
    /// Prey ("deer") parameters.
    pub prey: SpeciesParams,
    /// Sensing strategy and its geometry.
    pub sensing: SensingParams,
    /// Decision network shape and variation.
    pub brain: BrainParams,
    /// Breeding pool sizing and rollover.
    pub pool: PoolParams,
}

/// Per-species lifecycle parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Agents spawned at the start of each generation.
    pub population: usize,
    /// Energy cap; agents are born full.
    pub max_energy: u32,
    /// Energy lost every tick.
    pub drain_rate: u32,
    /// Distance moved per tick when not braking.
    pub speed: f32,
    /// Energy gained per feeding event.
    pub food_energy: u32,
    /// Age in ticks at which the agent dies of old age, if any.
    pub max_age: Option<u64>,
    /// Minimum spawn distance from any predator, in world units.
    pub spawn_clearance: f32,
}

impl SpeciesParams {
    /// Tiger defaults.
    pub fn predator() -> Self {
        Self {
            population: 5,
            max_energy: 300,
            drain_rate: 1,
            speed: 6.0,
            food_energy: 50,
            max_age: None,
            spawn_clearance: 0.0,
        }
    }

    /// Deer defaults.
    pub fn prey() -> Self {
        Self {
            population: 10,
            max_energy: 200,
            drain_rate: 2,
            speed: 2.0,
            food_energy: 3,
            max_age: Some(1500),
            spawn_clearance: 15.0,
        }
    }

    fn validate(&self, species: &'static str) -> std::result::Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| ConfigError::Species {
            species,
            field,
            reason,
        };

        if self.population == 0 {
            return Err(invalid("population", "must be positive"));
        }
        if self.max_energy == 0 {
            return Err(invalid("max_energy", "must be positive"));
        }
        if self.drain_rate == 0 {
            return Err(invalid("drain_rate", "must be positive"));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(invalid("speed", "must be positive"));
        }
        if self.max_age == Some(0) {
            return Err(invalid("max_age", "must be positive when set"));
        }
        if !(self.spawn_clearance.is_finite() && self.spawn_clearance >= 0.0) {
            return Err(invalid("spawn_clearance", "must be finite and not negative"));
        }
        Ok(())
    }
}

/// Which sensing strategy agents use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensingMode {
    /// Summarise four regions of a square window around the agent.
    Quadrant,
    /// Cast rays across the field of view.
    Directional,
}

/// Sensing geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensingParams {
    /// Active strategy.
    pub mode: SensingMode,
    /// Edge length of the quadrant window in tiles (odd).
    pub window_size: usize,
    /// Number of rays for directional sensing.
    pub ray_count: usize,
    /// Total field of view in radians.
    pub field_of_view: f32,
    /// Distance covered by one ray step in world units.
    pub step_size: f32,
    /// Steps per ray.
    pub step_count: usize,
}

impl Default for SensingParams {
    fn default() -> Self {
        Self {
            mode: SensingMode::Directional,
            window_size: 5,
            ray_count: 7,
            field_of_view: 2.0 * PI / 3.0,
            step_size: 40.0,
            step_count: 6,
        }
    }
}

impl SensingParams {
    /// Length of the observation vector the active strategy produces.
    pub fn observation_len(&self) -> usize {
        match self.mode {
            SensingMode::Quadrant => 5,
            SensingMode::Directional => self.ray_count + 1,
        }
    }
}

/// Decision network parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainParams {
    /// Hidden layer width.
    pub hidden_size: usize,
    /// Founder weights and biases are drawn from `[-init_range, init_range)`.
    pub init_range: f32,
    /// Offspring parameters receive noise in `[-mutation_scale, mutation_scale)`.
    pub mutation_scale: f32,
}

impl Default for BrainParams {
    fn default() -> Self {
        Self {
            hidden_size: 4,
            init_range: 1.0,
            mutation_scale: 0.1,
        }
    }
}

/// What happens to the candidate lists once breeders are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rollover {
    /// Start each generation with empty candidate lists.
    Clear,
    /// Carry the selected breeders over as candidates for the next selection.
    KeepBreeders,
}

/// Breeding pool parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolParams {
    /// Maximum breeders selected per species per generation.
    pub capacity: usize,
    /// Candidate list policy after selection.
    pub rollover: Rollover,
}

impl Default for PoolParams {
    fn default() -> Self {
        Self {
            capacity: 15,
            rollover: Rollover::KeepBreeders,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            tile_size: 30.0,
            generation_ticks: 3000,
            max_generations: 100,
            seed: None,
            turn_rate: 0.2,
            predator: SpeciesParams::predator(),
            prey: SpeciesParams::prey(),
            sensing: SensingParams::default(),
            brain: BrainParams::default(),
            pool: PoolParams::default(),
        }
    }
}

impl Params {
    /// Parses parameters from JSON, filling omitted fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Params = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Loads parameters from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Network shape implied by the sensing configuration.
    pub fn layout(&self) -> Layout {
        Layout::for_observation(self.sensing.observation_len(), self.brain.hidden_size)
    }

    /// Rejects unusable configurations. Runs once, before the simulation starts.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::NonPositive("tile_size"));
        }
        if self.generation_ticks == 0 {
            return Err(ConfigError::NonPositive("generation_ticks"));
        }
        if !(self.turn_rate.is_finite() && self.turn_rate > 0.0) {
            return Err(ConfigError::NonPositive("turn_rate"));
        }

        self.predator.validate("predator")?;
        self.prey.validate("prey")?;

        let sensing = &self.sensing;
        QuadrantSampling::new(sensing.window_size)?;
        if sensing.ray_count == 0 {
            return Err(ConfigError::NonPositive("sensing.ray_count"));
        }
        if !(sensing.field_of_view > 0.0 && sensing.field_of_view <= TAU) {
            return Err(ConfigError::OutOfRange {
                field: "sensing.field_of_view",
                reason: "must lie in (0, 2π]",
            });
        }
        if !(sensing.step_size.is_finite() && sensing.step_size > 0.0) {
            return Err(ConfigError::NonPositive("sensing.step_size"));
        }
        if sensing.step_count == 0 {
            return Err(ConfigError::NonPositive("sensing.step_count"));
        }

        if self.brain.hidden_size == 0 {
            return Err(ConfigError::NonPositive("brain.hidden_size"));
        }
        if !(self.brain.init_range.is_finite() && self.brain.init_range > 0.0) {
            return Err(ConfigError::NonPositive("brain.init_range"));
        }
        if !(self.brain.mutation_scale.is_finite() && self.brain.mutation_scale >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "brain.mutation_scale",
                reason: "must be finite and not negative",
            });
        }

        if self.pool.capacity == 0 {
            return Err(ConfigError::NonPositive("pool.capacity"));
        }
        Ok(())
    }
}
