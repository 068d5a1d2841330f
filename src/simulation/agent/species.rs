//! Species variants and the capabilities that differ between them.
//!
//! Predator and prey share one lifecycle; everything that depends on the
//! species goes through [`SpeciesBehavior`].

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::simulation::params::{Params, SpeciesParams};
use crate::simulation::tile::{Tile, TileCoord};

/// Fitness points per kill.
pub const KILL_REWARD: u64 = 10;
/// Fitness points per distinct tile a predator visited.
pub const EXPLORATION_REWARD: u64 = 3;
/// Prey fitness points per generation elapsed.
pub const GENERATION_REWARD: u64 = 5;
/// Prey fitness bonus for not being eaten.
pub const SURVIVAL_BONUS: u64 = 100;

/// Species tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Tigers hunt deer.
    Predator,
    /// Deer graze and flee.
    Prey,
}

impl Species {
    /// Both species, predators first.
    pub const ALL: [Species; 2] = [Species::Predator, Species::Prey];

    /// Marker stamped on the map where an agent of this species stands.
    pub fn marker(self) -> Tile {
        match self {
            Species::Predator => Tile::Tiger,
            Species::Prey => Tile::Deer,
        }
    }

    /// Marker this species reacts to when sensing.
    pub fn enemy_marker(self) -> Tile {
        match self {
            Species::Predator => Tile::Deer,
            Species::Prey => Tile::Tiger,
        }
    }

    /// Parameter block for this species.
    pub fn params(self, params: &Params) -> &SpeciesParams {
        match self {
            Species::Predator => &params.predator,
            Species::Prey => &params.prey,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Predator => f.write_str("tiger"),
            Species::Prey => f.write_str("deer"),
        }
    }
}

/// Why an agent died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Energy ran out.
    Starvation,
    /// Reached the species age cap.
    OldAge,
    /// Eaten by a predator.
    Predator,
    /// Walked into a wall or off the map.
    Wall,
    /// Still alive when the generation ended.
    Retired,
}

/// What a death contributes to fitness statistics and the breeding pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathOutcome {
    /// Fitness score, if the species computes one for this cause.
    pub fitness: Option<u64>,
    /// Whether the genome enters the breeding pool.
    pub breeds: bool,
}

/// Capabilities that vary by species.
pub trait SpeciesBehavior {
    /// Which species this is.
    fn species(&self) -> Species;

    /// Energy lost per tick.
    fn drain_rate(&self, params: &Params) -> u32 {
        self.species().params(params).drain_rate
    }

    /// Age at which the agent dies of old age, if any.
    fn max_age(&self, params: &Params) -> Option<u64> {
        self.species().params(params).max_age
    }

    /// Fitness score for an agent of the given age in the given generation.
    fn compute_fitness(&self, age: u64, generation: u32) -> u64;

    /// Called after movement with the tile the agent now occupies.
    fn on_tick(&mut self, _tile: TileCoord) {}

    /// Called when the agent is granted a feeding event.
    fn on_feed(&mut self) {}

    /// Called once, on the transition to dead.
    fn on_death(&mut self, cause: DeathCause, age: u64, generation: u32) -> DeathOutcome;
}

/// Predator counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredatorState {
    /// Prey eaten.
    pub kill_count: u32,
    /// Distinct tiles occupied after moving.
    pub visited: HashSet<TileCoord>,
}

impl SpeciesBehavior for PredatorState {
    fn species(&self) -> Species {
        Species::Predator
    }

    fn compute_fitness(&self, _age: u64, _generation: u32) -> u64 {
        u64::from(self.kill_count) * KILL_REWARD + self.visited.len() as u64 * EXPLORATION_REWARD
    }

    fn on_tick(&mut self, tile: TileCoord) {
        self.visited.insert(tile);
    }

    fn on_feed(&mut self) {
        self.kill_count += 1;
    }

    /// Predators are always scored, but wall deaths do not breed.
    fn on_death(&mut self, cause: DeathCause, age: u64, generation: u32) -> DeathOutcome {
        DeathOutcome {
            fitness: Some(self.compute_fitness(age, generation)),
            breeds: cause != DeathCause::Wall,
        }
    }
}

/// Prey counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreyState {
    /// Set when a predator ate this agent.
    pub killed_by_predator: bool,
}

impl SpeciesBehavior for PreyState {
    fn species(&self) -> Species {
        Species::Prey
    }

    fn compute_fitness(&self, age: u64, generation: u32) -> u64 {
        let bonus = if self.killed_by_predator { 0 } else { SURVIVAL_BONUS };
        age + GENERATION_REWARD * u64::from(generation) + bonus
    }

    /// Prey that die in a wall are neither scored nor bred.
    fn on_death(&mut self, cause: DeathCause, age: u64, generation: u32) -> DeathOutcome {
        if cause == DeathCause::Predator {
            self.killed_by_predator = true;
        }
        if cause == DeathCause::Wall {
            return DeathOutcome {
                fitness: None,
                breeds: false,
            };
        }
        DeathOutcome {
            fitness: Some(self.compute_fitness(age, generation)),
            breeds: true,
        }
    }
}

/// Species-specific state carried by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeciesState {
    /// Tiger counters.
    Predator(PredatorState),
    /// Deer counters.
    Prey(PreyState),
}

impl SpeciesState {
    /// Fresh state for a newborn of `species`.
    pub fn new(species: Species) -> Self {
        match species {
            Species::Predator => SpeciesState::Predator(PredatorState::default()),
            Species::Prey => SpeciesState::Prey(PreyState::default()),
        }
    }

    fn behavior(&self) -> &dyn SpeciesBehavior {
        match self {
            SpeciesState::Predator(state) => state,
            SpeciesState::Prey(state) => state,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn SpeciesBehavior {
        match self {
            SpeciesState::Predator(state) => state,
            SpeciesState::Prey(state) => state,
        }
    }
}

impl SpeciesBehavior for SpeciesState {
    fn species(&self) -> Species {
        self.behavior().species()
    }

    fn compute_fitness(&self, age: u64, generation: u32) -> u64 {
        self.behavior().compute_fitness(age, generation)
    }

    fn on_tick(&mut self, tile: TileCoord) {
        self.behavior_mut().on_tick(tile);
    }

    fn on_feed(&mut self) {
        self.behavior_mut().on_feed();
    }

    fn on_death(&mut self, cause: DeathCause, age: u64, generation: u32) -> DeathOutcome {
        self.behavior_mut().on_death(cause, age, generation)
    }
}
