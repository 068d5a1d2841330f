//! Agent state and the per-tick lifecycle.
//!
//! An agent is either alive or dead, and dead is terminal. Each tick it loses
//! energy, ages, senses, thinks and moves; [`Agent::die`] is the only way
//! into the dead state and reports the death exactly once.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::perception::Perception;
use super::sense::Viewpoint;
use super::species::{DeathCause, Species, SpeciesBehavior, SpeciesState};
use crate::error::GenomeError;
use crate::simulation::brain::Brain;
use crate::simulation::dna::Genome;
use crate::simulation::geometric_utils::{heading_vector, normalize_heading};
use crate::simulation::params::Params;
use crate::simulation::tile::{TileCoord, TileMap};

/// Unique agent identity. Assigned in creation order and never reused.
pub type AgentId = u64;

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Still ticking.
    Alive,
    /// Terminal.
    Dead(DeathCause),
}

/// Everything recorded about a death, handed to the ecosystem for pool
/// submission and mortality statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathReport {
    /// Who died.
    pub id: AgentId,
    /// Their species.
    pub species: Species,
    /// How.
    pub cause: DeathCause,
    /// Age in ticks at death.
    pub age: u64,
    /// Generation the death happened in.
    pub generation: u32,
    /// Fitness, when the species scores this kind of death.
    pub fitness: Option<u64>,
    /// Whether the genome should enter the breeding pool.
    pub breeds: bool,
    /// The agent's genome.
    pub genome: Genome,
}

/// Read-only inputs shared by every agent during one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// Map snapshot with occupant markers stamped.
    pub map: &'a TileMap,
    /// Configured sense.
    pub perception: &'a Perception,
    /// Simulation parameters.
    pub params: &'a Params,
    /// Current generation number.
    pub generation: u32,
}

/// One simulated predator or prey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier for this agent.
    pub id: AgentId,
    /// Species tag plus species-specific counters.
    pub species_state: SpeciesState,
    /// Heading in radians, always in `[0, 2π)`.
    pub heading: f32,
    /// Position in world units (`[x, y]`, y grows downwards).
    pub pos: Array1<f32>,
    /// Current energy, in `[0, max_energy]`.
    pub energy: u32,
    /// Energy cap.
    pub max_energy: u32,
    /// Ticks survived.
    pub age: u64,
    /// Decision network.
    pub brain: Brain,
    /// Encoded brain parameters.
    pub genome: Genome,
    /// Lifecycle state.
    pub status: Status,
}

impl Agent {
    /// Creates a founder with random brain parameters.
    pub fn founder<R: Rng>(
        id: AgentId,
        species: Species,
        pos: Array1<f32>,
        heading: f32,
        params: &Params,
        rng: &mut R,
    ) -> Self {
        let brain = Brain::new_random(params.layout(), params.brain.init_range, rng);
        Self::with_brain(id, species, pos, heading, brain, params)
    }

    /// Creates an offspring whose brain is decoded from an inherited genome.
    ///
    /// Fails if the genome is malformed or was built for a different network
    /// shape; callers must not substitute a founder.
    pub fn from_genome(
        id: AgentId,
        species: Species,
        pos: Array1<f32>,
        heading: f32,
        genome: &Genome,
        params: &Params,
    ) -> Result<Self, GenomeError> {
        let brain = genome.decode_for(params.layout())?;
        Ok(Self::with_brain(id, species, pos, heading, brain, params))
    }

    /// Creates an agent around an existing brain.
    pub fn with_brain(
        id: AgentId,
        species: Species,
        pos: Array1<f32>,
        heading: f32,
        brain: Brain,
        params: &Params,
    ) -> Self {
        let max_energy = species.params(params).max_energy;
        Self {
            id,
            species_state: SpeciesState::new(species),
            heading: normalize_heading(heading),
            pos,
            energy: max_energy,
            max_energy,
            age: 0,
            genome: Genome::encode(&brain),
            brain,
            status: Status::Alive,
        }
    }

    /// Species tag.
    pub fn species(&self) -> Species {
        self.species_state.species()
    }

    /// Checks if the agent is alive.
    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    /// Where this agent senses from.
    pub fn viewpoint(&self) -> Viewpoint {
        Viewpoint {
            species: self.species(),
            x: self.pos[0],
            y: self.pos[1],
            heading: self.heading,
        }
    }

    /// Tile the agent currently occupies.
    pub fn tile(&self, map: &TileMap) -> TileCoord {
        map.tile_of(self.pos[0], self.pos[1])
    }

    /// Fitness the agent would score if it died now.
    pub fn fitness(&self, generation: u32) -> u64 {
        self.species_state.compute_fitness(self.age, generation)
    }

    /// Advances the agent by one tick.
    ///
    /// Returns the death report if the agent starved or died of old age this
    /// tick. Dead agents are left untouched.
    pub fn update(&mut self, ctx: &TickContext<'_>) -> Option<DeathReport> {
        if !self.is_alive() {
            return None;
        }

        self.energy = self
            .energy
            .saturating_sub(self.species_state.drain_rate(ctx.params));
        if self.energy == 0 {
            return self.die(DeathCause::Starvation, ctx.generation);
        }

        self.age += 1;
        if let Some(max_age) = self.species_state.max_age(ctx.params) {
            if self.age >= max_age {
                return self.die(DeathCause::OldAge, ctx.generation);
            }
        }

        let observation = ctx.perception.perceive(&self.viewpoint(), ctx.map);
        let (width, height) = ctx.map.pixel_extent();
        let action = self.brain.think(
            &observation,
            (self.pos[0] / width, self.pos[1] / height),
            self.heading,
        );

        self.heading = normalize_heading(self.heading + action.turn(ctx.params.turn_rate));
        let speed = action.speed(self.species().params(ctx.params).speed);
        self.pos += &(heading_vector(self.heading) * speed);

        let tile = self.tile(ctx.map);
        self.species_state.on_tick(tile);

        log::trace!(
            "{} {} at {:?} action {:?} energy {}",
            self.species(),
            self.id,
            tile,
            action,
            self.energy
        );
        None
    }

    /// Grants a feeding event: energy rises by `amount` up to the cap, and
    /// predators count a kill.
    pub fn feed(&mut self, amount: u32) {
        if !self.is_alive() {
            return;
        }
        self.energy = self.energy.saturating_add(amount).min(self.max_energy);
        self.species_state.on_feed();
    }

    /// Moves the agent into the dead state.
    ///
    /// Returns `None` if it was already dead, so each agent reports at most
    /// one death.
    pub fn die(&mut self, cause: DeathCause, generation: u32) -> Option<DeathReport> {
        if !self.is_alive() {
            return None;
        }
        self.status = Status::Dead(cause);

        let outcome = self.species_state.on_death(cause, self.age, generation);
        Some(DeathReport {
            id: self.id,
            species: self.species(),
            cause,
            age: self.age,
            generation,
            fitness: outcome.fitness,
            breeds: outcome.breeds,
            genome: self.genome.clone(),
        })
    }
}
