//! Main ecosystem simulation with parallel agent updates.
//!
//! One tick runs in three phases:
//! - stamp every live agent's marker onto the map snapshot
//! - update every agent in parallel with rayon (drain, age, sense, think, move)
//! - resolve walls, predation and grazing serially through the event queue
//!
//! A generation ends after `generation_ticks` ticks or as soon as either
//! species dies out. Survivors retire into the breeding pool, breeders are
//! selected, and both populations are respawned from them.

use std::f32::consts::TAU;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::agent::{Agent, AgentId, DeathCause, DeathReport, Perception, Species, TickContext};
use super::events;
use super::evolution::{self, Lineage};
use super::mortality::{GenerationSummary, MortalityLog};
use super::params::Params;
use super::pool::{BreedingPool, GenerationBreeders};
use super::tile::{TileCoord, TileMap};
use crate::error::{ConfigError, Result};

/// Built-in 30 × 20 map used when no map file is given.
pub const DEFAULT_MAP: &str = include_str!("../../maps/meadow.txt");

/// Spawn attempts before a prey is placed regardless of predator clearance.
const MAX_SPAWN_ATTEMPTS: usize = 64;

/// All mutable simulation state. Owned by one [`Ecosystem`]; nothing lives in
/// globals.
#[derive(Debug)]
pub struct SimulationState {
    /// Live tigers.
    pub predators: Vec<Agent>,
    /// Live deer.
    pub prey: Vec<Agent>,
    /// Candidates and breeder history.
    pub pool: BreedingPool,
    /// Death statistics.
    pub mortality: MortalityLog,
    /// Current generation, starting at 1.
    pub generation: u32,
    /// Ticks elapsed in the current generation.
    pub tick: u64,
    /// Ticks elapsed since the simulation started.
    pub total_ticks: u64,
    next_id: AtomicU64,
}

impl SimulationState {
    /// Creates empty state for generation 1.
    pub fn new(params: &Params) -> Self {
        Self {
            predators: Vec::with_capacity(params.predator.population),
            prey: Vec::with_capacity(params.prey.population),
            pool: BreedingPool::new(&params.pool),
            mortality: MortalityLog::default(),
            generation: 1,
            tick: 0,
            total_ticks: 0,
            next_id: AtomicU64::new(1),
        }
    }

    /// Hands out the next agent id. Ids start at 1 and are never reused.
    pub fn next_id(&self) -> AgentId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Live agents of one species.
    pub fn agents(&self, species: Species) -> &[Agent] {
        match species {
            Species::Predator => &self.predators,
            Species::Prey => &self.prey,
        }
    }

    /// Mutable list of one species.
    pub fn agents_mut(&mut self, species: Species) -> &mut Vec<Agent> {
        match species {
            Species::Predator => &mut self.predators,
            Species::Prey => &mut self.prey,
        }
    }

    /// Looks up an agent by species and id.
    pub fn find_mut(&mut self, species: Species, id: AgentId) -> Option<&mut Agent> {
        self.agents_mut(species).iter_mut().find(|agent| agent.id == id)
    }

    /// Number of live agents of a species.
    pub fn population(&self, species: Species) -> usize {
        self.agents(species).len()
    }

    /// Records a death and, when eligible, submits it to the breeding pool.
    pub fn submit(&mut self, report: DeathReport) {
        log::debug!(
            "{} {} died of {:?} at age {} (fitness {:?})",
            report.species,
            report.id,
            report.cause,
            report.age,
            report.fitness
        );
        self.mortality.record(&report);
        if let (true, Some(fitness)) = (report.breeds, report.fitness) {
            self.pool
                .submit(fitness, report.genome, report.species, report.id);
        }
    }

    /// Drops dead agents from the live lists.
    pub fn remove_dead(&mut self) {
        self.predators.retain(Agent::is_alive);
        self.prey.retain(Agent::is_alive);
    }
}

/// The world map, the agents on it and the driver that advances them.
#[derive(Debug)]
pub struct Ecosystem {
    /// Simulation parameters.
    pub params: Params,
    /// Terrain plus the occupant markers of the last tick.
    pub map: TileMap,
    /// Agents, pool and counters.
    pub state: SimulationState,
    perception: Perception,
    spawn_tiles: Vec<TileCoord>,
    rng: StdRng,
}

impl Ecosystem {
    /// Validates `params` against `map` and spawns generation 1 from founders.
    pub fn new(params: Params, map: TileMap) -> Result<Self> {
        params.validate()?;
        if (map.tile_size() - params.tile_size).abs() > f32::EPSILON {
            return Err(ConfigError::OutOfRange {
                field: "tile_size",
                reason: "map tile size differs from the configured one",
            }
            .into());
        }

        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let perception = Perception::from_params(&params.sensing)?;
        log::info!(
            "{}x{} map, {} sensing, network {:?}",
            map.width(),
            map.height(),
            perception.name(),
            params.layout().as_tuple()
        );

        let mut ecosystem = Self {
            spawn_tiles: map.passable_tiles(),
            state: SimulationState::new(&params),
            perception,
            params,
            map,
            rng,
        };
        ecosystem.spawn_generation(ecosystem.state.generation, None)?;
        Ok(ecosystem)
    }

    /// Builds an ecosystem on the built-in map.
    pub fn with_default_map(params: Params) -> Result<Self> {
        let map = TileMap::from_ascii(DEFAULT_MAP, params.tile_size)?;
        Self::new(params, map)
    }

    /// Current generation.
    pub fn generation(&self) -> u32 {
        self.state.generation
    }

    /// Number of live agents of a species.
    pub fn population(&self, species: Species) -> usize {
        self.state.population(species)
    }

    /// Advances the simulation by one tick.
    ///
    /// Returns the finished generation's summary when this tick closed it.
    pub fn step(&mut self) -> Result<Option<GenerationSummary>> {
        self.stamp_occupants();

        let ctx = TickContext {
            map: &self.map,
            perception: &self.perception,
            params: &self.params,
            generation: self.state.generation,
        };
        // Parallel phase: each agent only touches itself.
        let mut deaths: Vec<DeathReport> = self
            .state
            .predators
            .par_iter_mut()
            .chain(self.state.prey.par_iter_mut())
            .filter_map(|agent| agent.update(&ctx))
            .collect();

        let queue = events::collect_events(&self.map, &self.state.predators, &self.state.prey);
        deaths.extend(events::apply_events(&mut self.state, &self.params, queue));
        for report in deaths {
            self.state.submit(report);
        }
        self.state.remove_dead();

        self.state.tick += 1;
        self.state.total_ticks += 1;

        if self.generation_over() {
            return self.end_generation().map(Some);
        }
        Ok(None)
    }

    /// Runs ticks until the current generation ends.
    pub fn run_generation(&mut self) -> Result<GenerationSummary> {
        loop {
            if let Some(summary) = self.step()? {
                return Ok(summary);
            }
        }
    }

    /// Runs `generations` full generations.
    pub fn run(&mut self, generations: u32) -> Result<Vec<GenerationSummary>> {
        (0..generations).map(|_| self.run_generation()).collect()
    }

    fn generation_over(&self) -> bool {
        self.state.tick >= self.params.generation_ticks
            || self.state.predators.is_empty()
            || self.state.prey.is_empty()
    }

    /// Retires the survivors, selects breeders and respawns both species.
    pub fn end_generation(&mut self) -> Result<GenerationSummary> {
        let generation = self.state.generation;

        let retired: Vec<DeathReport> = self
            .state
            .predators
            .iter_mut()
            .chain(self.state.prey.iter_mut())
            .filter_map(|agent| agent.die(DeathCause::Retired, generation))
            .collect();
        for report in retired {
            self.state.submit(report);
        }
        self.state.remove_dead();

        let mut summary = self
            .state
            .mortality
            .finish_generation(generation, self.state.tick);
        let breeders = self.state.pool.select(generation).clone();
        summary.predator_breeders = breeders.predator.len();
        summary.prey_breeders = breeders.prey.len();

        log::info!(
            "generation {generation} ended after {} ticks: tigers best {:?} mean {:.1}, deer best {:?} mean {:.1}, breeders {}/{}, recent death age {:.0}/{:.0}",
            summary.ticks,
            summary.predator.best_fitness,
            summary.predator.mean_fitness(),
            summary.prey.best_fitness,
            summary.prey.mean_fitness(),
            summary.predator_breeders,
            summary.prey_breeders,
            self.state.mortality.avg_recent_age(Species::Predator),
            self.state.mortality.avg_recent_age(Species::Prey)
        );

        self.spawn_generation(generation + 1, Some(&breeders))?;
        Ok(summary)
    }

    /// Replaces both populations and starts `generation`. Offspring are bred
    /// from `breeders` where available; everything else is a founder.
    ///
    /// On error the current populations and generation are left untouched.
    fn spawn_generation(
        &mut self,
        generation: u32,
        breeders: Option<&GenerationBreeders>,
    ) -> Result<()> {
        // Predators first, so prey can keep their distance.
        let mut predators = Vec::with_capacity(self.params.predator.population);
        for _ in 0..self.params.predator.population {
            predators.push(self.breed_agent(Species::Predator, breeders, &[])?);
        }
        let mut prey = Vec::with_capacity(self.params.prey.population);
        for _ in 0..self.params.prey.population {
            prey.push(self.breed_agent(Species::Prey, breeders, &predators)?);
        }

        self.state.predators = predators;
        self.state.prey = prey;
        self.state.generation = generation;
        self.state.tick = 0;
        log::debug!(
            "generation {} spawned {} tigers and {} deer",
            self.state.generation,
            self.state.predators.len(),
            self.state.prey.len()
        );
        Ok(())
    }

    fn breed_agent(
        &mut self,
        species: Species,
        breeders: Option<&GenerationBreeders>,
        predators: &[Agent],
    ) -> Result<Agent> {
        let id = self.state.next_id();
        let pos = self.spawn_position(species, predators);
        let heading = self.rng.random_range(0.0..TAU);

        let offspring = match breeders {
            Some(breeders) => {
                evolution::breed(breeders.for_species(species), &self.params, &mut self.rng)?
            }
            None => None,
        };

        match offspring {
            Some(offspring) => {
                match offspring.lineage {
                    Lineage::Clone { parent } => {
                        log::trace!("{species} {id} cloned from {parent}");
                    }
                    Lineage::Crossover { parents } => {
                        log::trace!("{species} {id} bred from {parents:?}");
                    }
                }
                Ok(Agent::from_genome(
                    id,
                    species,
                    pos,
                    heading,
                    &offspring.genome,
                    &self.params,
                )?)
            }
            None => Ok(Agent::founder(
                id,
                species,
                pos,
                heading,
                &self.params,
                &mut self.rng,
            )),
        }
    }

    /// Picks the centre of a random passable tile. Prey retry until they are
    /// at least `spawn_clearance` away from every agent in `predators`.
    fn spawn_position(&mut self, species: Species, predators: &[Agent]) -> Array1<f32> {
        let clearance = species.params(&self.params).spawn_clearance;
        let mut candidate = (0.0, 0.0);

        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let tile = self.spawn_tiles[self.rng.random_range(0..self.spawn_tiles.len())];
            candidate = self.map.tile_center(tile);
            if species == Species::Predator || clearance <= 0.0 {
                break;
            }
            let clear = predators.iter().all(|predator| {
                let dx = predator.pos[0] - candidate.0;
                let dy = predator.pos[1] - candidate.1;
                (dx * dx + dy * dy).sqrt() >= clearance
            });
            if clear {
                return Array1::from_vec(vec![candidate.0, candidate.1]);
            }
        }

        if species == Species::Prey && clearance > 0.0 {
            log::warn!("no spawn tile {clearance} away from every tiger, placing deer anyway");
        }
        Array1::from_vec(vec![candidate.0, candidate.1])
    }

    /// Rewrites the occupant layer from the live agents. Tigers are stamped
    /// last and hide deer on a shared tile.
    fn stamp_occupants(&mut self) {
        self.map.clear_occupants();
        for agent in self.state.prey.iter().chain(&self.state.predators) {
            let tile = agent.tile(&self.map);
            self.map.stamp(tile, agent.species().marker());
        }
    }

    /// Saves every breeder selection so far to a JSON file.
    pub fn save_breeders(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self.state.pool.history())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a breeder history saved by [`Ecosystem::save_breeders`] and
    /// respawns both populations from its latest selection.
    ///
    /// Generation numbering continues from the loaded selection.
    pub fn seed_from_breeders(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let json = std::fs::read_to_string(path)?;
        let history: Vec<GenerationBreeders> = serde_json::from_str(&json)?;
        let Some(latest) = history.last() else {
            log::warn!("breeder file is empty, keeping founders");
            return Ok(());
        };

        log::info!(
            "seeding from generation {} with {} tiger and {} deer breeders",
            latest.generation,
            latest.predator.len(),
            latest.prey.len()
        );
        self.spawn_generation(latest.generation + 1, Some(latest))
    }
}
