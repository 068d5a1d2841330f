//! Breeding pool: per-species candidate lists filled at death and the
//! breeder sets selected from them at each generation boundary.

use serde::{Deserialize, Serialize};

use super::agent::{AgentId, Species};
use super::dna::Genome;
use super::params::{PoolParams, Rollover};

/// One eligible death.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// Fitness at death.
    pub fitness: u64,
    /// Genome of the deceased.
    pub genome: Genome,
    /// Species of the deceased.
    pub species: Species,
    /// Identity of the deceased.
    pub id: AgentId,
}

/// Breeders of one species selected at one generation boundary, ranked by
/// descending fitness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreederSet {
    /// Species the breeders belong to.
    pub species: Species,
    /// Generation whose deaths they were selected from.
    pub generation: u32,
    breeders: Vec<PoolEntry>,
}

impl BreederSet {
    /// Ranked breeders, fittest first.
    pub fn breeders(&self) -> &[PoolEntry] {
        &self.breeders
    }

    /// Genomes in rank order.
    pub fn genomes(&self) -> impl Iterator<Item = &Genome> + '_ {
        self.breeders.iter().map(|entry| &entry.genome)
    }

    /// Whether `id` was selected.
    pub fn contains(&self, id: AgentId) -> bool {
        self.breeders.iter().any(|entry| entry.id == id)
    }

    /// Number of breeders.
    pub fn len(&self) -> usize {
        self.breeders.len()
    }

    /// Whether no breeder was selected.
    pub fn is_empty(&self) -> bool {
        self.breeders.is_empty()
    }
}

/// Both species' breeders for one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationBreeders {
    /// Generation the selection ran at the end of.
    pub generation: u32,
    /// Tiger breeders.
    pub predator: BreederSet,
    /// Deer breeders.
    pub prey: BreederSet,
}

impl GenerationBreeders {
    /// Breeder set for one species.
    pub fn for_species(&self, species: Species) -> &BreederSet {
        match species {
            Species::Predator => &self.predator,
            Species::Prey => &self.prey,
        }
    }

    /// Whether `id` was selected to breed in this generation.
    pub fn is_selected(&self, id: AgentId) -> bool {
        self.predator.contains(id) || self.prey.contains(id)
    }
}

/// Orders candidates by descending fitness, lower identity first on ties,
/// and keeps at most `capacity` of them.
pub fn rank(candidates: &[PoolEntry], capacity: usize) -> Vec<PoolEntry> {
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| b.fitness.cmp(&a.fitness).then(a.id.cmp(&b.id)));
    ranked.truncate(capacity);
    ranked
}

/// Candidate lists and selection history.
///
/// Submissions and selection both take `&mut self`; the ecosystem only calls
/// them from its serial barrier phase, so selection never interleaves with
/// submissions from the same tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedingPool {
    capacity: usize,
    rollover: Rollover,
    predator_candidates: Vec<PoolEntry>,
    prey_candidates: Vec<PoolEntry>,
    history: Vec<GenerationBreeders>,
}

impl BreedingPool {
    /// Creates an empty pool.
    pub fn new(params: &PoolParams) -> Self {
        Self {
            capacity: params.capacity,
            rollover: params.rollover,
            predator_candidates: Vec::new(),
            prey_candidates: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Appends a candidate to its species' list.
    pub fn submit(&mut self, fitness: u64, genome: Genome, species: Species, id: AgentId) {
        self.candidates_mut(species).push(PoolEntry {
            fitness,
            genome,
            species,
            id,
        });
    }

    /// Current candidates for a species, in submission order.
    pub fn candidates(&self, species: Species) -> &[PoolEntry] {
        match species {
            Species::Predator => &self.predator_candidates,
            Species::Prey => &self.prey_candidates,
        }
    }

    fn candidates_mut(&mut self, species: Species) -> &mut Vec<PoolEntry> {
        match species {
            Species::Predator => &mut self.predator_candidates,
            Species::Prey => &mut self.prey_candidates,
        }
    }

    /// Selects breeders for both species, records them under `generation`
    /// and applies the rollover policy.
    ///
    /// A species with fewer candidates than the capacity gets all of them,
    /// possibly none.
    pub fn select(&mut self, generation: u32) -> &GenerationBreeders {
        let selected = Species::ALL.map(|species| BreederSet {
            species,
            generation,
            breeders: rank(self.candidates(species), self.capacity),
        });

        let keep = self.rollover == Rollover::KeepBreeders;
        for set in &selected {
            let candidates = self.candidates_mut(set.species);
            candidates.clear();
            if keep {
                candidates.extend(set.breeders.iter().cloned());
            }
        }

        let [predator, prey] = selected;
        self.history.push(GenerationBreeders {
            generation,
            predator,
            prey,
        });
        &self.history[self.history.len() - 1]
    }

    /// Most recent selection.
    pub fn latest(&self) -> Option<&GenerationBreeders> {
        self.history.last()
    }

    /// Selection made at the end of `generation`.
    pub fn breeders_for(&self, generation: u32) -> Option<&GenerationBreeders> {
        self.history
            .iter()
            .rev()
            .find(|entry| entry.generation == generation)
    }

    /// Whether `id` was ever selected to breed.
    pub fn was_selected(&self, id: AgentId) -> bool {
        self.history.iter().any(|entry| entry.is_selected(id))
    }

    /// Every selection so far, oldest first.
    pub fn history(&self) -> &[GenerationBreeders] {
        &self.history
    }
}
