use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::agent::{AgentId, DeathCause, DeathReport, Species};

/// Per-species death counters for one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTally {
    /// Deaths of any cause, retirements included.
    pub deaths: u64,
    /// Deaths caused by walking into a wall.
    pub wall_deaths: u64,
    /// Prey eaten (prey only).
    pub eaten: u64,
    /// Deaths that produced a fitness score.
    pub scored: u64,
    /// Sum of those fitness scores.
    pub fitness_sum: u64,
    /// Best fitness seen.
    pub best_fitness: Option<u64>,
}

impl SpeciesTally {
    fn record(&mut self, report: &DeathReport) {
        self.deaths += 1;
        match report.cause {
            DeathCause::Wall => self.wall_deaths += 1,
            DeathCause::Predator => self.eaten += 1,
            _ => {}
        }
        if let Some(fitness) = report.fitness {
            self.scored += 1;
            self.fitness_sum += fitness;
            self.best_fitness = Some(self.best_fitness.map_or(fitness, |best| best.max(fitness)));
        }
    }

    /// Mean fitness over scored deaths.
    pub fn mean_fitness(&self) -> f64 {
        if self.scored == 0 {
            0.0
        } else {
            self.fitness_sum as f64 / self.scored as f64
        }
    }
}

/// One generation's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation number.
    pub generation: u32,
    /// Ticks the generation lasted.
    pub ticks: u64,
    /// Tiger deaths.
    pub predator: SpeciesTally,
    /// Deer deaths.
    pub prey: SpeciesTally,
    /// Tigers selected to breed.
    pub predator_breeders: usize,
    /// Deer selected to breed.
    pub prey_breeders: usize,
}

/// A single death kept in the recent history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortalityRecord {
    /// Who died.
    pub id: AgentId,
    /// Their species.
    pub species: Species,
    /// How.
    pub cause: DeathCause,
    /// Age at death.
    pub age: u64,
    /// Generation of death.
    pub generation: u32,
    /// Fitness, if scored.
    pub fitness: Option<u64>,
}

/// Death statistics: a bounded history of recent deaths plus per-generation
/// tallies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortalityLog {
    /// Most recent deaths, oldest first.
    pub recent: VecDeque<MortalityRecord>,
    /// Maximum number of recent deaths to keep
    pub max_history: usize,
    predator: SpeciesTally,
    prey: SpeciesTally,
    total_deaths: u64,
}

impl Default for MortalityLog {
    fn default() -> Self {
        Self::new(200)
    }
}

impl MortalityLog {
    /// Creates an empty log keeping at most `max_history` recent deaths.
    pub fn new(max_history: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(max_history),
            max_history,
            predator: SpeciesTally::default(),
            prey: SpeciesTally::default(),
            total_deaths: 0,
        }
    }

    /// Record a death and update statistics
    pub fn record(&mut self, report: &DeathReport) {
        self.tally_mut(report.species).record(report);
        self.total_deaths += 1;

        self.recent.push_back(MortalityRecord {
            id: report.id,
            species: report.species,
            cause: report.cause,
            age: report.age,
            generation: report.generation,
            fitness: report.fitness,
        });
        if self.recent.len() > self.max_history {
            self.recent.pop_front();
        }
    }

    /// Current generation's tally for a species.
    pub fn tally(&self, species: Species) -> &SpeciesTally {
        match species {
            Species::Predator => &self.predator,
            Species::Prey => &self.prey,
        }
    }

    fn tally_mut(&mut self, species: Species) -> &mut SpeciesTally {
        match species {
            Species::Predator => &mut self.predator,
            Species::Prey => &mut self.prey,
        }
    }

    /// Deaths recorded since the log was created.
    pub fn total_deaths(&self) -> u64 {
        self.total_deaths
    }

    /// Average age of recent deaths of a species
    pub fn avg_recent_age(&self, species: Species) -> f64 {
        let (count, sum) = self
            .recent
            .iter()
            .filter(|r| r.species == species)
            .fold((0u64, 0u64), |(count, sum), r| (count + 1, sum + r.age));
        if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        }
    }

    /// Closes the current generation's tallies and starts fresh ones.
    pub fn finish_generation(&mut self, generation: u32, ticks: u64) -> GenerationSummary {
        GenerationSummary {
            generation,
            ticks,
            predator: std::mem::take(&mut self.predator),
            prey: std::mem::take(&mut self.prey),
            predator_breeders: 0,
            prey_breeders: 0,
        }
    }
}
