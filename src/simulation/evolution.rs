//! Offspring construction from a generation's breeders.
//!
//! Two or more breeders: pick two different parents, average their brains and
//! mutate. One breeder: clone and mutate. None: the caller spawns a founder.
//! Parents are always decoded from their genomes, so a corrupt genome surfaces
//! as an error instead of silently producing a random brain.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::AgentId;
use super::brain::Brain;
use super::dna::Genome;
use super::params::Params;
use super::pool::BreederSet;
use crate::error::GenomeError;

/// How an offspring's genome was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lineage {
    /// Clone of a single breeder, mutated.
    Clone {
        /// Identity of the breeder.
        parent: AgentId,
    },
    /// Crossover of two breeders, mutated.
    Crossover {
        /// Identities of both breeders.
        parents: (AgentId, AgentId),
    },
}

/// Genome for a new agent and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offspring {
    /// Encoded child brain.
    pub genome: Genome,
    /// Breeding method.
    pub lineage: Lineage,
}

/// Breeds one offspring genome from `breeders`.
///
/// Returns `Ok(None)` when the set is empty.
pub fn breed<R: Rng>(
    breeders: &BreederSet,
    params: &Params,
    rng: &mut R,
) -> Result<Option<Offspring>, GenomeError> {
    let layout = params.layout();
    let entries = breeders.breeders();

    let (mut brain, lineage) = match entries.len() {
        0 => return Ok(None),
        1 => {
            let parent = &entries[0];
            (
                parent.genome.decode_for(layout)?,
                Lineage::Clone { parent: parent.id },
            )
        }
        n => {
            let first = rng.random_range(0..n);
            // Second parent drawn from the remaining n - 1 slots.
            let mut second = rng.random_range(0..n - 1);
            if second >= first {
                second += 1;
            }
            let (parent_1, parent_2) = (&entries[first], &entries[second]);
            let brain = Brain::crossover(
                &parent_1.genome.decode_for(layout)?,
                &parent_2.genome.decode_for(layout)?,
            );
            (
                brain,
                Lineage::Crossover {
                    parents: (parent_1.id, parent_2.id),
                },
            )
        }
    };

    brain.mutate(params.brain.mutation_scale, rng);
    Ok(Some(Offspring {
        genome: Genome::encode(&brain),
        lineage,
    }))
}
