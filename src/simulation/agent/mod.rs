//! Agents: sensing, species capabilities and the per-tick lifecycle.

mod lifecycle;
mod perception;
mod quadrant;
mod raycast;
mod sense;
mod species;

pub use lifecycle::*;

pub use perception::Perception;
pub use quadrant::QuadrantSampling;
pub use raycast::DirectionalRaycast;
pub use sense::{Observation, Sense, Viewpoint};
pub use species::{
    DeathCause, DeathOutcome, EXPLORATION_REWARD, GENERATION_REWARD, KILL_REWARD, PredatorState,
    PreyState, SURVIVAL_BONUS, Species, SpeciesBehavior, SpeciesState,
};
