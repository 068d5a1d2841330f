//! # Feorh - Predator/Prey Evolution on a Tile Map
//!
//! Tigers and deer roam a tile map, each steered by a small fixed-topology
//! neural network. Agents sense the map, pick a discrete action, move, feed
//! and die; the fittest of each generation breed the next one.
//!
//! ## Features
//!
//! - Two interchangeable senses: quadrant sampling and directional raycasting
//! - One-hidden-layer decision network with a lossless text genome
//! - Species-specific fitness (kills and exploration for tigers, survival for deer)
//! - Generational breeding pool with deterministic selection
//! - Parallel agent updates with rayon, serial resolution of interactions
//! - JSON configuration and breeder save/load
//!
//! ## Core Modules
//!
//! - [`simulation::tile`] - Tile kinds and the world map
//! - [`simulation::agent`] - Sensing, species behaviour and the agent lifecycle
//! - [`simulation::brain`] - Decision network
//! - [`simulation::dna`] - Genome encoding
//! - [`simulation::pool`] - Breeding pool and selection
//! - [`simulation::ecosystem`] - Simulation state and the tick driver

/// Error types.
pub mod error;

pub use error::{Error, Result};

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agents: sensing, species capabilities and the lifecycle.
    pub mod agent;
    /// Decision network mapping observations to actions.
    pub mod brain;
    /// Genome encoding of network parameters.
    pub mod dna;
    /// Simulation state and the parallel tick driver.
    pub mod ecosystem;
    /// Event system for the serial interaction phase.
    pub mod events;
    /// Offspring construction from breeders.
    pub mod evolution;
    /// Heading and tile-coordinate helpers.
    pub mod geometric_utils;
    /// Death statistics.
    pub mod mortality;
    /// Simulation parameters.
    pub mod params;
    /// Breeding pool and generational selection.
    pub mod pool;
    /// Tile kinds and the world map.
    pub mod tile;
}
