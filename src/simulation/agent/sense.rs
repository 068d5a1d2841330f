//! Sense trait and the observation vector it produces.
//!
//! A sense reads the tile map from one agent's point of view and summarises
//! it as a short, fixed-length list of tile tags.

use serde::{Deserialize, Serialize};

use super::species::Species;
use crate::simulation::tile::{Tile, TileMap};

/// Fixed-length list of tile tags describing an agent's surroundings.
///
/// Rebuilt every tick and never stored on the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation(Vec<Tile>);

impl Observation {
    /// Wraps a list of tiles.
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self(tiles)
    }

    /// The observed tiles in order.
    pub fn tiles(&self) -> &[Tile] {
        &self.0
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the observation has no slots.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric network inputs for each slot.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.0.iter().map(|tile| tile.value())
    }
}

/// Where an agent senses from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    /// Species of the observer; decides which occupant marker it reacts to.
    pub species: Species,
    /// World-space x.
    pub x: f32,
    /// World-space y (grows downwards).
    pub y: f32,
    /// Heading in radians.
    pub heading: f32,
}

/// Trait for the interchangeable sensing strategies.
///
/// Implementations only read the map, so one instance is shared by every
/// agent during the parallel decision phase.
pub trait Sense: Send + Sync {
    /// Builds the observation for `viewpoint`.
    ///
    /// Off-map cells read as [`Tile::Wall`]; sensing never fails.
    fn sense(&self, viewpoint: &Viewpoint, map: &TileMap) -> Observation;

    /// Length of every observation this sense returns.
    fn observation_len(&self) -> usize;

    /// Returns a human-readable name for this sense.
    fn name(&self) -> &str;
}
