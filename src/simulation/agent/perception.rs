//! Perception: the configured sense, shared by every agent.

use super::quadrant::QuadrantSampling;
use super::raycast::DirectionalRaycast;
use super::sense::{Observation, Sense, Viewpoint};
use crate::error::ConfigError;
use crate::simulation::params::{SensingMode, SensingParams};
use crate::simulation::tile::TileMap;

/// Holds the sensing strategy selected by configuration.
pub struct Perception {
    sense: Box<dyn Sense>,
}

impl Perception {
    /// Builds the sense named by `params.mode`.
    pub fn from_params(params: &SensingParams) -> Result<Self, ConfigError> {
        let sense: Box<dyn Sense> = match params.mode {
            SensingMode::Quadrant => Box::new(QuadrantSampling::new(params.window_size)?),
            SensingMode::Directional => Box::new(DirectionalRaycast::new(
                params.ray_count,
                params.field_of_view,
                params.step_size,
                params.step_count,
            )),
        };
        Ok(Self { sense })
    }

    /// Observes the map from `viewpoint`.
    pub fn perceive(&self, viewpoint: &Viewpoint, map: &TileMap) -> Observation {
        self.sense.sense(viewpoint, map)
    }

    /// Length of every observation.
    pub fn observation_len(&self) -> usize {
        self.sense.observation_len()
    }

    /// Name of the active sense.
    pub fn name(&self) -> &str {
        self.sense.name()
    }
}

impl std::fmt::Debug for Perception {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Perception")
            .field("sense", &self.sense.name())
            .finish()
    }
}
