//! Directional raycasting across the agent's field of view.

use super::sense::{Observation, Sense, Viewpoint};
use crate::simulation::geometric_utils::heading_vector;
use crate::simulation::tile::{Tile, TileMap};

/// Casts `ray_count` rays spread evenly over `field_of_view`, centred on the
/// agent's heading.
///
/// A ray advances `step_size` world units per step for up to `step_count`
/// steps. It stops early on the observer's enemy marker or on a wall
/// (leaving the map counts as a wall); otherwise it reports the tile under
/// its last step. The observation is the terrain under the agent followed
/// by the rays in order of increasing angle.
#[derive(Debug, Clone)]
pub struct DirectionalRaycast {
    ray_count: usize,
    field_of_view: f32,
    step_size: f32,
    step_count: usize,
}

impl DirectionalRaycast {
    /// Creates a raycaster.
    pub fn new(ray_count: usize, field_of_view: f32, step_size: f32, step_count: usize) -> Self {
        Self {
            ray_count,
            field_of_view,
            step_size,
            step_count,
        }
    }

    /// Ray angles for a heading, in increasing order.
    pub fn ray_angles(&self, heading: f32) -> Vec<f32> {
        if self.ray_count == 1 {
            return vec![heading];
        }
        let angle_step = self.field_of_view / (self.ray_count as f32 - 1.0);
        (0..self.ray_count)
            .map(|i| heading - self.field_of_view / 2.0 + i as f32 * angle_step)
            .collect()
    }

    /// Walks one ray and returns what it hit.
    pub fn cast(&self, viewpoint: &Viewpoint, angle: f32, map: &TileMap) -> Tile {
        let enemy = viewpoint.species.enemy_marker();
        let step = heading_vector(angle) * self.step_size;
        let (mut x, mut y) = (viewpoint.x, viewpoint.y);

        let mut tile = Tile::Wall;
        for _ in 0..self.step_count {
            x += step[0];
            y += step[1];

            let (col, row) = map.tile_of(x, y);
            if map.out_of_bounds(col, row) {
                return Tile::Wall;
            }

            tile = map.get(col, row);
            if tile == enemy || tile == Tile::Wall {
                return tile;
            }
        }
        tile
    }
}

impl Sense for DirectionalRaycast {
    fn sense(&self, viewpoint: &Viewpoint, map: &TileMap) -> Observation {
        let (col, row) = map.tile_of(viewpoint.x, viewpoint.y);

        let mut slots = Vec::with_capacity(self.observation_len());
        slots.push(map.terrain_at(col, row));
        slots.extend(
            self.ray_angles(viewpoint.heading)
                .into_iter()
                .map(|angle| self.cast(viewpoint, angle, map)),
        );
        Observation::new(slots)
    }

    fn observation_len(&self) -> usize {
        self.ray_count + 1
    }

    fn name(&self) -> &'static str {
        "Directional"
    }
}
