//! Quadrant sampling: summarise four overlapping regions of a square window.

use super::sense::{Observation, Sense, Viewpoint};
use crate::error::ConfigError;
use crate::simulation::tile::{Tile, TileMap};

/// Reads a `window × window` block of tiles centred on the agent and reduces
/// the up, down, left and right regions to one tile each, followed by the
/// terrain the agent stands on.
///
/// For the default 5×5 window each region is the 2×3 strip on that side of
/// the centre, excluding the centre cell itself.
#[derive(Debug, Clone)]
pub struct QuadrantSampling {
    window: usize,
}

/// Rows and columns (half-open, window-relative) covered by one region.
type Region = (std::ops::Range<usize>, std::ops::Range<usize>);

impl QuadrantSampling {
    /// Creates a sampler over an odd window size of at least 3.
    pub fn new(window: usize) -> Result<Self, ConfigError> {
        if window < 3 || window % 2 == 0 {
            return Err(ConfigError::OutOfRange {
                field: "sensing.window_size",
                reason: "must be odd and at least 3",
            });
        }
        Ok(Self { window })
    }

    /// Regions in observation order: up, down, left, right.
    fn regions(&self) -> [Region; 4] {
        let w = self.window;
        let r = w / 2;
        [
            (0..r, 1..w - 1),
            (r + 1..w, 1..w - 1),
            (1..w - 1, 0..r),
            (1..w - 1, r + 1..w),
        ]
    }

    /// Reduces one region to a single tile.
    ///
    /// An enemy marker wins outright; otherwise the most frequent tile, with
    /// ties going to the tile earliest in [`Tile::ALL`].
    pub fn summarise(tiles: &[Tile], enemy: Tile) -> Tile {
        if tiles.contains(&enemy) {
            return enemy;
        }

        let mut counts = [0usize; Tile::ALL.len()];
        for tile in tiles {
            counts[tile.rank()] += 1;
        }

        // Strictly-greater keeps the earliest tile on ties.
        let mut best = Tile::Wall;
        let mut best_count = 0;
        for tile in Tile::ALL {
            if counts[tile.rank()] > best_count {
                best = tile;
                best_count = counts[tile.rank()];
            }
        }
        best
    }
}

impl Sense for QuadrantSampling {
    fn sense(&self, viewpoint: &Viewpoint, map: &TileMap) -> Observation {
        let (col, row) = map.tile_of(viewpoint.x, viewpoint.y);
        let half = (self.window / 2) as i64;
        let enemy = viewpoint.species.enemy_marker();

        let mut slots = Vec::with_capacity(self.observation_len());
        for (rows, cols) in self.regions() {
            let mut tiles = Vec::with_capacity(rows.len() * cols.len());
            for dr in rows {
                for dc in cols.clone() {
                    tiles.push(map.get(col - half + dc as i64, row - half + dr as i64));
                }
            }
            slots.push(Self::summarise(&tiles, enemy));
        }

        // The agent's own cell carries its marker, so report the terrain.
        slots.push(map.terrain_at(col, row));
        Observation::new(slots)
    }

    fn observation_len(&self) -> usize {
        5
    }

    fn name(&self) -> &'static str {
        "Quadrant"
    }
}
