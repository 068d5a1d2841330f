//! Tile tags and the two-layer tile map agents perceive.
//!
//! The map keeps terrain and occupant markers in separate layers. Terrain is
//! fixed for the lifetime of a map; occupant markers are cleared and stamped
//! by the ecosystem once per tick so every agent senses the same snapshot.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::geometric_utils::position_to_tile;
use crate::error::ConfigError;

/// A tile tag.
///
/// The declaration order is the fixed ordering used to break ties when
/// summarising a region: earlier variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable terrain; also what lies outside the map.
    Wall,
    /// Bare ground.
    Dirt,
    /// Grazing ground for prey.
    Grass,
    /// Woodland.
    Wood,
    /// A prey agent stands here.
    Deer,
    /// A predator agent stands here.
    Tiger,
}

impl Tile {
    /// All tiles in tie-break order.
    pub const ALL: [Tile; 6] = [
        Tile::Wall,
        Tile::Dirt,
        Tile::Grass,
        Tile::Wood,
        Tile::Deer,
        Tile::Tiger,
    ];

    /// Numeric value fed to the decision network.
    pub fn value(self) -> f32 {
        match self {
            Tile::Wall => 10.25,
            Tile::Dirt => 0.1,
            Tile::Grass => 2.5,
            Tile::Wood => 0.2,
            Tile::Deer => -10.25,
            Tile::Tiger => -20.25,
        }
    }

    /// Single-character glyph used by ASCII maps and debug output.
    pub fn glyph(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Dirt => 'd',
            Tile::Grass => 'g',
            Tile::Wood => 'w',
            Tile::Deer => 'D',
            Tile::Tiger => 'T',
        }
    }

    /// Parses a glyph back into a tile.
    pub fn from_glyph(glyph: char) -> Option<Tile> {
        Tile::ALL.into_iter().find(|tile| tile.glyph() == glyph)
    }

    /// Whether this tag marks an occupant rather than terrain.
    pub fn is_marker(self) -> bool {
        matches!(self, Tile::Deer | Tile::Tiger)
    }

    /// Position in the tie-break ordering.
    pub fn rank(self) -> usize {
        self as usize
    }
}

/// Tile coordinates as `(column, row)`. Signed so that off-map cells can be
/// represented and rejected by [`TileMap::out_of_bounds`].
pub type TileCoord = (i64, i64);

/// The world grid: a terrain layer plus an occupant-marker layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    /// Terrain tags indexed `[row, column]`.
    terrain: Array2<Tile>,
    /// Occupant markers indexed `[row, column]`.
    occupants: Array2<Option<Tile>>,
    /// Edge length of one tile in world units.
    tile_size: f32,
}

impl TileMap {
    /// Builds a map from a terrain grid indexed `[row, column]`.
    pub fn new(terrain: Array2<Tile>, tile_size: f32) -> Result<Self, ConfigError> {
        if terrain.is_empty() {
            return Err(ConfigError::InvalidMap("map has no tiles".into()));
        }
        if tile_size.is_nan() || tile_size <= 0.0 {
            return Err(ConfigError::NonPositive("tile_size"));
        }
        if let Some(marker) = terrain.iter().find(|tile| tile.is_marker()) {
            return Err(ConfigError::InvalidMap(format!(
                "terrain layer contains occupant marker `{}`",
                marker.glyph()
            )));
        }
        if terrain.iter().all(|tile| *tile == Tile::Wall) {
            return Err(ConfigError::InvalidMap("map has no passable tile".into()));
        }

        let occupants = Array2::from_elem(terrain.dim(), None);
        Ok(Self {
            terrain,
            occupants,
            tile_size,
        })
    }

    /// Parses a map from rows of glyphs (`#`, `d`, `g`, `w`).
    ///
    /// Blank lines are skipped; every remaining row must have the same width.
    pub fn from_ascii(text: &str, tile_size: f32) -> Result<Self, ConfigError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut cells = Vec::with_capacity(rows.len() * width);

        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(ConfigError::InvalidMap(format!(
                    "row {row_idx} has width {}, expected {width}",
                    row.chars().count()
                )));
            }
            for glyph in row.chars() {
                let tile = Tile::from_glyph(glyph).ok_or_else(|| {
                    ConfigError::InvalidMap(format!("unknown glyph `{glyph}` in row {row_idx}"))
                })?;
                cells.push(tile);
            }
        }

        let terrain = Array2::from_shape_vec((rows.len(), width), cells)
            .map_err(|e| ConfigError::InvalidMap(e.to_string()))?;
        Self::new(terrain, tile_size)
    }

    /// Number of tile rows.
    pub fn height(&self) -> usize {
        self.terrain.nrows()
    }

    /// Number of tile columns.
    pub fn width(&self) -> usize {
        self.terrain.ncols()
    }

    /// Edge length of one tile in world units.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Map extent in world units as `(width, height)`.
    pub fn pixel_extent(&self) -> (f32, f32) {
        (
            self.width() as f32 * self.tile_size,
            self.height() as f32 * self.tile_size,
        )
    }

    /// Whether `(col, row)` lies outside the map.
    pub fn out_of_bounds(&self, col: i64, row: i64) -> bool {
        col < 0 || row < 0 || col >= self.width() as i64 || row >= self.height() as i64
    }

    /// Visible tile at `(col, row)`: the occupant marker if one is stamped,
    /// otherwise the terrain. Off-map cells read as wall.
    pub fn get(&self, col: i64, row: i64) -> Tile {
        if self.out_of_bounds(col, row) {
            return Tile::Wall;
        }
        let idx = (row as usize, col as usize);
        self.occupants[idx].unwrap_or(self.terrain[idx])
    }

    /// Terrain at `(col, row)`, ignoring occupants. Off-map cells read as wall.
    pub fn terrain_at(&self, col: i64, row: i64) -> Tile {
        if self.out_of_bounds(col, row) {
            return Tile::Wall;
        }
        self.terrain[(row as usize, col as usize)]
    }

    /// Tile coordinates containing a world-space position.
    pub fn tile_of(&self, x: f32, y: f32) -> TileCoord {
        position_to_tile(x, y, self.tile_size)
    }

    /// World-space centre of a tile.
    pub fn tile_center(&self, (col, row): TileCoord) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.tile_size,
            (row as f32 + 0.5) * self.tile_size,
        )
    }

    /// Removes every occupant marker.
    pub fn clear_occupants(&mut self) {
        self.occupants.fill(None);
    }

    /// Stamps an occupant marker. Off-map cells are ignored.
    pub fn stamp(&mut self, (col, row): TileCoord, marker: Tile) {
        if !self.out_of_bounds(col, row) {
            self.occupants[(row as usize, col as usize)] = Some(marker);
        }
    }

    /// Coordinates of every non-wall terrain tile in row-major order.
    pub fn passable_tiles(&self) -> Vec<TileCoord> {
        self.terrain
            .indexed_iter()
            .filter(|(_, tile)| **tile != Tile::Wall)
            .map(|((row, col), _)| (col as i64, row as i64))
            .collect()
    }

    /// Renders the visible layer as ASCII, one row per line.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.height() * (self.width() + 1));
        for row in 0..self.height() as i64 {
            for col in 0..self.width() as i64 {
                out.push(self.get(col, row).glyph());
            }
            out.push('\n');
        }
        out
    }
}
